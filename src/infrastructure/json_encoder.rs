//! Encoder for generic JSON (`MANUAL`) documents.

use crate::application::ports::{DocumentEncoder, EncodeError};
use crate::domain::{
    envelope::Envelope,
    format::{DocumentFormat, DocumentKind},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encodes documents as base64 of their canonical JSON text.
///
/// The canonical text is the compact rendering of the document as a
/// `serde_json::Value`, whose object keys are kept sorted.
///
/// # Example
/// ```
/// use registry_throttle::{DocumentEncoder, JsonDocumentEncoder};
/// use serde_json::json;
///
/// let encoder = JsonDocumentEncoder::new();
/// let envelope = encoder.encode(&json!({"a": 1}), "sig").unwrap();
///
/// assert_eq!(envelope.encoded_payload(), "eyJhIjoxfQ==");
/// assert_eq!(envelope.signature(), "sig");
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentEncoder {
    product_group: Option<String>,
}

impl JsonDocumentEncoder {
    /// Create an encoder that leaves `product_group` unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every envelope with `product_group`.
    pub fn with_product_group(mut self, product_group: impl Into<String>) -> Self {
        self.product_group = Some(product_group.into());
        self
    }
}

impl DocumentEncoder for JsonDocumentEncoder {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Manual
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::LpIntroduceGoods
    }

    fn encode(
        &self,
        document: &serde_json::Value,
        signature: &str,
    ) -> Result<Envelope, EncodeError> {
        let json = serde_json::to_string(document)?;
        let encoded = STANDARD.encode(json.as_bytes());

        Ok(
            Envelope::new(self.format(), self.kind(), signature, encoded)
                .with_product_group(self.product_group.clone()),
        )
    }
}
