//! Submission envelope, registry response and bearer token.

use crate::domain::format::{DocumentFormat, DocumentKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical submission unit sent to the registry.
///
/// Built by a [`DocumentEncoder`](crate::DocumentEncoder) and never modified
/// afterwards. `product_group` is left out of the serialized form entirely
/// when it is not set.
///
/// # Example
/// ```
/// use registry_throttle::{DocumentFormat, DocumentKind, Envelope};
///
/// let envelope = Envelope::new(
///     DocumentFormat::Manual,
///     DocumentKind::LpIntroduceGoods,
///     "sig",
///     "eyJhIjoxfQ==",
/// );
///
/// let json = serde_json::to_value(&envelope).unwrap();
/// assert_eq!(json["document_format"], "MANUAL");
/// assert_eq!(json["type"], "LP_INTRODUCE_GOODS");
/// assert!(json.get("product_group").is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    document_format: DocumentFormat,
    #[serde(rename = "product_document")]
    encoded_payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_group: Option<String>,
    signature: String,
    #[serde(rename = "type")]
    kind: DocumentKind,
}

impl Envelope {
    /// Create an envelope without a product group.
    pub fn new(
        document_format: DocumentFormat,
        kind: DocumentKind,
        signature: impl Into<String>,
        encoded_payload: impl Into<String>,
    ) -> Self {
        Self {
            document_format,
            encoded_payload: encoded_payload.into(),
            product_group: None,
            signature: signature.into(),
            kind,
        }
    }

    /// Set the product group. `None` keeps the field absent.
    pub fn with_product_group(mut self, product_group: Option<String>) -> Self {
        self.product_group = product_group;
        self
    }

    /// Format tag of the encoded document.
    pub fn document_format(&self) -> DocumentFormat {
        self.document_format
    }

    /// Document kind tag.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Detached signature, verbatim.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Base64 text of the serialized document.
    pub fn encoded_payload(&self) -> &str {
        &self.encoded_payload
    }

    /// Product group, if any.
    pub fn product_group(&self) -> Option<&str> {
        self.product_group.as_deref()
    }
}

// Signatures must never reach logs.
impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("document_format", &self.document_format)
            .field("kind", &self.kind)
            .field("product_group", &self.product_group)
            .field("encoded_payload_len", &self.encoded_payload.len())
            .field("signature", &"<redacted>")
            .finish()
    }
}

/// Result returned by the registry for a submission.
///
/// Every field is optional and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionResponse {
    /// Identifier assigned to the accepted document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SubmissionResponse {
    /// Response carrying only an assigned identifier.
    pub fn accepted(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// True when the registry reported an error code or message.
    pub fn is_error(&self) -> bool {
        self.code.is_some() || self.error_message.is_some()
    }
}

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}
