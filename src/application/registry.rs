//! Lookup table from document format to the encoder responsible for it.
//!
//! The registry is built once from the full set of encoders and is read-only
//! afterwards, so lookups need no synchronisation.

use crate::application::ports::DocumentEncoder;
use crate::domain::format::DocumentFormat;
use std::collections::HashMap;
use std::sync::Arc;

/// Error returned when no encoder is registered for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported document format = {format}")]
pub struct UnsupportedFormat {
    /// The requested format
    pub format: DocumentFormat,
}

/// Registry of encoders keyed by the format they handle.
///
/// When several encoders claim the same format, the first one registered
/// wins and later ones are ignored.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    encoders: HashMap<DocumentFormat, Arc<dyn DocumentEncoder>>,
}

impl FormatRegistry {
    /// Build a registry from a list of encoders.
    pub fn new<I>(encoders: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn DocumentEncoder>>,
    {
        let mut map: HashMap<DocumentFormat, Arc<dyn DocumentEncoder>> = HashMap::new();

        for encoder in encoders {
            let format = encoder.format();
            if map.contains_key(&format) {
                tracing::debug!(%format, "duplicate encoder ignored, first registration wins");
                continue;
            }
            map.insert(format, encoder);
        }

        tracing::debug!(formats = map.len(), "format registry built");
        Self { encoders: map }
    }

    /// Resolve the encoder registered for `format`.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` if no encoder handles `format`.
    pub fn resolve(
        &self,
        format: DocumentFormat,
    ) -> Result<&Arc<dyn DocumentEncoder>, UnsupportedFormat> {
        self.encoders.get(&format).ok_or(UnsupportedFormat { format })
    }

    /// Check whether an encoder is registered for `format`.
    pub fn contains(&self, format: DocumentFormat) -> bool {
        self.encoders.contains_key(&format)
    }

    /// Registered formats, in declaration order.
    pub fn formats(&self) -> Vec<DocumentFormat> {
        DocumentFormat::ALL
            .into_iter()
            .filter(|format| self.contains(*format))
            .collect()
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
