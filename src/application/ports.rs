//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::{
    envelope::{AuthToken, Envelope, SubmissionResponse},
    format::{DocumentFormat, DocumentKind},
};
use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt::Debug;

/// Error produced while turning a document into an envelope.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The document could not be serialized
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The encoder cannot represent this document
    #[error("document cannot be encoded as {format}: {reason}")]
    Rejected {
        /// Format of the rejecting encoder
        format: DocumentFormat,
        /// Why the document was rejected
        reason: String,
    },
}

/// Port for encoding a document and its signature into an envelope.
///
/// Each implementation is bound to exactly one format and one document kind.
/// Implementations must not perform I/O.
pub trait DocumentEncoder: Send + Sync + Debug {
    /// Format this encoder is registered for.
    fn format(&self) -> DocumentFormat;

    /// Document kind stamped on every envelope this encoder builds.
    fn kind(&self) -> DocumentKind;

    /// Build an envelope for `document` signed with `signature`.
    ///
    /// # Errors
    /// Returns `EncodeError` if the document cannot be serialized in this format.
    fn encode(
        &self,
        document: &serde_json::Value,
        signature: &str,
    ) -> Result<Envelope, EncodeError>;
}

/// Error returned by a token provider.
#[derive(Debug, thiserror::Error)]
#[error("failed to obtain auth token: {source}")]
pub struct TokenError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl TokenError {
    /// Wrap any underlying failure.
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Port for obtaining a bearer token.
///
/// Called once per submission. Caching and refresh are the implementor's concern.
#[async_trait]
pub trait TokenProvider: Send + Sync + Debug {
    /// Fetch the token to use for the next request.
    async fn token(&self) -> Result<AuthToken, TokenError>;
}

/// Error returned by a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No token could be obtained
    #[error(transparent)]
    Token(#[from] TokenError),
    /// The request could not be sent or its body could not be read
    #[error("registry request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The registry answered with a non-success status
    #[error("registry responded with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
    /// The response body was not a valid submission response
    #[error("failed to decode registry response: {0}")]
    Decode(#[source] serde_json::Error),
    /// Transport-specific failure
    #[error("transport failure: {0}")]
    Other(String),
}

/// Port for delivering an envelope to the registry.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send one envelope and return the registry's answer verbatim.
    async fn send(&self, envelope: &Envelope) -> Result<SubmissionResponse, TransportError>;
}
