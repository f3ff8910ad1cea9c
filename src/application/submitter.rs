//! Submission pipeline: admission, encoder lookup, encoding, delivery.
//!
//! Every call to [`DocumentSubmitter::submit`] consumes exactly one gate
//! permit, whether or not the submission later succeeds. Permits are never
//! refunded on failure: admission is charged per attempt.

use crate::application::{
    gate::{Admission, GateError, RateGate, ShutdownError},
    metrics::Metrics,
    ports::{EncodeError, Transport, TransportError},
    registry::{FormatRegistry, UnsupportedFormat},
};
use crate::domain::{
    envelope::{Envelope, SubmissionResponse},
    format::DocumentFormat,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Error returned by a submission, one variant per pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The rate gate did not admit the attempt
    #[error(transparent)]
    Gate(#[from] GateError),
    /// No encoder is registered for the requested format
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),
    /// The document could not be encoded
    #[error(transparent)]
    Encoding(#[from] EncodeError),
    /// The transport failed to deliver the envelope
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Entry point for submitting documents to the registry.
///
/// Cheap to clone; clones share the gate, registry, transport and metrics.
#[derive(Debug, Clone)]
pub struct DocumentSubmitter {
    gate: Arc<RateGate>,
    registry: Arc<FormatRegistry>,
    transport: Arc<dyn Transport>,
    metrics: Metrics,
}

impl DocumentSubmitter {
    /// Create a submitter from already-built parts.
    ///
    /// Use [`DocumentSubmitter::builder`] to assemble one from configuration.
    pub fn new(
        gate: Arc<RateGate>,
        registry: FormatRegistry,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            gate,
            registry: Arc::new(registry),
            transport,
            metrics: Metrics::new(),
        }
    }

    /// Submit a document, waiting as long as needed for admission.
    ///
    /// # Errors
    /// Returns the failure of whichever stage failed, unchanged:
    /// `Gate` if the gate is shut down, `UnsupportedFormat` if no encoder
    /// handles `format`, `Encoding` if the document cannot be encoded, and
    /// `Transport` if delivery fails.
    pub async fn submit<D>(
        &self,
        document: &D,
        signature: &str,
        format: DocumentFormat,
    ) -> Result<SubmissionResponse, SubmitError>
    where
        D: Serialize + ?Sized,
    {
        let admission = self
            .gate
            .acquire()
            .await
            .map_err(|e| self.gate_failure(e))?;
        self.dispatch(admission, document, signature, format).await
    }

    /// Submit a document, waiting at most `wait` for admission.
    ///
    /// # Errors
    /// Same as [`submit`](Self::submit); a wait longer than `wait` yields
    /// `SubmitError::Gate(GateError::Interrupted)` and consumes no permit.
    pub async fn submit_with_timeout<D>(
        &self,
        document: &D,
        signature: &str,
        format: DocumentFormat,
        wait: Duration,
    ) -> Result<SubmissionResponse, SubmitError>
    where
        D: Serialize + ?Sized,
    {
        let admission = self
            .gate
            .acquire_timeout(wait)
            .await
            .map_err(|e| self.gate_failure(e))?;
        self.dispatch(admission, document, signature, format).await
    }

    /// Run the post-admission stages. Takes the admission by value so one
    /// admission authorises one envelope.
    async fn dispatch<D>(
        &self,
        _admission: Admission,
        document: &D,
        signature: &str,
        format: DocumentFormat,
    ) -> Result<SubmissionResponse, SubmitError>
    where
        D: Serialize + ?Sized,
    {
        self.metrics.record_admission();

        let envelope = self.build_envelope(document, signature, format)?;
        tracing::debug!(%format, kind = %envelope.kind(), "sending envelope");

        match self.transport.send(&envelope).await {
            Ok(response) => {
                self.metrics.record_delivered();
                tracing::debug!(
                    %format,
                    rejected = response.is_error(),
                    "registry answered"
                );
                Ok(response)
            }
            Err(e) => {
                self.metrics.record_transport_failure();
                tracing::warn!(%format, error = %e, "submission failed in transport");
                Err(e.into())
            }
        }
    }

    fn build_envelope<D>(
        &self,
        document: &D,
        signature: &str,
        format: DocumentFormat,
    ) -> Result<Envelope, SubmitError>
    where
        D: Serialize + ?Sized,
    {
        let encoder = self.registry.resolve(format).map_err(|e| {
            self.metrics.record_unsupported_format();
            tracing::warn!(%format, "no encoder registered for format");
            e
        })?;

        serde_json::to_value(document)
            .map_err(EncodeError::from)
            .and_then(|value| encoder.encode(&value, signature))
            .map_err(|e| {
                self.metrics.record_encoding_failure();
                tracing::warn!(%format, error = %e, "document could not be encoded");
                SubmitError::from(e)
            })
    }

    fn gate_failure(&self, error: GateError) -> SubmitError {
        self.metrics.record_gate_rejection();
        tracing::warn!(error = %error, "submission not admitted");
        error.into()
    }

    /// Shut down the rate gate. Later submissions fail with `GateError::Closed`.
    ///
    /// # Errors
    /// Returns `ShutdownError` if the gate's release task panicked.
    pub async fn shutdown(&self) -> Result<(), ShutdownError> {
        self.gate.shutdown().await
    }

    /// Get a reference to the rate gate.
    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    /// Get a reference to the format registry.
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
