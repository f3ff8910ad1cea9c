//! # registry-throttle
//!
//! Rate-limited submission of signed documents to a remote registry.
//!
//! Every submission passes through a **rate gate** that admits at most
//! `limit` submissions per rolling window, then through a **format
//! registry** that picks the encoder for the requested document format,
//! and finally through a **transport** that delivers the resulting
//! envelope. The registry's answer is handed back verbatim.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use registry_throttle::{DocumentFormat, DocumentSubmitter, StaticTokenProvider, TimeUnit};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // At most 5 submissions per second
//! let submitter = DocumentSubmitter::builder()
//!     .with_time_unit(TimeUnit::Seconds)
//!     .with_request_limit(5)
//!     .with_http_endpoint("https://ismp.crpt.ru", "/api/v3/lk/documents/create")
//!     .with_token_provider(Arc::new(StaticTokenProvider::new("token")))
//!     .build()?;
//!
//! let response = submitter
//!     .submit(&json!({"participant_inn": "7700000000"}), "signature", DocumentFormat::Manual)
//!     .await?;
//! println!("registry answered: {:?}", response);
//!
//! submitter.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! The same options can be loaded from any serde format through
//! [`ClientSettings`]:
//!
//! ```rust,no_run
//! # use registry_throttle::{ClientSettings, DocumentSubmitter, StaticTokenProvider};
//! # use std::sync::Arc;
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings: ClientSettings = serde_json::from_str(r#"{
//!     "time-unit": "MINUTES",
//!     "request-limit": 100,
//!     "base-url": "https://ismp.crpt.ru",
//!     "introduce-goods-path": "/api/v3/lk/documents/create",
//!     "product-group": "shoes"
//! }"#)?;
//!
//! let submitter = DocumentSubmitter::builder()
//!     .with_settings(settings)
//!     .with_token_provider(Arc::new(StaticTokenProvider::new("token")))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Rate Gate
//!
//! The gate holds `limit` permits. Each admission takes one permit, which
//! returns exactly one interval after the admission instant. Waiters are
//! served in arrival order. Admission is charged per attempt: a submission
//! that fails after admission still used its permit.
//!
//! ```rust
//! # use registry_throttle::{GateConfig, RateGate, TimeUnit};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let gate = RateGate::new(GateConfig::per_unit(TimeUnit::Seconds, 2).unwrap());
//!
//! let _first = gate.acquire().await.unwrap();
//! let _second = gate.acquire().await.unwrap();
//! assert_eq!(gate.available_permits(), 0);
//!
//! gate.shutdown().await.unwrap();
//! # }
//! ```
//!
//! Waits can be bounded with [`RateGate::acquire_timeout`] or cancelled by
//! any future through [`RateGate::acquire_until`]. A cancelled wait never
//! consumes a permit.
//!
//! ## Formats and Encoders
//!
//! Each [`DocumentEncoder`] is bound to one [`DocumentFormat`]. The built-in
//! [`JsonDocumentEncoder`] handles `MANUAL` documents by base64-encoding
//! their canonical JSON text. Additional encoders are registered with
//! [`SubmitterBuilder::with_encoder`]; when two encoders claim the same
//! format, the first one registered wins. A format with no encoder fails
//! with [`UnsupportedFormat`].
//!
//! ## Observability
//!
//! Per-stage outcomes are counted:
//!
//! ```rust,no_run
//! # use registry_throttle::DocumentSubmitter;
//! # fn report(submitter: &DocumentSubmitter) {
//! let snapshot = submitter.metrics().snapshot();
//! println!("admitted: {}", snapshot.admissions);
//! println!("delivered: {}", snapshot.delivered);
//! println!("failure rate: {:.2}%", snapshot.failure_rate() * 100.0);
//! # }
//! ```
//!
//! Pipeline events are emitted through `tracing`. Signatures and bearer
//! tokens are never logged.

// Domain layer - pure data
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    envelope::{AuthToken, Envelope, SubmissionResponse},
    format::{DocumentFormat, DocumentKind},
    time_unit::{ParseTimeUnitError, TimeUnit},
};

pub use application::{
    gate::{Admission, GateConfig, GateConfigError, GateError, RateGate, ShutdownError},
    metrics::{Metrics, MetricsSnapshot},
    ports::{DocumentEncoder, EncodeError, TokenError, TokenProvider, Transport, TransportError},
    registry::{FormatRegistry, UnsupportedFormat},
    submitter::{DocumentSubmitter, SubmitError},
};

pub use infrastructure::{
    client::{BuildError, ClientSettings, SubmitterBuilder},
    http::{HttpSetupError, HttpTransport},
    json_encoder::JsonDocumentEncoder,
    token::StaticTokenProvider,
};
