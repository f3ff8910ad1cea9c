//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - JSON document encoding (base64 of canonical JSON)
//! - HTTP delivery to the registry (reqwest)
//! - Bearer token sources
//! - Submitter assembly from configuration

pub mod client;
pub mod http;
pub mod json_encoder;
pub mod token;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides a recording transport and a tracing
/// layer that captures emitted events.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// registry-throttle = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
