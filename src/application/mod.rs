//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the submission pipeline:
//! - Rate gate (admission per rolling window)
//! - Format registry (format to encoder lookup)
//! - Document submitter (the pipeline itself)
//! - Metrics (per-stage outcome counters)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod gate;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod submitter;
