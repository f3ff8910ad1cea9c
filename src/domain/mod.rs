//! Domain layer - pure data with no I/O.
//!
//! This layer contains the values that flow through the submission pipeline:
//! - Document format and document kind tags
//! - The submission envelope and the registry response
//! - Bearer tokens
//! - Time unit granularity of the rate window
//!
//! All types in this layer are pure and easily testable.

pub mod envelope;
pub mod format;
pub mod time_unit;
