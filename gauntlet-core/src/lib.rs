//! Core domain models and types for Gauntlet
//!
//! This crate holds the vocabulary shared by every other Gauntlet crate:
//! run configuration, per-request outcomes, aggregated summaries and the
//! error taxonomy that separates harness bugs from measurements.

pub mod error;
pub mod serde_utils;
pub mod summary;
pub mod types;

// Re-export commonly used types at the crate root
pub use error::{BenchError, Result, SetupError};
pub use summary::{LatencyStats, Summary};
pub use types::{FailureKind, Outcome, RunConfig};
