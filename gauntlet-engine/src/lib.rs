//! Load generation and measurement engine for Gauntlet
//!
//! Leaves first:
//!
//! - [`driver`]: fans N executions of one request out over C workers and
//!   streams back exactly one outcome per attempt
//! - [`reducer`]: folds outcomes into a [`gauntlet_core::Summary`]
//! - [`probe`]: bounded readiness polling before a run
//! - [`session`]: probe, drive and reduce one (scenario, framework) pairing
//! - [`runner`]: every scenario against every framework, into a
//!   [`ComparisonReport`]

pub mod driver;
pub mod probe;
pub mod reducer;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod session;

pub use driver::{DriverReport, LoadDriver, OutcomeStream};
pub use probe::{ProbeError, Readiness, ReadinessProbe};
pub use reducer::{percentile, SummaryReducer};
pub use report::{ComparisonReport, EntryResult, ReportEntry};
pub use runner::ComparisonRunner;
pub use scenario::{Framework, Scenario};
pub use session::{run_config_from, BenchmarkSession};
