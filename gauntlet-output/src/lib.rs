//! # Gauntlet Output
//!
//! Renders a [`ComparisonReport`](gauntlet_engine::ComparisonReport) as a
//! terminal table, a Markdown document or JSON, and delivers the result to
//! stdout or a file.
//!
//! ```rust,no_run
//! use gauntlet_core::RunConfig;
//! use gauntlet_engine::ComparisonReport;
//! use gauntlet_output::{format_report, ReportFormat};
//!
//! let report = ComparisonReport::new(RunConfig::quick());
//! println!("{}", format_report(&report, ReportFormat::Markdown)?);
//! # Ok::<(), gauntlet_output::OutputError>(())
//! ```

pub mod destination;
pub mod errors;
pub mod format;

pub use destination::ReportDestination;
pub use errors::OutputError;
pub use format::{format_report, render_table, ReportFormat};
