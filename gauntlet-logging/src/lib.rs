//! Logging initialisation for Gauntlet
//!
//! Library crates log through `tracing` (or `log`, bridged by the
//! subscriber); only binaries and tests call into this crate.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
