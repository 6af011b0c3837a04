//! Domain-driven configuration management for Gauntlet
//!
//! Configuration is split by functional domain (load, probe, http, logging,
//! targets), each with its own defaults and validation, and can be loaded from
//! YAML with `GAUNTLET_*` environment overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    http::HttpConfig,
    load::LoadConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    probe::ProbeConfig,
    targets::{FrameworkConfig, ScenarioConfig},
    GauntletConfig,
};

// Re-export utilities
pub use domains::utils::serde_millis;
