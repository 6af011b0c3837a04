//! Subcommand handlers

pub mod config;
pub mod probe;
pub mod run;

use anyhow::{Context, Result};
use gauntlet_config::{ConfigLoader, GauntletConfig, LogLevel};
use gauntlet_core::SetupError;
use gauntlet_http::{HttpClientConfig, ReqwestExecutor};
use std::path::Path;
use std::sync::Arc;

/// Load configuration from file, or from the environment and defaults
pub fn load_config(config_path: Option<&Path>) -> Result<GauntletConfig> {
    let loader = ConfigLoader::new();
    match config_path {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Initialize logging, letting `--log-level` win over the configured level
pub fn init_logging(config: &GauntletConfig, log_level: Option<&str>) -> Result<()> {
    let mut logging = config.logging.clone();
    if let Some(level) = log_level {
        logging.level = level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    gauntlet_logging::init_logging_from_config(&logging)
}

pub fn build_executor(config: &GauntletConfig) -> Result<Arc<ReqwestExecutor>> {
    let executor = ReqwestExecutor::new(&HttpClientConfig::from(&config.http))
        .map_err(SetupError::from)
        .context("Failed to build HTTP client")?;
    Ok(Arc::new(executor))
}
