//! Configuration loading and environment variable handling

use crate::domains::load::LoadConfig;
use crate::domains::logging::{LogFormat, LogLevel, LoggingConfig};
use crate::domains::GauntletConfig;
use crate::error::{ConfigError, ConfigResult};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "GAUNTLET".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<GauntletConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: GauntletConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<GauntletConfig> {
        let mut config = GauntletConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<GauntletConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut GauntletConfig) -> ConfigResult<()> {
        self.apply_load_overrides(&mut config.load)?;
        self.apply_logging_overrides(&mut config.logging)?;

        if let Some(skip) = self.parse_env::<String>("SKIP")? {
            let names: Vec<&str> = skip.split(',').collect();
            config.apply_skip(&names)?;
        }

        Ok(())
    }

    fn apply_load_overrides(&self, load: &mut LoadConfig) -> ConfigResult<()> {
        if let Some(requests) = self.parse_env("REQUESTS")? {
            load.set_requests(requests);
        }
        if let Some(concurrency) = self.parse_env("CONCURRENCY")? {
            load.set_concurrency(concurrency);
        }
        if let Some(millis) = self.parse_env::<u64>("REQUEST_TIMEOUT_MS")? {
            load.request_timeout = Duration::from_millis(millis);
        }
        if let Some(quick) = self.parse_env("QUICK")? {
            load.quick = quick;
        }
        Ok(())
    }

    fn apply_logging_overrides(&self, logging: &mut LoggingConfig) -> ConfigResult<()> {
        if let Some(level) = self.parse_env::<LogLevel>("LOG_LEVEL")? {
            logging.level = level;
        }
        if let Some(format) = self.parse_env::<LogFormat>("LOG_FORMAT")? {
            logging.format = format;
        }
        Ok(())
    }

    /// `<PREFIX>_<name>`, parsed; `None` when unset
    fn parse_env<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let var = format!("{}_{}", self.prefix, name);
        match std::env::var(&var) {
            Ok(value) => value.trim().parse().map(Some).map_err(|e: T::Err| ConfigError::InvalidEnv {
                reason: e.to_string(),
                var,
                value,
            }),
            Err(_) => Ok(None),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
