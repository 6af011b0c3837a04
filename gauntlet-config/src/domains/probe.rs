//! Readiness probe configuration

use crate::error::ConfigResult;
use crate::validation::{validate_path, validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pre-run readiness probe: bounded retries with exponential backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Path probed on every framework's base URL
    #[serde(default = "default_path")]
    pub path: String,

    /// Attempts before the target is declared unreachable
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(
        rename = "initial_delay_ms",
        with = "crate::domains::utils::serde_millis",
        default = "default_initial_delay"
    )]
    pub initial_delay: Duration,

    #[serde(
        rename = "max_delay_ms",
        with = "crate::domains::utils::serde_millis",
        default = "default_max_delay"
    )]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after every failed attempt
    #[serde(default = "default_backoff_base")]
    pub backoff_base: f64,

    /// Timeout of a single probe request
    #[serde(
        rename = "timeout_ms",
        with = "crate::domains::utils::serde_millis",
        default = "default_timeout"
    )]
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_base: default_backoff_base(),
            timeout: default_timeout(),
        }
    }
}

impl Validatable for ProbeConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_path(&self.path, "path", self.domain_name())?;
        validate_positive(self.max_attempts, "max_attempts", self.domain_name())?;
        validate_positive(self.timeout.as_millis(), "timeout_ms", self.domain_name())?;

        if self.backoff_base < 1.0 || !self.backoff_base.is_finite() {
            return Err(self.validation_error(format!(
                "backoff_base must be a finite number >= 1.0, got {}",
                self.backoff_base
            )));
        }

        if self.max_delay < self.initial_delay {
            return Err(self.validation_error("max_delay_ms must be >= initial_delay_ms"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "probe"
    }
}

// Default value functions
fn default_path() -> String {
    "/".to_string()
}

fn default_max_attempts() -> u32 {
    20
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_backoff_base() -> f64 {
    2.0
}

fn default_timeout() -> Duration {
    Duration::from_secs(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_config_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.path, "/");
        assert_eq!(config.max_attempts, 20);
        assert_eq!(config.initial_delay, Duration::from_millis(100));
        assert_eq!(config.max_delay, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_probe_config_validation() {
        let mut config = ProbeConfig::default();
        config.max_attempts = 0;
        assert!(config.validate().is_err());

        config = ProbeConfig::default();
        config.backoff_base = 0.5;
        assert!(config.validate().is_err());

        config = ProbeConfig::default();
        config.path = "health".to_string();
        assert!(config.validate().is_err());

        config = ProbeConfig::default();
        config.max_delay = Duration::from_millis(10);
        assert!(config.validate().is_err());
    }
}
