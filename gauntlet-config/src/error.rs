//! Configuration error types

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An override variable is set but does not parse
    #[error("Environment variable {var}={value} is invalid: {reason}")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
    },

    /// A value is out of range or inconsistent with the rest of the file
    #[error("Invalid {domain} configuration: {message}")]
    Invalid { domain: String, message: String },
}
