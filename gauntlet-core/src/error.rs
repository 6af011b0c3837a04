//! Core error types for Gauntlet
//!
//! Only two kinds of failure ever surface to a caller: a [`SetupError`]
//! (the harness was handed something it cannot run) and
//! [`BenchError::TargetUnreachable`] (the target never answered the readiness
//! probe). Failed requests during a run are recorded as
//! [`crate::Outcome`]s and never appear here.

use thiserror::Error;

/// Result type alias for Gauntlet
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors raised before any request is issued
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Request count or concurrency out of range
    #[error("Invalid run configuration: {0}")]
    InvalidRunConfig(String),

    /// Request template cannot be turned into an HTTP request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP client itself could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Hard failures of a benchmark session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BenchError {
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Target '{framework}' unreachable at {url} after {attempts} attempts: {reason}")]
    TargetUnreachable {
        framework: String,
        url: String,
        attempts: u32,
        reason: String,
    },
}

impl BenchError {
    /// Whether this error should abort a whole comparison.
    ///
    /// An unreachable target only invalidates its own (scenario, framework)
    /// pairing; a setup error means the harness itself is misconfigured.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BenchError::Setup(_))
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, BenchError::TargetUnreachable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_is_fatal() {
        let err: BenchError = SetupError::InvalidRunConfig("requests must be > 0".into()).into();
        assert!(err.is_fatal());
        assert!(!err.is_unreachable());
    }

    #[test]
    fn test_unreachable_is_not_fatal() {
        let err = BenchError::TargetUnreachable {
            framework: "actix".into(),
            url: "http://127.0.0.1:8081/".into(),
            attempts: 5,
            reason: "connection-refused".into(),
        };
        assert!(!err.is_fatal());
        assert!(err.is_unreachable());
        assert_eq!(
            err.to_string(),
            "Target 'actix' unreachable at http://127.0.0.1:8081/ after 5 attempts: connection-refused"
        );
    }
}
