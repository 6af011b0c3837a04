//! Run configuration and per-request outcomes

use crate::error::SetupError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Parameters of a single load run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total number of request attempts (N)
    pub requests: u64,

    /// Maximum number of requests in flight at once (C)
    pub concurrency: usize,

    /// Per-request deadline; a hung connection becomes a timeout outcome
    #[serde(with = "crate::serde_utils::duration_ms")]
    pub request_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            requests: 10_000,
            concurrency: 50,
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl RunConfig {
    pub fn new(requests: u64, concurrency: usize) -> Self {
        Self {
            requests,
            concurrency,
            ..Self::default()
        }
    }

    /// Smaller defaults for smoke testing
    pub fn quick() -> Self {
        Self::new(1_000, 10)
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.requests == 0 {
            return Err(SetupError::InvalidRunConfig(
                "request count must be greater than 0".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(SetupError::InvalidRunConfig(
                "concurrency must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(SetupError::InvalidRunConfig(
                "request timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of workers actually spawned: concurrency capped at the request count
    pub fn effective_concurrency(&self) -> usize {
        let requests = usize::try_from(self.requests).unwrap_or(usize::MAX);
        self.concurrency.min(requests)
    }
}

/// Why a request attempt did not count as a success
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    #[serde(rename = "connection-refused")]
    ConnectionRefused,
    #[serde(rename = "timeout")]
    Timeout,
    #[serde(rename = "transport-error")]
    Transport,
    #[serde(rename = "non-2xx-status")]
    NonSuccessStatus,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConnectionRefused => "connection-refused",
            FailureKind::Timeout => "timeout",
            FailureKind::Transport => "transport-error",
            FailureKind::NonSuccessStatus => "non-2xx-status",
        }
    }

    pub fn all() -> &'static [FailureKind] {
        &[
            FailureKind::ConnectionRefused,
            FailureKind::Timeout,
            FailureKind::Transport,
            FailureKind::NonSuccessStatus,
        ]
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recorded result of one executed request.
///
/// A failed outcome always carries exactly one [`FailureKind`]; a successful
/// one carries none. The status code is kept whenever a response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(with = "crate::serde_utils::duration_ms")]
    elapsed: Duration,
    status: Option<u16>,
    failure: Option<FailureKind>,
}

impl Outcome {
    /// Classify a received response by its status code
    pub fn from_status(elapsed: Duration, status: u16) -> Self {
        let failure = if (200..300).contains(&status) {
            None
        } else {
            Some(FailureKind::NonSuccessStatus)
        };
        Self {
            elapsed,
            status: Some(status),
            failure,
        }
    }

    /// An attempt that never produced a response
    pub fn failed(elapsed: Duration, kind: FailureKind) -> Self {
        Self {
            elapsed,
            status: None,
            failure: Some(kind),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Reclassify a refused connection as a transport error.
    ///
    /// Applies once the target has answered a readiness check: a refusal
    /// after that means the target went away mid-run.
    pub fn refused_as_transport(self) -> Self {
        match self.failure {
            Some(FailureKind::ConnectionRefused) => Self {
                failure: Some(FailureKind::Transport),
                ..self
            },
            _ => self,
        }
    }
}
