//! Readiness probe

use crate::scenario::Framework;
use gauntlet_config::ProbeConfig;
use gauntlet_core::{BenchError, FailureKind, SetupError};
use gauntlet_http::{HttpMethod, RequestExecutor, RequestSpec};
use gauntlet_resilience::{RetryError, RetryExecutor, RetryPolicy, ShutdownListener};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Why a single probe attempt did not count as ready
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("{0}")]
    Failed(FailureKind),

    #[error("unexpected status {0}")]
    Status(u16),
}

/// Result of waiting for a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready { attempts: u32 },
    Cancelled,
}

/// Polls a lightweight endpoint until it answers 2xx/3xx or attempts run out
#[derive(Clone)]
pub struct ReadinessProbe {
    executor: Arc<dyn RequestExecutor>,
    path: String,
    timeout: Duration,
    policy: RetryPolicy,
    shutdown: Option<ShutdownListener>,
}

impl ReadinessProbe {
    pub fn new(executor: Arc<dyn RequestExecutor>, config: &ProbeConfig) -> Self {
        Self {
            executor,
            path: config.path.clone(),
            timeout: config.timeout,
            policy: RetryPolicy::exponential(
                config.max_attempts,
                config.initial_delay,
                config.max_delay,
                config.backoff_base,
            ),
            shutdown: None,
        }
    }

    pub fn with_shutdown(mut self, listener: ShutdownListener) -> Self {
        self.shutdown = Some(listener);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Wait for `framework` to become ready.
    ///
    /// Returns `TargetUnreachable` once every attempt has failed, or a setup
    /// error if the probe URL cannot be built.
    pub async fn wait_ready(&self, framework: &Framework) -> Result<Readiness, BenchError> {
        let spec = RequestSpec::from_base(HttpMethod::Get, &framework.base_url, &self.path)
            .map_err(SetupError::from)?;

        let mut retry = RetryExecutor::new(self.policy.clone());
        if let Some(listener) = &self.shutdown {
            retry = retry.with_shutdown(listener.clone());
        }

        let executor = &self.executor;
        let timeout = self.timeout;
        let probe_spec = &spec;
        let result = retry
            .execute(|attempt| async move {
                let outcome = executor.execute(probe_spec, timeout).await;
                match (outcome.status(), outcome.failure()) {
                    (Some(status), _) if (200..400).contains(&status) => Ok(attempt),
                    (Some(status), _) => Err(ProbeError::Status(status)),
                    (None, Some(kind)) => Err(ProbeError::Failed(kind)),
                    (None, None) => Ok(attempt),
                }
            })
            .await;

        match result {
            Ok(attempts) => {
                info!(
                    "{} ready at {} after {} attempt(s)",
                    framework.name,
                    spec.url(),
                    attempts
                );
                Ok(Readiness::Ready { attempts })
            }
            Err(RetryError::Cancelled { .. }) => Ok(Readiness::Cancelled),
            Err(err) => {
                let attempts = err.attempts();
                let reason = err
                    .into_inner()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no response".to_string());
                warn!(
                    "{} unreachable at {} after {} attempts: {}",
                    framework.name,
                    spec.url(),
                    attempts,
                    reason
                );
                Err(BenchError::TargetUnreachable {
                    framework: framework.name.clone(),
                    url: spec.url().to_string(),
                    attempts,
                    reason,
                })
            }
        }
    }
}
