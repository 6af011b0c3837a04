//! Retry policy and executor

use log::{debug, info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::backoff::Backoff;
use crate::shutdown::ShutdownListener;

/// Bounded attempts with exponential backoff between them
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(20, Duration::from_millis(100), Duration::from_secs(2), 2.0)
    }
}

impl RetryPolicy {
    pub fn exponential(
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
        base: f64,
    ) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::new(initial_delay, max_delay, base),
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Retry executor
pub struct RetryExecutor {
    policy: RetryPolicy,
    shutdown: Option<ShutdownListener>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            shutdown: None,
        }
    }

    /// Abort the backoff sleep as soon as shutdown is signalled
    pub fn with_shutdown(mut self, listener: ShutdownListener) -> Self {
        self.shutdown = Some(listener);
        self
    }

    /// Call `f` with the 1-indexed attempt number until it succeeds,
    /// attempts run out or shutdown is signalled
    pub async fn execute<F, Fut, T, E>(&self, mut f: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if self.is_cancelled() {
                return Err(RetryError::Cancelled { attempts: attempt - 1 });
            }

            debug!("Executing attempt {} of {}", attempt, max_attempts);

            match f(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        info!("Operation succeeded after {} attempts", attempt);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if attempt >= max_attempts {
                        warn!("Operation failed after {} attempts: {}", attempt, error);
                        return Err(RetryError::MaxAttemptsExceeded {
                            attempts: attempt,
                            last_error: error,
                        });
                    }

                    let delay = self.policy.delay_for_attempt(attempt);
                    debug!(
                        "Attempt {} failed: {}. Retrying in {:?}",
                        attempt, error, delay
                    );

                    if !self.sleep_unless_cancelled(delay).await {
                        return Err(RetryError::Cancelled { attempts: attempt });
                    }

                    attempt += 1;
                }
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(ShutdownListener::is_triggered)
            .unwrap_or(false)
    }

    /// Returns false if shutdown interrupted the sleep
    async fn sleep_unless_cancelled(&self, delay: Duration) -> bool {
        match &self.shutdown {
            Some(listener) => {
                let mut listener = listener.clone();
                tokio::select! {
                    _ = sleep(delay) => true,
                    _ = listener.triggered() => false,
                }
            }
            None => {
                sleep(delay).await;
                true
            }
        }
    }
}

/// Retry error types
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts ({attempts}) exceeded. Last error: {last_error}")]
    MaxAttemptsExceeded { attempts: u32, last_error: E },

    /// Shutdown was signalled while retrying
    #[error("Cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::MaxAttemptsExceeded { attempts, .. }
            | RetryError::Cancelled { attempts } => *attempts,
        }
    }

    /// Get the underlying error if present
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::MaxAttemptsExceeded { last_error, .. } => Some(last_error),
            RetryError::Cancelled { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::ShutdownCoordinator;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::exponential(max_attempts, Duration::from_millis(1), Duration::from_millis(4), 2.0)
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let executor = RetryExecutor::new(fast_policy(3));

        let result = executor
            .execute(|attempt| {
                counter_clone.fetch_add(1, Ordering::Relaxed);
                async move {
                    if attempt < 3 {
                        Err(format!("connection refused on attempt {}", attempt))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(counter.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_retry_max_attempts_exceeded() {
        let executor = RetryExecutor::new(fast_policy(4));

        let result: Result<(), RetryError<String>> = executor
            .execute(|_| async { Err("always down".to_string()) })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RetryError::MaxAttemptsExceeded { .. }));
        assert_eq!(err.attempts(), 4);
        assert_eq!(err.into_inner().unwrap(), "always down");
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let executor = RetryExecutor::new(fast_policy(0));
        let result: Result<(), RetryError<String>> =
            executor.execute(|_| async { Err("down".to_string()) }).await;
        assert_eq!(result.unwrap_err().attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_backoff() {
        let coordinator = ShutdownCoordinator::new();
        let policy = RetryPolicy::exponential(100, Duration::from_secs(60), Duration::from_secs(60), 1.0);
        let executor = RetryExecutor::new(policy).with_shutdown(coordinator.subscribe());

        let trigger = coordinator.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(90)).await;
            trigger.shutdown();
        });

        let result: Result<(), RetryError<String>> =
            executor.execute(|_| async { Err("down".to_string()) }).await;

        let err = result.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.attempts(), 2);
    }
}
