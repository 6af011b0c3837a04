//! Resilience patterns for Gauntlet
//!
//! Bounded retries with backoff (used by the readiness probe) and a
//! cancellation signal shared by every worker of a load run.

pub mod backoff;
pub mod retry;
pub mod shutdown;

// Re-export commonly used types
pub use backoff::Backoff;
pub use retry::{RetryError, RetryExecutor, RetryPolicy};
pub use shutdown::{ShutdownCoordinator, ShutdownError, ShutdownListener};
