//! Cancellation signal for load runs
//!
//! A `ShutdownCoordinator` owns a one-way flag. Every worker holds a
//! `ShutdownListener` and races its in-flight request against
//! `ShutdownListener::triggered`, so a single trigger stops the whole run.

use log::{info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Broadcasts a one-shot shutdown signal to any number of listeners
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Obtain a listener; listeners created after the trigger see it immediately
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }

    /// Signal shutdown. Returns `true` only for the call that flipped the flag.
    pub fn shutdown(&self) -> bool {
        let already = self.sender.send_replace(true);
        if !already {
            info!("Shutdown requested");
        }
        !already
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait for Ctrl-C and then trigger shutdown
    pub async fn shutdown_on_ctrl_c(&self) -> Result<(), ShutdownError> {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| ShutdownError::SignalHandler(e.to_string()))?;
        warn!("Interrupt received, cancelling outstanding requests");
        self.shutdown();
        Ok(())
    }

    /// Run `shutdown_on_ctrl_c` in the background
    pub fn spawn_ctrl_c_handler(&self) -> JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            if let Err(e) = coordinator.shutdown_on_ctrl_c().await {
                warn!("Ctrl-C handling disabled: {}", e);
            }
        })
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a `ShutdownCoordinator`
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// A listener that never fires
    pub fn never() -> Self {
        ShutdownCoordinator::new().subscribe()
    }

    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once shutdown has been signalled.
    ///
    /// Pends forever if the coordinator is dropped without triggering.
    pub async fn triggered(&mut self) {
        if self.receiver.wait_for(|triggered| *triggered).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Shutdown errors
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("Failed to install signal handler: {0}")]
    SignalHandler(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_listener_sees_trigger() {
        let coordinator = ShutdownCoordinator::new();
        let mut listener = coordinator.subscribe();
        assert!(!listener.is_triggered());

        let trigger = coordinator.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.shutdown();
        });

        tokio::time::timeout(Duration::from_secs(5), listener.triggered())
            .await
            .expect("listener should observe shutdown");
        assert!(listener.is_triggered());
        assert!(coordinator.is_shutting_down());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_trigger() {
        let coordinator = ShutdownCoordinator::new();
        assert!(coordinator.shutdown());
        assert!(!coordinator.shutdown());

        let mut listener = coordinator.subscribe();
        assert!(listener.is_triggered());
        tokio::time::timeout(Duration::from_millis(100), listener.triggered())
            .await
            .expect("already triggered");
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_listener_does_not_fire() {
        let mut listener = ShutdownListener::never();
        let fired = tokio::time::timeout(Duration::from_secs(60), listener.triggered()).await;
        assert!(fired.is_err());
        assert!(!listener.is_triggered());
    }
}
