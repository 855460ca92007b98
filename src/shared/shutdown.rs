//! Graceful shutdown
//!
//! One [`ShutdownSignal`] is cloned into every long-running task (HTTP
//! server, delivery logger). OS signals or [`ShutdownSignal::trigger`] flip
//! it once; [`ShutdownCoordinator`] then bounds how long the drain may take.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Idempotent.
    pub fn trigger(&self) {
        let flipped = self.tx.send_if_modified(|triggered| !std::mem::replace(triggered, true));
        if flipped {
            info!("Shutdown requested");
        }
    }

    /// Resolves once triggered; immediately if it already was.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Trigger `shutdown` on SIGINT or SIGTERM (Ctrl+C elsewhere).
pub async fn listen_for_shutdown_signals(shutdown: ShutdownSignal) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Cannot listen for SIGTERM");
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => info!("SIGTERM received"),
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => info!("SIGINT received"),
                Err(e) => {
                    error!(error = %e, "Cannot listen for SIGINT");
                    return;
                }
            },
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for Ctrl+C");
            return;
        }
        info!("Ctrl+C received");
    }

    shutdown.trigger();
}

pub struct ShutdownCoordinator {
    signal: ShutdownSignal,
    grace: Duration,
}

impl ShutdownCoordinator {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            signal: ShutdownSignal::new(),
            grace: Duration::from_secs(timeout_secs),
        }
    }

    pub fn signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    pub fn start_signal_listener(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.signal.clone()));
    }

    /// Wait for the signal, then give `drain` the grace period.
    /// Returns `false` when it had to be abandoned.
    pub async fn shutdown_with_cleanup<F, Fut>(&self, drain: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        self.signal.wait().await;
        info!(grace_secs = self.grace.as_secs(), "Draining in-flight work");

        if tokio::time::timeout(self.grace, drain()).await.is_ok() {
            info!("Drain finished");
            true
        } else {
            warn!("Drain abandoned after {}s", self.grace.as_secs());
            false
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn waiters_wake_on_trigger() {
        let signal = ShutdownSignal::new();
        let waiter = signal.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });

        signal.trigger();
        handle.await.unwrap();
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn late_waiters_return_immediately() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn slow_drain_is_abandoned() {
        let coordinator = ShutdownCoordinator::new(0);
        coordinator.signal().trigger();
        let finished = coordinator
            .shutdown_with_cleanup(|| tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert!(!finished);
    }
}
