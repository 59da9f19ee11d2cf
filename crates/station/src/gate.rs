//! Broadcast latch that releases waiters on a terminal station outcome.

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::{GateOutcome, WaitOutcome, WaitTimeout};

/// Level-triggered latch: `Unset` until the supervisor signals, then `Set`
/// with the outcome until [`reset`](Self::reset).
///
/// Every current waiter is released by a single signal, and a waiter that
/// arrives after the gate is set returns immediately.
#[derive(Debug, Clone)]
pub struct WaitGate {
    tx: Arc<watch::Sender<Option<GateOutcome>>>,
}

impl WaitGate {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Latched outcome, if any.
    pub fn outcome(&self) -> Option<GateOutcome> {
        *self.tx.borrow()
    }

    /// Waits until the gate is set or `timeout` elapses.
    ///
    /// The waiter's subscription lives only for the duration of the call,
    /// so a timed-out waiter leaves nothing behind.
    pub async fn wait(&self, timeout: impl Into<WaitTimeout>) -> WaitOutcome {
        let mut rx = self.tx.subscribe();
        let latched = async move {
            match rx.wait_for(Option::is_some).await {
                Ok(outcome) => (*outcome).map_or(WaitOutcome::TimedOut, WaitOutcome::from),
                // Unreachable while `self` holds the sender.
                Err(_) => WaitOutcome::Failed,
            }
        };

        match timeout.into() {
            WaitTimeout::Forever => latched.await,
            WaitTimeout::After(limit) => tokio::time::timeout(limit, latched)
                .await
                .unwrap_or(WaitOutcome::TimedOut),
        }
    }

    /// Number of waiters currently blocked in [`wait`](Self::wait).
    pub fn waiters(&self) -> usize {
        self.tx.receiver_count()
    }

    pub(crate) fn signal_connected(&self) {
        self.tx.send_replace(Some(GateOutcome::Connected));
    }

    pub(crate) fn signal_failed(&self) {
        self.tx.send_replace(Some(GateOutcome::Failed));
    }

    pub(crate) fn reset(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for WaitGate {
    fn default() -> Self {
        Self::new()
    }
}
