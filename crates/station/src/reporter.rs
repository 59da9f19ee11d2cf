//! Outbound status sinks.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::types::{StationStatus, StatusUpdate};

/// Receives a status update on every station transition.
///
/// Fire-and-forget: implementations must not block, and the supervisor
/// never retries a delivery.
pub trait StatusReporter: Send + Sync {
    fn report(&self, update: StatusUpdate);
}

impl<F> StatusReporter for F
where
    F: Fn(StatusUpdate) + Send + Sync,
{
    fn report(&self, update: StatusUpdate) {
        self(update)
    }
}

/// Forwards updates into a bounded channel, dropping them when the
/// receiver is full or gone.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::Sender<StatusUpdate>,
}

impl ChannelReporter {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<StatusUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl StatusReporter for ChannelReporter {
    fn report(&self, update: StatusUpdate) {
        if let Err(e) = self.tx.try_send(update) {
            debug!(status = %update.status, "status update dropped: {e}");
        }
    }
}

/// Logs each update.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn report(&self, update: StatusUpdate) {
        match update.status {
            StationStatus::Disconnected => {
                warn!(status = %update.status, "station status changed")
            }
            _ => info!(
                status = %update.status,
                attempt = update.attempt,
                "station status changed"
            ),
        }
    }
}
