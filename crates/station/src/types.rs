//! Public types for the station supervisor.

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Connection state of the station interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not started, or reset by the operator.
    Idle,
    /// Connect request issued, no outcome yet.
    Connecting,
    /// Connection lost; waiting out the backoff before retry `attempt`.
    Retrying { attempt: u32 },
    /// Associated and addressed.
    Connected { address: Ipv4Addr },
    /// Retry budget exhausted.
    Failed,
}

impl ConnectionState {
    /// `Connected` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Connected { .. } | Self::Failed)
    }
}

/// Status values pushed to the [`StatusReporter`](crate::StatusReporter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStatus {
    Connecting,
    Retrying,
    Connected,
    /// Retry budget exhausted.
    Disconnected,
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Retrying => "retrying",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        })
    }
}

/// One status notification: the new status and the retry attempt number
/// (0 outside of `Retrying`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: StationStatus,
    pub attempt: u32,
}

impl StatusUpdate {
    pub fn new(status: StationStatus, attempt: u32) -> Self {
        Self { status, attempt }
    }
}

/// State published by the worker after every handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationSnapshot {
    pub state: ConnectionState,
    pub attempts_used: u32,
}

impl Default for StationSnapshot {
    fn default() -> Self {
        Self {
            state: ConnectionState::Idle,
            attempts_used: 0,
        }
    }
}

/// Terminal outcome latched in the [`WaitGate`](crate::WaitGate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Connected,
    Failed,
}

/// Result of [`WaitGate::wait`](crate::WaitGate::wait).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Connected,
    Failed,
    TimedOut,
}

impl From<GateOutcome> for WaitOutcome {
    fn from(outcome: GateOutcome) -> Self {
        match outcome {
            GateOutcome::Connected => Self::Connected,
            GateOutcome::Failed => Self::Failed,
        }
    }
}

/// How long a waiter is willing to block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTimeout {
    Forever,
    After(Duration),
}

impl WaitTimeout {
    /// Millisecond value that means "wait forever".
    pub const FOREVER_MS: u32 = u32::MAX;

    pub fn from_millis(ms: u32) -> Self {
        if ms == Self::FOREVER_MS {
            Self::Forever
        } else {
            Self::After(Duration::from_millis(u64::from(ms)))
        }
    }
}

impl From<Duration> for WaitTimeout {
    fn from(duration: Duration) -> Self {
        Self::After(duration)
    }
}

impl From<Option<Duration>> for WaitTimeout {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(Self::Forever, Self::After)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(ConnectionState::Failed.is_terminal());
        assert!(
            ConnectionState::Connected {
                address: Ipv4Addr::new(192, 168, 1, 20)
            }
            .is_terminal()
        );
        assert!(!ConnectionState::Idle.is_terminal());
        assert!(!ConnectionState::Retrying { attempt: 3 }.is_terminal());
    }

    #[test]
    fn max_millis_means_forever() {
        assert_eq!(WaitTimeout::from_millis(u32::MAX), WaitTimeout::Forever);
        assert_eq!(
            WaitTimeout::from_millis(1500),
            WaitTimeout::After(Duration::from_millis(1500))
        );
        assert_eq!(WaitTimeout::from(None), WaitTimeout::Forever);
    }

    #[test]
    fn gate_outcome_maps_to_wait_outcome() {
        assert_eq!(WaitOutcome::from(GateOutcome::Connected), WaitOutcome::Connected);
        assert_eq!(WaitOutcome::from(GateOutcome::Failed), WaitOutcome::Failed);
    }

    #[test]
    fn status_display() {
        assert_eq!(StationStatus::Retrying.to_string(), "retrying");
        assert_eq!(StationStatus::Disconnected.to_string(), "disconnected");
    }
}
