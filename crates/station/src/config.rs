//! Supervisor configuration.

use std::time::Duration;

use crate::error::StationError;

/// Default retry cap.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay between a disconnect and the next connect request.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(2500);

/// Retry policy of the station supervisor.
///
/// The backoff is flat: every retry waits the same interval, with no growth
/// and no jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Disconnects tolerated before the station is declared failed.
    pub max_attempts: u32,
    /// Fixed delay before each reconnect.
    pub backoff: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl SupervisorConfig {
    pub fn validate(&self) -> Result<(), StationError> {
        if self.max_attempts == 0 {
            return Err(StationError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
