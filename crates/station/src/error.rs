//! Error types for the station supervisor.

/// Errors surfaced by the supervisor.
///
/// Transient connectivity failures are never errors; they show up only as
/// status updates.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    #[error("invalid supervisor config: {0}")]
    InvalidConfig(String),

    #[error("supervisor stopped")]
    Stopped,
}
