//! Error types for the radio boundary.

/// Errors produced by the underlying network stack or by hostname
/// validation before the stack is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RadioError {
    #[error("hostname too long: {len} bytes (max {max})")]
    HostnameTooLong { len: usize, max: usize },

    #[error("radio not started")]
    NotStarted,

    #[error("stack error {code}: {message}")]
    Stack { code: i32, message: String },
}
