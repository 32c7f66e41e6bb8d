//! Permission error types.

use thiserror::Error;

/// Errors raised while parsing or resolving permissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// The permission string is malformed.
    #[error("invalid permission format '{input}': {reason}")]
    InvalidFormat {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl PermissionError {
    pub(crate) fn invalid(input: &str, reason: &'static str) -> Self {
        Self::InvalidFormat {
            input: input.to_owned(),
            reason,
        }
    }
}

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;
