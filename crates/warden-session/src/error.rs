//! Session error types.

use thiserror::Error;

use crate::session::SessionId;

/// Errors from session operations.
///
/// [`SessionError::Expired`] is a specialization of
/// [`SessionError::Stopped`]: callers that only care whether the session is
/// dead use [`SessionError::is_stopped`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No session with this id exists.
    #[error("unknown session: {0}")]
    Unknown(SessionId),

    /// The session was stopped explicitly.
    #[error("session stopped: {0}")]
    Stopped(SessionId),

    /// The session exceeded its idle timeout.
    #[error("session expired: {0}")]
    Expired(SessionId),

    /// Attribute keys must not be blank.
    #[error("attribute key must not be blank")]
    InvalidAttributeKey,

    /// The session store failed.
    #[error("session storage error: {0}")]
    Storage(String),
}

impl SessionError {
    /// True for stopped and expired sessions.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped(_) | Self::Expired(_))
    }

    /// True only for expired sessions.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired(_))
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
