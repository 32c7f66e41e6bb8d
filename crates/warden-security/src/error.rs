//! Security manager error types.

use thiserror::Error;
use warden_config::ConfigError;
use warden_core::{AuthenticationError, AuthorizationError};
use warden_permission::PermissionError;
use warden_session::SessionError;

/// Errors surfaced by [`SecurityManager`](crate::SecurityManager) and
/// [`Subject`](crate::Subject).
#[derive(Debug, Error)]
pub enum WardenError {
    /// Login failed.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// A role or permission check failed or could not be evaluated.
    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    /// The subject's session is gone or the store failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A permission string is malformed.
    #[error("Permission error: {0}")]
    Permission(#[from] PermissionError),

    /// A configured name does not map to anything known.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Session data could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WardenError {
    /// Whether the error means the subject must log in again.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        match self {
            Self::Session(e) => e.is_stopped() || matches!(e, SessionError::Unknown(_)),
            Self::Authorization(AuthorizationError::Unauthenticated) => true,
            _ => false,
        }
    }
}

/// Result type for security manager operations.
pub type WardenResult<T> = Result<T, WardenError>;

#[cfg(test)]
mod tests {
    use warden_session::SessionId;

    use super::*;

    #[test]
    fn test_requires_login() {
        let id = SessionId::new();
        assert!(WardenError::from(SessionError::Expired(id)).requires_login());
        assert!(WardenError::from(SessionError::Unknown(id)).requires_login());
        assert!(WardenError::from(AuthorizationError::Unauthenticated).requires_login());
        assert!(!WardenError::from(SessionError::Storage("down".into())).requires_login());
        assert!(!WardenError::InvalidConfig("x".into()).requires_login());
    }
}
