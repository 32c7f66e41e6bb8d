//! Authentication tokens submitted at login.

use std::fmt;

use warden_crypto::SecretBytes;

use crate::error::{AuthcResult, AuthenticationError};

/// The kind of token, used by realms to declare what they can handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Username plus password.
    UsernamePassword,
    /// Opaque bearer credential (API key, session ticket).
    Bearer,
    /// Application-defined token kind.
    Custom(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernamePassword => write!(f, "username-password"),
            Self::Bearer => write!(f, "bearer"),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// A login attempt: who is claiming to log in and with what proof.
///
/// Immutable once built. The credentials are wiped from memory when the
/// token is dropped.
///
/// # Example
///
/// ```
/// use warden_core::{AuthenticationToken, TokenKind};
///
/// let token = AuthenticationToken::username_password("alice", "s3cret")
///     .with_host("10.0.0.7")
///     .with_remember_me(true);
///
/// assert_eq!(token.kind(), &TokenKind::UsernamePassword);
/// assert_eq!(token.principal(), "alice");
/// assert!(!format!("{token:?}").contains("s3cret"));
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticationToken {
    kind: TokenKind,
    principal: String,
    credentials: SecretBytes,
    host: Option<String>,
    remember_me: bool,
}

impl AuthenticationToken {
    /// Build a token of any kind.
    #[must_use]
    pub fn new(
        kind: TokenKind,
        principal: impl Into<String>,
        credentials: impl Into<SecretBytes>,
    ) -> Self {
        Self {
            kind,
            principal: principal.into(),
            credentials: credentials.into(),
            host: None,
            remember_me: false,
        }
    }

    /// Username/password token.
    #[must_use]
    pub fn username_password(
        username: impl Into<String>,
        password: impl Into<SecretBytes>,
    ) -> Self {
        Self::new(TokenKind::UsernamePassword, username, password)
    }

    /// Bearer token identified by `key_id`; `secret` is the bearer value.
    #[must_use]
    pub fn bearer(key_id: impl Into<String>, secret: impl Into<SecretBytes>) -> Self {
        Self::new(TokenKind::Bearer, key_id, secret)
    }

    /// Record the remote address the attempt originated from.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Request a persistent identity across sessions.
    #[must_use]
    pub fn with_remember_me(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }

    /// Token kind.
    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The claimed identity.
    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// The submitted proof of identity.
    #[must_use]
    pub fn credentials(&self) -> &SecretBytes {
        &self.credentials
    }

    /// Originating host, if known.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Whether "remember me" was requested.
    #[must_use]
    pub fn is_remember_me(&self) -> bool {
        self.remember_me
    }

    /// Reject tokens that must never reach a realm.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidToken`] when the principal is
    /// blank.
    pub fn validate(&self) -> AuthcResult<()> {
        if self.principal.trim().is_empty() {
            return Err(AuthenticationError::InvalidToken(
                "principal must not be blank".to_owned(),
            ));
        }
        Ok(())
    }
}
