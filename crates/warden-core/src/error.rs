//! Authentication and authorization error taxonomy.
//!
//! Realm implementations map transport failures (LDAP, database, HTTP) into
//! [`AuthenticationError::RealmUnavailable`] or
//! [`AuthorizationError::RealmUnavailable`] so callers only ever see the
//! variants below.

use thiserror::Error;
use warden_permission::PermissionError;

/// Errors produced while authenticating a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    /// The token failed a precondition (e.g. blank principal).
    #[error("invalid authentication token: {0}")]
    InvalidToken(String),

    /// The authenticator has no realms to consult.
    #[error("no realms configured")]
    NoRealmsConfigured,

    /// No realm accepts this kind of token.
    #[error("realm '{realm}' does not support {kind} tokens")]
    UnsupportedToken {
        /// The realm that was asked.
        realm: String,
        /// The token kind.
        kind: String,
    },

    /// No account exists for the submitted principal.
    #[error("unknown account: {principal}")]
    UnknownAccount {
        /// Submitted principal.
        principal: String,
    },

    /// Credentials did not match.
    #[error("incorrect credentials for {principal}")]
    IncorrectCredentials {
        /// Submitted principal.
        principal: String,
    },

    /// The account is locked.
    #[error("account locked: {principal}")]
    LockedAccount {
        /// Submitted principal.
        principal: String,
    },

    /// The account is disabled.
    #[error("account disabled: {principal}")]
    DisabledAccount {
        /// Submitted principal.
        principal: String,
    },

    /// The stored credentials have expired and must be renewed.
    #[error("credentials expired for {principal}")]
    ExpiredCredentials {
        /// Submitted principal.
        principal: String,
    },

    /// Too many consecutive failed attempts.
    #[error("excessive failed attempts for {principal} ({attempts})")]
    ExcessiveAttempts {
        /// Submitted principal.
        principal: String,
        /// Failed attempts recorded so far.
        attempts: u32,
    },

    /// The account is already in use where concurrent logins are forbidden.
    #[error("concurrent access denied for {principal}")]
    ConcurrentAccess {
        /// Submitted principal.
        principal: String,
    },

    /// Every realm was consulted but none produced account data.
    #[error("no account data found for {principal}")]
    NoAccount {
        /// Submitted principal.
        principal: String,
    },

    /// A realm's backing store could not be reached.
    #[error("realm '{realm}' unavailable: {reason}")]
    RealmUnavailable {
        /// The failing realm.
        realm: String,
        /// Underlying cause, already stringified.
        reason: String,
    },

    /// The attempt was cancelled between realm consultations.
    #[error("authentication cancelled")]
    Cancelled,
}

impl AuthenticationError {
    /// Caller-side mistakes detected before any realm was touched.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidToken(_) | Self::NoRealmsConfigured)
    }

    /// Failures describing the account or its credentials.
    #[must_use]
    pub fn is_account_failure(&self) -> bool {
        matches!(
            self,
            Self::UnknownAccount { .. }
                | Self::IncorrectCredentials { .. }
                | Self::LockedAccount { .. }
                | Self::DisabledAccount { .. }
                | Self::ExpiredCredentials { .. }
                | Self::ExcessiveAttempts { .. }
                | Self::ConcurrentAccess { .. }
                | Self::NoAccount { .. }
        )
    }
}

/// Result type for authentication operations.
pub type AuthcResult<T> = Result<T, AuthenticationError>;

/// Errors produced while checking roles or permissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The subject has no principals.
    #[error("subject is not authenticated")]
    Unauthenticated,

    /// The subject lacks a permission.
    #[error("{principal} is not permitted: {permission}")]
    Unauthorized {
        /// Primary principal of the subject.
        principal: String,
        /// The permission that was required.
        permission: String,
    },

    /// The subject lacks a role.
    #[error("{principal} does not have role '{role}'")]
    MissingRole {
        /// Primary principal of the subject.
        principal: String,
        /// The role that was required.
        role: String,
    },

    /// A permission string could not be parsed.
    #[error(transparent)]
    InvalidPermission(#[from] PermissionError),

    /// A realm's backing store could not be reached.
    #[error("realm '{realm}' unavailable: {reason}")]
    RealmUnavailable {
        /// The failing realm.
        realm: String,
        /// Underlying cause, already stringified.
        reason: String,
    },
}

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthorizationError>;
