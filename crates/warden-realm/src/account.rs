//! Accounts held by [`crate::SimpleAccountRealm`].

use std::collections::BTreeSet;

use warden_crypto::StoredCredential;

/// A single in-memory account.
#[derive(Debug, Clone)]
pub struct SimpleAccount {
    username: String,
    credentials: StoredCredential,
    roles: BTreeSet<String>,
    permissions: BTreeSet<String>,
    locked: bool,
    credentials_expired: bool,
}

impl SimpleAccount {
    /// Account with no roles or permissions.
    #[must_use]
    pub fn new(username: impl Into<String>, credentials: StoredCredential) -> Self {
        Self {
            username: username.into(),
            credentials,
            roles: BTreeSet::new(),
            permissions: BTreeSet::new(),
            locked: false,
            credentials_expired: false,
        }
    }

    /// Add roles.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Add permission strings granted directly to this account.
    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Lock or unlock.
    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Mark credentials expired.
    #[must_use]
    pub fn credentials_expired(mut self, expired: bool) -> Self {
        self.credentials_expired = expired;
        self
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Stored credentials.
    #[must_use]
    pub fn credentials(&self) -> &StoredCredential {
        &self.credentials
    }

    /// Role names.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Direct permissions.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Whether the account is locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the credentials have expired.
    #[must_use]
    pub fn is_credentials_expired(&self) -> bool {
        self.credentials_expired
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}
