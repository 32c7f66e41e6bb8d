//! Realm backed by in-memory account and role tables.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use warden_core::{
    AuthcResult, AuthenticationError, AuthenticationInfo, AuthenticationToken, AuthorizationInfo,
    AuthzResult, PrincipalCollection, Realm, TokenKind,
};
use warden_crypto::{CredentialsMatcher, SimpleCredentialsMatcher};

use crate::account::SimpleAccount;

/// Realm holding accounts and role definitions in memory.
///
/// Lookup order on login: unknown principal, locked account, expired
/// credentials, failed-attempt limit, credential match. A successful match
/// resets the failure counter.
pub struct SimpleAccountRealm {
    name: String,
    supported: Vec<TokenKind>,
    matcher: Arc<dyn CredentialsMatcher>,
    max_failed_attempts: Option<u32>,
    accounts: DashMap<String, SimpleAccount>,
    roles: DashMap<String, BTreeSet<String>>,
    failures: DashMap<String, u32>,
}

impl std::fmt::Debug for SimpleAccountRealm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleAccountRealm")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .field("max_failed_attempts", &self.max_failed_attempts)
            .field("accounts", &self.accounts.len())
            .finish_non_exhaustive()
    }
}

impl SimpleAccountRealm {
    /// Empty realm accepting username/password tokens compared in plaintext.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supported: vec![TokenKind::UsernamePassword],
            matcher: Arc::new(SimpleCredentialsMatcher),
            max_failed_attempts: None,
            accounts: DashMap::new(),
            roles: DashMap::new(),
            failures: DashMap::new(),
        }
    }

    /// Compare credentials with `matcher`.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Arc<dyn CredentialsMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Token kinds this realm accepts.
    #[must_use]
    pub fn with_supported(mut self, kinds: impl IntoIterator<Item = TokenKind>) -> Self {
        self.supported = kinds.into_iter().collect();
        self
    }

    /// Refuse logins after `limit` consecutive failures.
    #[must_use]
    pub fn with_max_failed_attempts(mut self, limit: u32) -> Self {
        self.max_failed_attempts = Some(limit);
        self
    }

    /// Add or replace an account.
    pub fn add_account(&self, account: SimpleAccount) {
        tracing::debug!(realm = %self.name, username = account.username(), "account added");
        self.failures.remove(account.username());
        self.accounts.insert(account.username().to_owned(), account);
    }

    /// Remove an account. Returns whether it existed.
    pub fn remove_account(&self, username: &str) -> bool {
        self.failures.remove(username);
        self.accounts.remove(username).is_some()
    }

    /// Define `role` as carrying `permissions`.
    pub fn add_role<I, S>(&self, role: impl Into<String>, permissions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles
            .insert(role.into(), permissions.into_iter().map(Into::into).collect());
    }

    /// Lock or unlock an account. Returns whether the account exists.
    pub fn set_locked(&self, username: &str, locked: bool) -> bool {
        match self.accounts.get_mut(username) {
            Some(mut account) => {
                account.set_locked(locked);
                true
            },
            None => false,
        }
    }

    /// Consecutive failures recorded for `username`.
    #[must_use]
    pub fn failed_attempts(&self, username: &str) -> u32 {
        self.failures.get(username).map_or(0, |n| *n)
    }

    /// Clear the failure counter for `username`.
    pub fn reset_failed_attempts(&self, username: &str) {
        self.failures.remove(username);
    }

    /// Number of accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn record_failure(&self, username: &str) -> u32 {
        let mut count = self.failures.entry(username.to_owned()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    fn authorization_for(&self, account: &SimpleAccount) -> AuthorizationInfo {
        let mut info = AuthorizationInfo::new()
            .with_roles(account.roles().iter().cloned())
            .with_permissions(account.permissions().iter().cloned());
        for role in account.roles() {
            if let Some(perms) = self.roles.get(role) {
                info = info.with_permissions(perms.iter().cloned());
            }
        }
        info
    }
}

#[async_trait]
impl Realm for SimpleAccountRealm {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, kind: &TokenKind) -> bool {
        self.supported.contains(kind)
    }

    async fn authentication_info(
        &self,
        token: &AuthenticationToken,
    ) -> AuthcResult<Option<AuthenticationInfo>> {
        let username = token.principal();
        let Some(account) = self.accounts.get(username).map(|a| a.value().clone()) else {
            tracing::debug!(realm = %self.name, username, "no such account");
            return Ok(None);
        };

        if account.is_locked() {
            return Err(AuthenticationError::LockedAccount {
                principal: username.to_owned(),
            });
        }
        if account.is_credentials_expired() {
            return Err(AuthenticationError::ExpiredCredentials {
                principal: username.to_owned(),
            });
        }
        if let Some(limit) = self.max_failed_attempts {
            let attempts = self.failed_attempts(username);
            if attempts >= limit {
                return Err(AuthenticationError::ExcessiveAttempts {
                    principal: username.to_owned(),
                    attempts,
                });
            }
        }

        if !self.matcher.matches(token.credentials(), account.credentials()) {
            let attempts = self.record_failure(username);
            tracing::debug!(realm = %self.name, username, attempts, "credentials did not match");
            if self.max_failed_attempts.is_some_and(|limit| attempts >= limit) {
                return Err(AuthenticationError::ExcessiveAttempts {
                    principal: username.to_owned(),
                    attempts,
                });
            }
            return Err(AuthenticationError::IncorrectCredentials {
                principal: username.to_owned(),
            });
        }

        self.failures.remove(username);
        let info = AuthenticationInfo::new(self.name.clone(), username)
            .with_credentials(account.credentials().clone())
            .with_authorization(self.authorization_for(&account));
        Ok(Some(info))
    }

    async fn authorization_info(
        &self,
        principals: &PrincipalCollection,
    ) -> AuthzResult<Option<AuthorizationInfo>> {
        let ours = principals.from_realm(&self.name);
        if ours.is_empty() {
            return Ok(None);
        }
        let merged = ours
            .iter()
            .filter_map(|p| self.accounts.get(p.as_str()).map(|a| self.authorization_for(&a)))
            .fold(AuthorizationInfo::new(), AuthorizationInfo::merge);
        Ok(Some(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_crypto::{CredentialHash, HashAlgorithm, HashedCredentialsMatcher, StoredCredential};
    use warden_permission::{WildcardPermission, WildcardPermissionResolver};

    fn realm() -> SimpleAccountRealm {
        let realm = SimpleAccountRealm::new("memory");
        realm.add_account(
            SimpleAccount::new("alice", StoredCredential::new("secret"))
                .with_roles(["admin"])
                .with_permissions(["doc:read"]),
        );
        realm.add_role("admin", ["printer:*"]);
        realm
    }

    fn token(user: &str, pw: &str) -> AuthenticationToken {
        AuthenticationToken::username_password(user, pw)
    }

    #[tokio::test]
    async fn test_successful_login() {
        let realm = realm();
        let info = realm.authentication_info(&token("alice", "secret")).await.unwrap().unwrap();
        assert_eq!(info.principals().from_realm("memory")[0].as_str(), "alice");
        assert!(info.authorization().has_role("admin"));
        assert!(info.authorization().string_permissions().contains("printer:*"));
    }

    #[tokio::test]
    async fn test_unknown_account_is_none() {
        let realm = realm();
        assert!(realm.authentication_info(&token("bob", "x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_incorrect_credentials() {
        let realm = realm();
        let err = realm.authentication_info(&token("alice", "nope")).await.unwrap_err();
        assert!(matches!(err, AuthenticationError::IncorrectCredentials { .. }));
        assert_eq!(realm.failed_attempts("alice"), 1);
    }

    #[tokio::test]
    async fn test_locked_and_expired() {
        let realm = realm();
        assert!(realm.set_locked("alice", true));
        let err = realm.authentication_info(&token("alice", "secret")).await.unwrap_err();
        assert!(matches!(err, AuthenticationError::LockedAccount { .. }));
        realm.set_locked("alice", false);

        realm.add_account(
            SimpleAccount::new("carol", StoredCredential::new("pw")).credentials_expired(true),
        );
        let err = realm.authentication_info(&token("carol", "pw")).await.unwrap_err();
        assert!(matches!(err, AuthenticationError::ExpiredCredentials { .. }));
    }

    #[tokio::test]
    async fn test_excessive_attempts() {
        let realm = realm().with_max_failed_attempts(2);
        let first = realm.authentication_info(&token("alice", "x")).await.unwrap_err();
        assert!(matches!(first, AuthenticationError::IncorrectCredentials { .. }));
        let second = realm.authentication_info(&token("alice", "x")).await.unwrap_err();
        assert!(matches!(second, AuthenticationError::ExcessiveAttempts { attempts: 2, .. }));
        // Even the right password is refused until reset.
        let third = realm.authentication_info(&token("alice", "secret")).await.unwrap_err();
        assert!(matches!(third, AuthenticationError::ExcessiveAttempts { .. }));

        realm.reset_failed_attempts("alice");
        assert!(realm.authentication_info(&token("alice", "secret")).await.is_ok());
    }

    #[tokio::test]
    async fn test_success_resets_failures() {
        let realm = realm().with_max_failed_attempts(3);
        let _ = realm.authentication_info(&token("alice", "x")).await;
        assert_eq!(realm.failed_attempts("alice"), 1);
        realm.authentication_info(&token("alice", "secret")).await.unwrap();
        assert_eq!(realm.failed_attempts("alice"), 0);
    }

    #[tokio::test]
    async fn test_hashed_matcher() {
        let digest =
            CredentialHash::compute(HashAlgorithm::Sha256, b"pw", Some(b"salt".as_slice()), 2)
                .unwrap();
        let realm = SimpleAccountRealm::new("hashed").with_matcher(Arc::new(
            HashedCredentialsMatcher::new(HashAlgorithm::Sha256).with_iterations(2),
        ));
        realm.add_account(SimpleAccount::new(
            "dave",
            StoredCredential::new(digest.to_hex()).with_salt(b"salt".to_vec()),
        ));
        assert!(realm.authentication_info(&token("dave", "pw")).await.unwrap().is_some());
        assert!(realm.authentication_info(&token("dave", "pW")).await.is_err());
    }

    #[tokio::test]
    async fn test_authorization_info_only_for_own_principals() {
        let realm = realm();
        let foreign = PrincipalCollection::single("ldap", "alice");
        assert!(realm.authorization_info(&foreign).await.unwrap().is_none());

        let ours = PrincipalCollection::single("memory", "alice");
        let authz = realm.authorization_info(&ours).await.unwrap().unwrap();
        let resolver = WildcardPermissionResolver::new();
        let print = WildcardPermission::parse("printer:print:lp7200").unwrap();
        assert!(authz.implies(&print, &resolver, None));
        let write = WildcardPermission::parse("doc:write").unwrap();
        assert!(!authz.implies(&write, &resolver, None));
    }

    #[test]
    fn test_remove_account() {
        let realm = realm();
        assert_eq!(realm.account_count(), 1);
        assert!(realm.remove_account("alice"));
        assert!(!realm.remove_account("alice"));
    }
}
