//! Mock implementations for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use warden_core::{
    AuthcResult, AuthenticationError, AuthenticationInfo, AuthenticationListener,
    AuthenticationToken, AuthorizationInfo, AuthzResult, PrincipalCollection, Realm, TokenKind,
};

/// Scripted result of one `authentication_info` call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this account info.
    Succeed(AuthenticationInfo),
    /// Fail with this error.
    Fail(AuthenticationError),
    /// Report that the principal is unknown to this realm.
    Unknown,
}

/// Scripted realm with call counters.
///
/// Queued outcomes are consumed first; once the queue is empty every call
/// returns the default outcome.
///
/// Uses `std::sync::Mutex` internally to allow both sync and async usage
/// without requiring a tokio runtime for builder methods.
#[derive(Debug, Clone)]
pub struct MockRealm {
    name: String,
    supported: Vec<TokenKind>,
    queued: Arc<Mutex<VecDeque<MockOutcome>>>,
    default_outcome: MockOutcome,
    authorization: Option<AuthorizationInfo>,
    delay: Option<Duration>,
    authc_calls: Arc<AtomicUsize>,
    authz_calls: Arc<AtomicUsize>,
}

impl MockRealm {
    /// Realm supporting username/password tokens that knows nobody.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supported: vec![TokenKind::UsernamePassword],
            queued: Arc::new(Mutex::new(VecDeque::new())),
            default_outcome: MockOutcome::Unknown,
            authorization: None,
            delay: None,
            authc_calls: Arc::new(AtomicUsize::new(0)),
            authz_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always authenticate `principal`.
    #[must_use]
    pub fn succeeding(mut self, principal: &str) -> Self {
        let info = AuthenticationInfo::new(self.name.clone(), principal);
        self.default_outcome = MockOutcome::Succeed(info);
        self
    }

    /// Always return `info`.
    #[must_use]
    pub fn returning(mut self, info: AuthenticationInfo) -> Self {
        self.default_outcome = MockOutcome::Succeed(info);
        self
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn failing(mut self, error: AuthenticationError) -> Self {
        self.default_outcome = MockOutcome::Fail(error);
        self
    }

    /// Queue a one-shot outcome ahead of the default.
    #[must_use]
    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        if let Ok(mut guard) = self.queued.lock() {
            guard.push_back(outcome);
        }
        self
    }

    /// Replace the supported token kinds.
    #[must_use]
    pub fn with_supported(mut self, kinds: impl IntoIterator<Item = TokenKind>) -> Self {
        self.supported = kinds.into_iter().collect();
        self
    }

    /// Roles and permissions returned by `authorization_info`.
    #[must_use]
    pub fn with_authorization(mut self, authorization: AuthorizationInfo) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// Sleep before answering each authentication call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `authentication_info` calls so far.
    #[must_use]
    pub fn authc_calls(&self) -> usize {
        self.authc_calls.load(Ordering::SeqCst)
    }

    /// Number of `authorization_info` calls so far.
    #[must_use]
    pub fn authz_calls(&self) -> usize {
        self.authz_calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> MockOutcome {
        self.queued
            .lock()
            .ok()
            .and_then(|mut g| g.pop_front())
            .unwrap_or_else(|| self.default_outcome.clone())
    }
}

#[async_trait]
impl Realm for MockRealm {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, kind: &TokenKind) -> bool {
        self.supported.contains(kind)
    }

    async fn authentication_info(
        &self,
        _token: &AuthenticationToken,
    ) -> AuthcResult<Option<AuthenticationInfo>> {
        self.authc_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.next_outcome() {
            MockOutcome::Succeed(info) => Ok(Some(info)),
            MockOutcome::Fail(err) => Err(err),
            MockOutcome::Unknown => Ok(None),
        }
    }

    async fn authorization_info(
        &self,
        principals: &PrincipalCollection,
    ) -> AuthzResult<Option<AuthorizationInfo>> {
        self.authz_calls.fetch_add(1, Ordering::SeqCst);
        if principals.from_realm(&self.name).is_empty() {
            return Ok(None);
        }
        Ok(self.authorization.clone())
    }
}

/// A captured listener notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Login succeeded for this principal.
    Success(String),
    /// Login failed for this principal with this message.
    Failure(String, String),
    /// Logout of this primary principal.
    Logout(String),
}

/// Listener that records every notification.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuthListener {
    events: Arc<Mutex<Vec<AuthEvent>>>,
}

impl RecordingAuthListener {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events in order.
    #[must_use]
    pub fn events(&self) -> Vec<AuthEvent> {
        self.events.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Clear captured events.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }

    fn push(&self, event: AuthEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}

impl AuthenticationListener for RecordingAuthListener {
    fn on_success(&self, token: &AuthenticationToken, _info: &AuthenticationInfo) {
        self.push(AuthEvent::Success(token.principal().to_owned()));
    }

    fn on_failure(&self, token: &AuthenticationToken, error: &AuthenticationError) {
        self.push(AuthEvent::Failure(token.principal().to_owned(), error.to_string()));
    }

    fn on_logout(&self, principals: &PrincipalCollection) {
        let primary = principals.primary().map(ToString::to_string).unwrap_or_default();
        self.push(AuthEvent::Logout(primary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test_token;

    #[tokio::test]
    async fn test_mock_realm_counts_calls() {
        let realm = MockRealm::new("ldap").succeeding("alice");
        let info = realm.authentication_info(&test_token()).await.unwrap().unwrap();
        assert_eq!(info.principals().primary().unwrap().as_str(), "alice");
        realm.authentication_info(&test_token()).await.unwrap();
        assert_eq!(realm.authc_calls(), 2);
    }

    #[tokio::test]
    async fn test_mock_realm_queue_before_default() {
        let realm = MockRealm::new("db")
            .succeeding("alice")
            .with_outcome(MockOutcome::Fail(AuthenticationError::IncorrectCredentials {
                principal: "alice".into(),
            }));
        assert!(realm.authentication_info(&test_token()).await.is_err());
        assert!(realm.authentication_info(&test_token()).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_realm_unknown_by_default() {
        let realm = MockRealm::new("db");
        assert!(realm.authentication_info(&test_token()).await.unwrap().is_none());
        assert!(realm.supports(&TokenKind::UsernamePassword));
        assert!(!realm.supports(&TokenKind::Bearer));
    }

    #[test]
    fn test_recording_listener() {
        let listener = RecordingAuthListener::new();
        listener.on_success(&test_token(), &AuthenticationInfo::empty());
        listener.on_logout(&PrincipalCollection::single("db", "alice"));
        assert_eq!(
            listener.events(),
            vec![
                AuthEvent::Success("alice".into()),
                AuthEvent::Logout("alice".into())
            ]
        );
    }
}
