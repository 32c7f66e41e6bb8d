//! Realm orchestration for a single login attempt.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use warden_core::{
    AuthcResult, AuthenticationError, AuthenticationInfo, AuthenticationListener,
    AuthenticationToken, PrincipalCollection, Realm,
};

use crate::strategy::{AtLeastOneSuccessfulStrategy, AttemptFlow, AuthenticationStrategy};

/// Authenticates tokens against one or more realms.
///
/// With one realm the token goes straight to it. With several, realms that
/// support the token are consulted in configuration order and the
/// [`AuthenticationStrategy`] decides how their outcomes combine.
///
/// The realm list is read-mostly; [`ModularAuthenticator::set_realms`] swaps
/// it atomically and attempts already running keep their snapshot.
pub struct ModularAuthenticator {
    realms: RwLock<Arc<[Arc<dyn Realm>]>>,
    strategy: Arc<dyn AuthenticationStrategy>,
    listeners: Vec<Arc<dyn AuthenticationListener>>,
}

impl std::fmt::Debug for ModularAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModularAuthenticator")
            .field("strategy", &self.strategy.name())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl ModularAuthenticator {
    /// Authenticator over `realms` using [`AtLeastOneSuccessfulStrategy`].
    #[must_use]
    pub fn new(realms: Vec<Arc<dyn Realm>>) -> Self {
        Self {
            realms: RwLock::new(realms.into()),
            strategy: Arc::new(AtLeastOneSuccessfulStrategy::new()),
            listeners: Vec::new(),
        }
    }

    /// Replace the multi-realm strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn AuthenticationStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Register a listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn AuthenticationListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// The active strategy.
    #[must_use]
    pub fn strategy(&self) -> &Arc<dyn AuthenticationStrategy> {
        &self.strategy
    }

    /// Snapshot of the configured realms.
    pub async fn realms(&self) -> Arc<[Arc<dyn Realm>]> {
        Arc::clone(&*self.realms.read().await)
    }

    /// Replace the realm list.
    pub async fn set_realms(&self, realms: Vec<Arc<dyn Realm>>) {
        let names: Vec<&str> = realms.iter().map(|r| r.name()).collect();
        tracing::info!(realms = ?names, "realm list replaced");
        *self.realms.write().await = realms.into();
    }

    /// Authenticate `token`.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthenticationError`] chosen by the single realm or the
    /// strategy. Precondition failures ([`AuthenticationError::InvalidToken`],
    /// [`AuthenticationError::NoRealmsConfigured`]) are returned before any
    /// realm is touched and are not reported to listeners.
    pub async fn authenticate(
        &self,
        token: &AuthenticationToken,
    ) -> AuthcResult<AuthenticationInfo> {
        self.authenticate_with_cancel(token, &CancellationToken::new()).await
    }

    /// Authenticate `token`, giving up between realm consultations once
    /// `cancel` fires. A realm call already in flight is allowed to finish.
    ///
    /// # Errors
    ///
    /// As [`ModularAuthenticator::authenticate`], plus
    /// [`AuthenticationError::Cancelled`].
    pub async fn authenticate_with_cancel(
        &self,
        token: &AuthenticationToken,
        cancel: &CancellationToken,
    ) -> AuthcResult<AuthenticationInfo> {
        token.validate()?;
        let realms = self.realms().await;
        if realms.is_empty() {
            return Err(AuthenticationError::NoRealmsConfigured);
        }

        let result = match realms.as_ref() {
            [realm] => self.single_realm(realm.as_ref(), token, cancel).await,
            _ => self.multi_realm(&realms, token, cancel).await,
        };

        match &result {
            Ok(info) => {
                tracing::info!(
                    principal = token.principal(),
                    realms = ?info.principals().realm_names().collect::<Vec<_>>(),
                    "authentication succeeded"
                );
                for listener in &self.listeners {
                    listener.on_success(token, info);
                }
            },
            Err(error) => {
                tracing::warn!(principal = token.principal(), %error, "authentication failed");
                for listener in &self.listeners {
                    listener.on_failure(token, error);
                }
            },
        }
        result
    }

    /// Tell listeners that `principals` logged out.
    pub fn notify_logout(&self, principals: &PrincipalCollection) {
        tracing::debug!(principal = %principals, "notifying logout");
        for listener in &self.listeners {
            listener.on_logout(principals);
        }
    }

    async fn single_realm(
        &self,
        realm: &dyn Realm,
        token: &AuthenticationToken,
        cancel: &CancellationToken,
    ) -> AuthcResult<AuthenticationInfo> {
        if !realm.supports(token.kind()) {
            return Err(AuthenticationError::UnsupportedToken {
                realm: realm.name().to_owned(),
                kind: token.kind().to_string(),
            });
        }
        if cancel.is_cancelled() {
            return Err(AuthenticationError::Cancelled);
        }
        tracing::debug!(realm = realm.name(), "consulting realm");
        match realm.authentication_info(token).await? {
            Some(info) if !info.is_empty() => Ok(info),
            _ => Err(AuthenticationError::UnknownAccount {
                principal: token.principal().to_owned(),
            }),
        }
    }

    async fn multi_realm(
        &self,
        realms: &[Arc<dyn Realm>],
        token: &AuthenticationToken,
        cancel: &CancellationToken,
    ) -> AuthcResult<AuthenticationInfo> {
        let supporting: Vec<Arc<dyn Realm>> = realms
            .iter()
            .filter(|r| r.supports(token.kind()))
            .cloned()
            .collect();
        if supporting.is_empty() {
            let names: Vec<&str> = realms.iter().map(|r| r.name()).collect();
            return Err(AuthenticationError::UnsupportedToken {
                realm: names.join(","),
                kind: token.kind().to_string(),
            });
        }

        let strategy = self.strategy.as_ref();
        let mut aggregate = strategy.before_all_attempts(&supporting, token)?;
        let mut last_error = None;

        for realm in &supporting {
            if cancel.is_cancelled() {
                tracing::debug!(realm = realm.name(), "attempt cancelled before realm");
                return Err(AuthenticationError::Cancelled);
            }

            match strategy.before_attempt(realm.as_ref(), token, aggregate) {
                AttemptFlow::Continue(next) => aggregate = next,
                AttemptFlow::Stop(next) => {
                    aggregate = next;
                    break;
                },
                AttemptFlow::Abort(error) => return Err(error),
            }

            tracing::debug!(realm = realm.name(), strategy = strategy.name(), "consulting realm");
            let (single, error) = match realm.authentication_info(token).await {
                Ok(single) => (single, None),
                Err(error) => (None, Some(error)),
            };

            match strategy.after_attempt(realm.as_ref(), token, single, aggregate, error.as_ref()) {
                AttemptFlow::Continue(next) => aggregate = next,
                AttemptFlow::Stop(next) => {
                    aggregate = next;
                    break;
                },
                AttemptFlow::Abort(error) => return Err(error),
            }

            if error.is_some() {
                last_error = error;
            }
        }

        strategy.after_all_attempts(token, aggregate, last_error)
    }
}

#[cfg(test)]
#[path = "authenticator_tests.rs"]
mod tests;
