//! The security manager: login, logout and session resumption.

use std::sync::{Arc, Mutex};

use tracing::Instrument;
use warden_authc::{CancellationToken, ModularAuthenticator};
use warden_authz::ModularRealmAuthorizer;
use warden_core::{AuthenticationToken, AuthorizationError, PrincipalCollection};
use warden_session::{SessionContext, SessionError, SessionId, SessionManager, ValidationHandle};
use warden_telemetry::OperationContext;

use crate::error::{WardenError, WardenResult};
use crate::subject::Subject;

/// Session attribute holding the authenticated principals.
pub const PRINCIPALS_ATTRIBUTE: &str = "warden.principals";

/// Session attribute recording a "remember me" login.
pub const REMEMBER_ME_ATTRIBUTE: &str = "warden.remember_me";

/// Prefix of attribute keys managed by the security manager itself.
pub const RESERVED_ATTRIBUTE_PREFIX: &str = "warden.";

/// Entry point tying authentication, authorization and sessions together.
///
/// Built with [`SecurityManagerBuilder`](crate::SecurityManagerBuilder) and
/// shared behind an `Arc`; every [`Subject`] holds a reference back to it.
pub struct SecurityManager {
    pub(crate) authenticator: ModularAuthenticator,
    pub(crate) authorizer: Arc<ModularRealmAuthorizer>,
    pub(crate) sessions: Arc<SessionManager>,
    pub(crate) validation: Mutex<Option<ValidationHandle>>,
}

impl std::fmt::Debug for SecurityManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityManager")
            .field("authenticator", &self.authenticator)
            .field("authorizer", &self.authorizer)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl SecurityManager {
    /// The authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &ModularAuthenticator {
        &self.authenticator
    }

    /// The authorizer.
    #[must_use]
    pub fn authorizer(&self) -> &ModularRealmAuthorizer {
        &self.authorizer
    }

    /// The session manager.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Authenticate `token` and open a session for the result.
    ///
    /// The session takes its host from the token and stores the
    /// authenticated principals.
    ///
    /// # Errors
    ///
    /// [`WardenError::Authentication`] when login fails;
    /// [`WardenError::Session`] if the session cannot be created.
    pub async fn login(self: &Arc<Self>, token: &AuthenticationToken) -> WardenResult<Subject> {
        self.login_with_cancel(token, &CancellationToken::new()).await
    }

    /// As [`SecurityManager::login`], giving up between realms once `cancel`
    /// fires.
    ///
    /// # Errors
    ///
    /// As [`SecurityManager::login`]; a cancelled attempt fails with
    /// [`AuthenticationError::Cancelled`](warden_core::AuthenticationError::Cancelled).
    pub async fn login_with_cancel(
        self: &Arc<Self>,
        token: &AuthenticationToken,
        cancel: &CancellationToken,
    ) -> WardenResult<Subject> {
        let ctx = OperationContext::new("login").with_principal(token.principal());

        self.login_inner(token, cancel).instrument(ctx.span()).await
    }

    async fn login_inner(
        self: &Arc<Self>,
        token: &AuthenticationToken,
        cancel: &CancellationToken,
    ) -> WardenResult<Subject> {
        let info = self.authenticator.authenticate_with_cancel(token, cancel).await?;
        let principals = info.principals().clone();
        let stored = serde_json::to_value(&principals)
            .map_err(|e| WardenError::Serialization(e.to_string()))?;

        let mut context = SessionContext::new();
        if let Some(host) = token.host() {
            context = context.with_host(host);
        }
        let session_id = self.sessions.start(&context).await?;

        if let Err(e) = self.record_login(&session_id, stored, token.is_remember_me()).await {
            if let Err(stop_err) = self.sessions.stop(&session_id).await {
                tracing::warn!(
                    %session_id,
                    error = %stop_err,
                    "failed to stop half-initialized session"
                );
            }
            return Err(e);
        }

        tracing::info!(%session_id, principal = %principals, "login succeeded");
        Ok(Subject::new(Arc::clone(self), principals, session_id))
    }

    async fn record_login(
        &self,
        session_id: &SessionId,
        principals: serde_json::Value,
        remember_me: bool,
    ) -> WardenResult<()> {
        self.sessions
            .set_attribute(session_id, PRINCIPALS_ATTRIBUTE, principals)
            .await?;
        if remember_me {
            self.sessions
                .set_attribute(session_id, REMEMBER_ME_ATTRIBUTE, serde_json::Value::Bool(true))
                .await?;
        }
        Ok(())
    }

    /// End `subject`'s login.
    ///
    /// Listeners hear about the logout and cached authorization data is
    /// dropped before the session stops. A session that is already stopped,
    /// expired or purged counts as logged out.
    ///
    /// # Errors
    ///
    /// [`WardenError::Session`] only for storage failures.
    pub async fn logout(&self, subject: &Subject) -> WardenResult<()> {
        let ctx = OperationContext::new("logout")
            .with_principal(subject.principals().to_string())
            .with_session_id(*subject.session_id().as_uuid());

        self.logout_inner(subject).instrument(ctx.span()).await
    }

    async fn logout_inner(&self, subject: &Subject) -> WardenResult<()> {
        self.authenticator.notify_logout(subject.principals());
        self.authorizer.clear_cached(subject.principals());

        match self.sessions.stop(subject.session_id()).await {
            Ok(()) => {
                tracing::info!("logout complete");
                Ok(())
            },
            Err(e) if e.is_stopped() || matches!(e, SessionError::Unknown(_)) => {
                tracing::debug!(error = %e, "session already ended; treating as logged out");
                Ok(())
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Rebuild the [`Subject`] that owns `session_id`, counting as access.
    ///
    /// # Errors
    ///
    /// [`WardenError::Session`] if the session is unknown, stopped or
    /// expired; [`AuthorizationError::Unauthenticated`] if it never held a
    /// login.
    pub async fn resume(self: &Arc<Self>, session_id: SessionId) -> WardenResult<Subject> {
        self.sessions.touch(&session_id).await?;
        let Some(stored) = self
            .sessions
            .get_attribute(&session_id, PRINCIPALS_ATTRIBUTE)
            .await?
        else {
            return Err(AuthorizationError::Unauthenticated.into());
        };
        let principals: PrincipalCollection =
            serde_json::from_value(stored).map_err(|e| WardenError::Serialization(e.to_string()))?;
        if principals.is_empty() {
            return Err(AuthorizationError::Unauthenticated.into());
        }
        tracing::debug!(%session_id, principal = %principals, "subject resumed");
        Ok(Subject::new(Arc::clone(self), principals, session_id))
    }

    /// Start the periodic session sweep if enabled and not already running.
    ///
    /// Must be called from within a tokio runtime. Returns whether a sweep
    /// task is running afterwards.
    pub fn start_validation(&self) -> bool {
        let mut slot = self.validation.lock().unwrap_or_else(|e| {
            tracing::warn!("validation handle lock poisoned, recovering");
            e.into_inner()
        });
        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            return true;
        }
        *slot = self.sessions.spawn_validation();
        slot.is_some()
    }

    /// Stop the session sweep, waiting for it to exit.
    pub async fn shutdown(&self) {
        let handle = self
            .validation
            .lock()
            .unwrap_or_else(|e| {
                tracing::warn!("validation handle lock poisoned, recovering");
                e.into_inner()
            })
            .take();
        if let Some(handle) = handle {
            handle.shutdown().await;
            tracing::info!("session validation stopped");
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
