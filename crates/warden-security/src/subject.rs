//! The authenticated user as seen by application code.

use std::sync::Arc;

use warden_core::{Principal, PrincipalCollection};
use warden_session::{Session, SessionError, SessionId};

use crate::error::WardenResult;
use crate::manager::{REMEMBER_ME_ATTRIBUTE, RESERVED_ATTRIBUTE_PREFIX, SecurityManager};

/// A logged-in subject.
///
/// Holds its principals, its session id and the manager that created it;
/// pass it explicitly to whatever needs to make security decisions.
///
/// Checks and attribute access fail once the session has stopped or
/// expired. They do not count as access; call [`Subject::touch`] for that.
#[derive(Clone)]
pub struct Subject {
    manager: Arc<SecurityManager>,
    principals: PrincipalCollection,
    session_id: SessionId,
}

impl std::fmt::Debug for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("principals", &self.principals)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl Subject {
    pub(crate) fn new(
        manager: Arc<SecurityManager>,
        principals: PrincipalCollection,
        session_id: SessionId,
    ) -> Self {
        Self {
            manager,
            principals,
            session_id,
        }
    }

    /// All principals, tagged by realm.
    #[must_use]
    pub fn principals(&self) -> &PrincipalCollection {
        &self.principals
    }

    /// The primary principal.
    #[must_use]
    pub fn primary_principal(&self) -> Option<&Principal> {
        self.principals.primary()
    }

    /// The session this subject is bound to.
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Whether the session is still valid.
    pub async fn is_valid(&self) -> bool {
        self.manager.sessions.is_valid(&self.session_id).await
    }

    /// Snapshot of the session.
    ///
    /// # Errors
    ///
    /// [`WardenError::Session`](crate::WardenError::Session) once the
    /// session is gone.
    pub async fn session(&self) -> WardenResult<Session> {
        Ok(self.manager.sessions.get_session(&self.session_id).await?)
    }

    /// Record access, resetting the session's idle timer.
    ///
    /// # Errors
    ///
    /// As [`Subject::session`].
    pub async fn touch(&self) -> WardenResult<()> {
        Ok(self.manager.sessions.touch(&self.session_id).await?)
    }

    /// Whether the subject holds `permission`.
    ///
    /// # Errors
    ///
    /// As [`Subject::session`]; also fails for malformed permissions or
    /// unavailable realms.
    pub async fn is_permitted(&self, permission: &str) -> WardenResult<bool> {
        self.session().await?;
        Ok(self
            .manager
            .authorizer
            .is_permitted(&self.principals, permission)
            .await?)
    }

    /// Whether the subject holds every permission listed.
    ///
    /// # Errors
    ///
    /// As [`Subject::is_permitted`].
    pub async fn is_permitted_all(&self, permissions: &[&str]) -> WardenResult<bool> {
        self.session().await?;
        Ok(self
            .manager
            .authorizer
            .is_permitted_all(&self.principals, permissions)
            .await?)
    }

    /// Fail unless the subject holds `permission`.
    ///
    /// # Errors
    ///
    /// [`AuthorizationError::Unauthorized`](warden_core::AuthorizationError::Unauthorized)
    /// when the permission is missing, otherwise as [`Subject::is_permitted`].
    pub async fn check_permission(&self, permission: &str) -> WardenResult<()> {
        self.session().await?;
        Ok(self
            .manager
            .authorizer
            .check_permission(&self.principals, permission)
            .await?)
    }

    /// Whether the subject holds `role`.
    ///
    /// # Errors
    ///
    /// As [`Subject::session`]; also fails for unavailable realms.
    pub async fn has_role(&self, role: &str) -> WardenResult<bool> {
        self.session().await?;
        Ok(self.manager.authorizer.has_role(&self.principals, role).await?)
    }

    /// Whether the subject holds every role listed.
    ///
    /// # Errors
    ///
    /// As [`Subject::has_role`].
    pub async fn has_all_roles(&self, roles: &[&str]) -> WardenResult<bool> {
        self.session().await?;
        Ok(self
            .manager
            .authorizer
            .has_all_roles(&self.principals, roles)
            .await?)
    }

    /// Fail unless the subject holds `role`.
    ///
    /// # Errors
    ///
    /// [`AuthorizationError::MissingRole`](warden_core::AuthorizationError::MissingRole)
    /// when the role is missing, otherwise as [`Subject::has_role`].
    pub async fn check_role(&self, role: &str) -> WardenResult<()> {
        self.session().await?;
        Ok(self.manager.authorizer.check_role(&self.principals, role).await?)
    }

    /// Read a session attribute.
    ///
    /// # Errors
    ///
    /// As [`Subject::set_attribute`]. Reserved keys are read through
    /// [`Subject::principals`] and [`Subject::is_remembered`] instead.
    pub async fn get_attribute(&self, key: &str) -> WardenResult<Option<serde_json::Value>> {
        reject_reserved(key)?;
        Ok(self
            .manager
            .sessions
            .get_attribute(&self.session_id, key)
            .await?)
    }

    /// Whether the login that created this session asked to be remembered.
    ///
    /// # Errors
    ///
    /// As [`Subject::session`].
    pub async fn is_remembered(&self) -> WardenResult<bool> {
        let flag = self
            .manager
            .sessions
            .get_attribute(&self.session_id, REMEMBER_ME_ATTRIBUTE)
            .await?;
        Ok(matches!(flag, Some(serde_json::Value::Bool(true))))
    }

    /// Store a session attribute. `Value::Null` removes it.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidAttributeKey`] for blank keys and keys under
    /// the reserved `warden.` prefix, otherwise as [`Subject::session`].
    pub async fn set_attribute(
        &self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> WardenResult<()> {
        let key = key.into();
        reject_reserved(&key)?;
        Ok(self
            .manager
            .sessions
            .set_attribute(&self.session_id, key, value)
            .await?)
    }

    /// Remove a session attribute, returning its previous value.
    ///
    /// # Errors
    ///
    /// As [`Subject::set_attribute`].
    pub async fn remove_attribute(&self, key: &str) -> WardenResult<Option<serde_json::Value>> {
        reject_reserved(key)?;
        Ok(self
            .manager
            .sessions
            .remove_attribute(&self.session_id, key)
            .await?)
    }

    /// Log out. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// See [`SecurityManager::logout`].
    pub async fn logout(&self) -> WardenResult<()> {
        self.manager.logout(self).await
    }
}

fn reject_reserved(key: &str) -> Result<(), SessionError> {
    if key.starts_with(RESERVED_ATTRIBUTE_PREFIX) {
        return Err(SessionError::InvalidAttributeKey);
    }
    Ok(())
}
