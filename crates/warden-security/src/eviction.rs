//! Drops cached authorization data when a login's session ends.

use std::sync::Arc;

use warden_authz::ModularRealmAuthorizer;
use warden_core::PrincipalCollection;
use warden_session::{Session, SessionListener};

use crate::manager::PRINCIPALS_ATTRIBUTE;

/// Session listener that clears the authorizer's cache for the principals
/// stored in a stopped or expired session.
pub(crate) struct AuthzCacheEviction {
    authorizer: Arc<ModularRealmAuthorizer>,
}

impl AuthzCacheEviction {
    pub(crate) fn new(authorizer: Arc<ModularRealmAuthorizer>) -> Self {
        Self { authorizer }
    }

    fn evict(&self, session: &Session) {
        let Some(stored) = session.attribute(PRINCIPALS_ATTRIBUTE) else {
            return;
        };
        match serde_json::from_value::<PrincipalCollection>(stored.clone()) {
            Ok(principals) => self.authorizer.clear_cached(&principals),
            Err(e) => tracing::warn!(
                session_id = %session.id(),
                error = %e,
                "stored principals unreadable; cached authorization not evicted"
            ),
        }
    }
}

impl SessionListener for AuthzCacheEviction {
    fn on_stop(&self, session: &Session) {
        self.evict(session);
    }

    fn on_expiration(&self, session: &Session) {
        self.evict(session);
    }
}
