//! Assembly of a [`SecurityManager`].

use std::sync::{Arc, Mutex};

use warden_authc::{AuthenticationStrategy, ModularAuthenticator};
use warden_authz::ModularRealmAuthorizer;
use warden_config::Config;
use warden_core::{AuthenticationListener, Clock, Realm};
use warden_permission::{PermissionResolver, RolePermissionResolver};
use warden_session::{SessionDao, SessionListener, SessionManager, SessionManagerConfig};

use crate::config_bridge;
use crate::eviction::AuthzCacheEviction;
use crate::error::{WardenError, WardenResult};
use crate::manager::SecurityManager;

/// Builder for [`SecurityManager`].
///
/// The same realm list backs both authentication and authorization.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_security::SecurityManagerBuilder;
/// use warden_test::MockRealm;
///
/// let manager = SecurityManagerBuilder::new()
///     .with_realm(Arc::new(MockRealm::new("db").succeeding("alice")))
///     .build()
///     .unwrap();
/// assert_eq!(manager.authenticator().strategy().name(), "at_least_one_successful");
/// ```
#[must_use]
pub struct SecurityManagerBuilder {
    realms: Vec<Arc<dyn Realm>>,
    strategy: Option<Arc<dyn AuthenticationStrategy>>,
    authc_listeners: Vec<Arc<dyn AuthenticationListener>>,
    session_config: SessionManagerConfig,
    session_listeners: Vec<Arc<dyn SessionListener>>,
    session_dao: Option<Arc<dyn SessionDao>>,
    clock: Option<Arc<dyn Clock>>,
    permission_resolver: Option<Arc<dyn PermissionResolver>>,
    role_resolver: Option<Arc<dyn RolePermissionResolver>>,
    authorization_cache: bool,
}

impl Default for SecurityManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityManagerBuilder {
    /// Builder with default session settings and authorization caching on.
    pub fn new() -> Self {
        Self {
            realms: Vec::new(),
            strategy: None,
            authc_listeners: Vec::new(),
            session_config: SessionManagerConfig::default(),
            session_listeners: Vec::new(),
            session_dao: None,
            clock: None,
            permission_resolver: None,
            role_resolver: None,
            authorization_cache: true,
        }
    }

    /// Builder preloaded from a loaded [`Config`].
    ///
    /// # Errors
    ///
    /// [`WardenError::InvalidConfig`] if a configured name is unknown.
    pub fn from_config(config: &Config) -> WardenResult<Self> {
        Ok(Self::new()
            .with_strategy(config_bridge::to_strategy(&config.authentication)?)
            .with_session_config(config_bridge::to_session_config(&config.session))
            .with_permission_resolver(config_bridge::to_permission_resolver(&config.permissions))
            .with_authorization_cache(config.authorization.cache_enabled))
    }

    /// Append a realm.
    pub fn with_realm(mut self, realm: Arc<dyn Realm>) -> Self {
        self.realms.push(realm);
        self
    }

    /// Append several realms, keeping their order.
    pub fn with_realms(mut self, realms: impl IntoIterator<Item = Arc<dyn Realm>>) -> Self {
        self.realms.extend(realms);
        self
    }

    /// Multi-realm strategy.
    pub fn with_strategy(mut self, strategy: Arc<dyn AuthenticationStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Register an authentication listener.
    pub fn with_authentication_listener(
        mut self,
        listener: Arc<dyn AuthenticationListener>,
    ) -> Self {
        self.authc_listeners.push(listener);
        self
    }

    /// Session timeout and sweep settings.
    pub fn with_session_config(mut self, config: SessionManagerConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Register a session listener.
    pub fn with_session_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.session_listeners.push(listener);
        self
    }

    /// Session store.
    pub fn with_session_dao(mut self, dao: Arc<dyn SessionDao>) -> Self {
        self.session_dao = Some(dao);
        self
    }

    /// Clock for session timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Permission string resolver.
    pub fn with_permission_resolver(mut self, resolver: Arc<dyn PermissionResolver>) -> Self {
        self.permission_resolver = Some(resolver);
        self
    }

    /// Role-to-permission resolver.
    pub fn with_role_resolver(mut self, resolver: Arc<dyn RolePermissionResolver>) -> Self {
        self.role_resolver = Some(resolver);
        self
    }

    /// Whether authorization data is cached per principal.
    pub fn with_authorization_cache(mut self, enabled: bool) -> Self {
        self.authorization_cache = enabled;
        self
    }

    /// Build the manager.
    ///
    /// # Errors
    ///
    /// [`WardenError::InvalidConfig`] if no realm was added.
    pub fn build(self) -> WardenResult<Arc<SecurityManager>> {
        if self.realms.is_empty() {
            return Err(WardenError::InvalidConfig(
                "at least one realm is required".to_owned(),
            ));
        }

        let mut authenticator = ModularAuthenticator::new(self.realms.clone());
        if let Some(strategy) = self.strategy {
            authenticator = authenticator.with_strategy(strategy);
        }
        for listener in self.authc_listeners {
            authenticator = authenticator.with_listener(listener);
        }

        let mut authorizer = ModularRealmAuthorizer::new(self.realms);
        if let Some(resolver) = self.permission_resolver {
            authorizer = authorizer.with_permission_resolver(resolver);
        }
        if let Some(resolver) = self.role_resolver {
            authorizer = authorizer.with_role_resolver(resolver);
        }
        if self.authorization_cache {
            authorizer = authorizer.with_memory_cache();
        }
        let authorizer = Arc::new(authorizer);

        let mut sessions = SessionManager::new(self.session_config);
        if self.authorization_cache {
            let eviction = AuthzCacheEviction::new(Arc::clone(&authorizer));
            sessions = sessions.with_listener(Arc::new(eviction));
        }
        if let Some(dao) = self.session_dao {
            sessions = sessions.with_dao(dao);
        }
        if let Some(clock) = self.clock {
            sessions = sessions.with_clock(clock);
        }
        for listener in self.session_listeners {
            sessions = sessions.with_listener(listener);
        }

        tracing::info!(
            strategy = authenticator.strategy().name(),
            "security manager built"
        );

        Ok(Arc::new(SecurityManager {
            authenticator,
            authorizer,
            sessions: Arc::new(sessions),
            validation: Mutex::new(None),
        }))
    }
}

#[cfg(test)]
mod tests {
    use warden_test::MockRealm;

    use super::*;

    fn realm(name: &str) -> Arc<dyn Realm> {
        Arc::new(MockRealm::new(name).succeeding("alice"))
    }

    #[test]
    fn test_build_requires_a_realm() {
        let result = SecurityManagerBuilder::new().build();
        assert!(matches!(result, Err(WardenError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_config_applies_sections() {
        let mut config = Config::default();
        config.authentication.strategy = "first_successful".to_owned();
        config.session.timeout_secs = 60;
        config.session.validation_enabled = false;

        let manager = SecurityManagerBuilder::from_config(&config)
            .unwrap()
            .with_realm(realm("db"))
            .build()
            .unwrap();

        assert_eq!(manager.authenticator().strategy().name(), "first_successful");
        let session_config = manager.sessions().config();
        assert_eq!(
            session_config.global_timeout,
            Some(std::time::Duration::from_secs(60))
        );
        assert!(!session_config.validation_enabled);
    }

    #[test]
    fn test_from_config_rejects_unknown_strategy() {
        let mut config = Config::default();
        config.authentication.strategy = "majority".to_owned();
        assert!(matches!(
            SecurityManagerBuilder::from_config(&config),
            Err(WardenError::InvalidConfig(_))
        ));
    }
}
