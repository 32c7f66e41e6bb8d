//! Permission and role checks across realms.

use std::sync::Arc;

use warden_core::{
    AuthorizationError, AuthorizationInfo, AuthzResult, Cache, MemoryCache, Principal,
    PrincipalCollection, Realm,
};
use warden_permission::{
    Permission, PermissionResolver, RolePermissionResolver, WildcardPermissionResolver,
};

/// Cache key for one realm's view of one subject.
///
/// Only the principals that realm itself contributed are part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthzCacheKey {
    /// Realm name.
    pub realm: String,
    /// Principals contributed by `realm`, in order.
    pub principals: Vec<Principal>,
}

impl AuthzCacheKey {
    /// Key for `realm`'s principals in `principals`, or `None` when the
    /// realm contributed none.
    #[must_use]
    pub fn for_realm(realm: &str, principals: &PrincipalCollection) -> Option<Self> {
        let ours = principals.from_realm(realm);
        if ours.is_empty() {
            return None;
        }
        Some(Self {
            realm: realm.to_owned(),
            principals: ours.to_vec(),
        })
    }
}

/// Authorizer consulting a fixed list of realms.
pub struct ModularRealmAuthorizer {
    realms: Vec<Arc<dyn Realm>>,
    resolver: Arc<dyn PermissionResolver>,
    role_resolver: Option<Arc<dyn RolePermissionResolver>>,
    cache: Option<Arc<dyn Cache<AuthzCacheKey, AuthorizationInfo>>>,
}

impl std::fmt::Debug for ModularRealmAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModularRealmAuthorizer")
            .field("realms", &self.realms.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("role_resolver", &self.role_resolver.is_some())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl ModularRealmAuthorizer {
    /// Uncached authorizer parsing permissions case-insensitively.
    #[must_use]
    pub fn new(realms: Vec<Arc<dyn Realm>>) -> Self {
        Self {
            realms,
            resolver: Arc::new(WildcardPermissionResolver::new()),
            role_resolver: None,
            cache: None,
        }
    }

    /// Resolve permission strings with `resolver`.
    #[must_use]
    pub fn with_permission_resolver(mut self, resolver: Arc<dyn PermissionResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Expand role names into permissions with `resolver`.
    #[must_use]
    pub fn with_role_resolver(mut self, resolver: Arc<dyn RolePermissionResolver>) -> Self {
        self.role_resolver = Some(resolver);
        self
    }

    /// Memoize realm lookups in `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn Cache<AuthzCacheKey, AuthorizationInfo>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Memoize realm lookups in an in-process [`MemoryCache`].
    #[must_use]
    pub fn with_memory_cache(self) -> Self {
        self.with_cache(Arc::new(MemoryCache::<AuthzCacheKey, AuthorizationInfo>::new()))
    }

    /// The permission resolver in use.
    #[must_use]
    pub fn permission_resolver(&self) -> &Arc<dyn PermissionResolver> {
        &self.resolver
    }

    /// Whether the subject holds `permission`.
    ///
    /// Subjects without principals hold nothing.
    ///
    /// # Errors
    ///
    /// [`AuthorizationError::InvalidPermission`] if `permission` does not
    /// parse; [`AuthorizationError::RealmUnavailable`] from realms.
    pub async fn is_permitted(
        &self,
        principals: &PrincipalCollection,
        permission: &str,
    ) -> AuthzResult<bool> {
        let required = self.resolver.resolve(permission)?;
        self.is_permitted_object(principals, required.as_ref()).await
    }

    /// Whether the subject holds an already-parsed permission.
    ///
    /// # Errors
    ///
    /// Propagates realm failures.
    pub async fn is_permitted_object(
        &self,
        principals: &PrincipalCollection,
        required: &dyn Permission,
    ) -> AuthzResult<bool> {
        if principals.is_empty() {
            return Ok(false);
        }
        for realm in &self.realms {
            let Some(info) = self.info_for(realm.as_ref(), principals).await? else {
                continue;
            };
            if info.implies(required, self.resolver.as_ref(), self.role_resolver.as_deref()) {
                tracing::trace!(
                    realm = realm.name(),
                    principal = %principals,
                    permission = %required,
                    "permission granted"
                );
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the subject holds every permission in `permissions`.
    ///
    /// # Errors
    ///
    /// As [`ModularRealmAuthorizer::is_permitted`].
    pub async fn is_permitted_all(
        &self,
        principals: &PrincipalCollection,
        permissions: &[&str],
    ) -> AuthzResult<bool> {
        for permission in permissions {
            if !self.is_permitted(principals, permission).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Fail unless the subject holds `permission`.
    ///
    /// # Errors
    ///
    /// [`AuthorizationError::Unauthenticated`] without principals,
    /// [`AuthorizationError::Unauthorized`] when denied, or any error from
    /// [`ModularRealmAuthorizer::is_permitted`].
    pub async fn check_permission(
        &self,
        principals: &PrincipalCollection,
        permission: &str,
    ) -> AuthzResult<()> {
        let primary = principals.primary().ok_or(AuthorizationError::Unauthenticated)?;
        if self.is_permitted(principals, permission).await? {
            Ok(())
        } else {
            tracing::debug!(principal = %primary, permission, "permission denied");
            Err(AuthorizationError::Unauthorized {
                principal: primary.to_string(),
                permission: permission.to_owned(),
            })
        }
    }

    /// Whether the subject holds `role` in any realm.
    ///
    /// # Errors
    ///
    /// Propagates realm failures.
    pub async fn has_role(
        &self,
        principals: &PrincipalCollection,
        role: &str,
    ) -> AuthzResult<bool> {
        if principals.is_empty() {
            return Ok(false);
        }
        for realm in &self.realms {
            if let Some(info) = self.info_for(realm.as_ref(), principals).await?
                && info.has_role(role)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the subject holds every role in `roles`.
    ///
    /// # Errors
    ///
    /// Propagates realm failures.
    pub async fn has_all_roles(
        &self,
        principals: &PrincipalCollection,
        roles: &[&str],
    ) -> AuthzResult<bool> {
        for role in roles {
            if !self.has_role(principals, role).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Fail unless the subject holds `role`.
    ///
    /// # Errors
    ///
    /// [`AuthorizationError::Unauthenticated`] without principals,
    /// [`AuthorizationError::MissingRole`] when the role is absent.
    pub async fn check_role(
        &self,
        principals: &PrincipalCollection,
        role: &str,
    ) -> AuthzResult<()> {
        let primary = principals.primary().ok_or(AuthorizationError::Unauthenticated)?;
        if self.has_role(principals, role).await? {
            Ok(())
        } else {
            Err(AuthorizationError::MissingRole {
                principal: primary.to_string(),
                role: role.to_owned(),
            })
        }
    }

    /// Drop cached authorization data for the subject in every realm.
    pub fn clear_cached(&self, principals: &PrincipalCollection) {
        let Some(cache) = &self.cache else {
            return;
        };
        for realm in &self.realms {
            if let Some(key) = AuthzCacheKey::for_realm(realm.name(), principals) {
                cache.remove(&key);
            }
        }
        tracing::debug!(principal = %principals, "cleared cached authorization");
    }

    /// Number of cached realm lookups, or `None` without a cache.
    #[must_use]
    pub fn cached_entries(&self) -> Option<usize> {
        self.cache.as_ref().map(|cache| cache.len())
    }

    async fn info_for(
        &self,
        realm: &dyn Realm,
        principals: &PrincipalCollection,
    ) -> AuthzResult<Option<AuthorizationInfo>> {
        let key = self
            .cache
            .as_ref()
            .and_then(|_| AuthzCacheKey::for_realm(realm.name(), principals));

        if let (Some(cache), Some(key)) = (&self.cache, &key)
            && let Some(hit) = cache.get(key)
        {
            return Ok(Some(hit));
        }

        let info = realm.authorization_info(principals).await?;
        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.put(key, info.clone().unwrap_or_default());
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_permission::StaticRolePermissionResolver;
    use warden_test::MockRealm;

    fn shared(realm: MockRealm) -> Arc<dyn Realm> {
        Arc::new(realm)
    }

    fn alice() -> PrincipalCollection {
        PrincipalCollection::single("db", "alice")
    }

    fn db_realm() -> MockRealm {
        MockRealm::new("db").with_authorization(
            AuthorizationInfo::new()
                .with_role("user")
                .with_permission("printer:print,query"),
        )
    }

    #[tokio::test]
    async fn test_permission_checks() {
        let authz = ModularRealmAuthorizer::new(vec![shared(db_realm())]);
        assert!(authz.is_permitted(&alice(), "printer:print:lp7200").await.unwrap());
        assert!(authz.is_permitted(&alice(), "PRINTER:query").await.unwrap());
        assert!(!authz.is_permitted(&alice(), "printer:manage").await.unwrap());
        assert!(
            authz
                .is_permitted_all(&alice(), &["printer:print", "printer:query"])
                .await
                .unwrap()
        );
        assert!(
            !authz
                .is_permitted_all(&alice(), &["printer:print", "doc:read"])
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_check_permission_errors() {
        let authz = ModularRealmAuthorizer::new(vec![shared(db_realm())]);
        let err = authz.check_permission(&alice(), "doc:read").await.unwrap_err();
        assert!(matches!(
            err,
            AuthorizationError::Unauthorized { principal, .. } if principal == "alice"
        ));

        let err = authz
            .check_permission(&PrincipalCollection::new(), "doc:read")
            .await
            .unwrap_err();
        assert_eq!(err, AuthorizationError::Unauthenticated);

        let err = authz.check_permission(&alice(), "a::b").await.unwrap_err();
        assert!(matches!(err, AuthorizationError::InvalidPermission(_)));
    }

    #[tokio::test]
    async fn test_role_checks() {
        let authz = ModularRealmAuthorizer::new(vec![shared(db_realm())]);
        assert!(authz.has_role(&alice(), "user").await.unwrap());
        assert!(!authz.has_all_roles(&alice(), &["user", "admin"]).await.unwrap());
        let err = authz.check_role(&alice(), "admin").await.unwrap_err();
        assert!(matches!(err, AuthorizationError::MissingRole { role, .. } if role == "admin"));
        assert!(authz.check_role(&alice(), "user").await.is_ok());
    }

    #[tokio::test]
    async fn test_any_realm_may_grant() {
        let ldap = MockRealm::new("ldap")
            .with_authorization(AuthorizationInfo::new().with_permission("doc:*"));
        let authz = ModularRealmAuthorizer::new(vec![shared(db_realm()), shared(ldap)]);

        let mut principals = alice();
        principals.add("ldap", "alice@corp");
        assert!(authz.is_permitted(&principals, "doc:write").await.unwrap());
        assert!(authz.is_permitted(&principals, "printer:print").await.unwrap());
        // Without an ldap principal the ldap realm grants nothing.
        assert!(!authz.is_permitted(&alice(), "doc:write").await.unwrap());
    }

    #[tokio::test]
    async fn test_role_resolver_expands_roles() {
        let roles = StaticRolePermissionResolver::new()
            .with_role("user", ["doc:read"])
            .unwrap();
        let authz = ModularRealmAuthorizer::new(vec![shared(db_realm())])
            .with_role_resolver(Arc::new(roles));
        assert!(authz.is_permitted(&alice(), "doc:read:42").await.unwrap());
    }

    #[tokio::test]
    async fn test_cache_avoids_repeat_lookups() {
        let realm = db_realm();
        let authz = ModularRealmAuthorizer::new(vec![shared(realm.clone())]).with_memory_cache();

        assert!(authz.is_permitted(&alice(), "printer:print").await.unwrap());
        assert!(authz.has_role(&alice(), "user").await.unwrap());
        assert_eq!(realm.authz_calls(), 1);

        authz.clear_cached(&alice());
        assert!(authz.has_role(&alice(), "user").await.unwrap());
        assert_eq!(realm.authz_calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_is_scoped_to_each_realms_principals() {
        let ldap = MockRealm::new("ldap")
            .with_authorization(AuthorizationInfo::new().with_permission("doc:read"));
        let db = MockRealm::new("db")
            .with_authorization(AuthorizationInfo::new().with_permission("admin:*"));
        let realms = vec![shared(ldap), shared(db.clone())];
        let cached = ModularRealmAuthorizer::new(realms.clone()).with_memory_cache();
        let uncached = ModularRealmAuthorizer::new(realms);

        let db_alice = PrincipalCollection::single("db", "alice");
        let ldap_alice = PrincipalCollection::single("ldap", "alice");

        assert!(cached.is_permitted(&db_alice, "admin:delete").await.unwrap());
        assert!(!uncached.is_permitted(&ldap_alice, "admin:delete").await.unwrap());
        assert!(!cached.is_permitted(&ldap_alice, "admin:delete").await.unwrap());
        assert!(cached.is_permitted(&ldap_alice, "doc:read").await.unwrap());

        // db holds one entry for its own alice and none for ldap's.
        assert_eq!(cached.cached_entries(), Some(2));
        let before = db.authz_calls();
        assert!(cached.is_permitted(&db_alice, "admin:delete").await.unwrap());
        assert_eq!(db.authz_calls(), before);
    }

    #[tokio::test]
    async fn test_clear_cached_removes_only_that_subject() {
        let realm = db_realm();
        let authz = ModularRealmAuthorizer::new(vec![shared(realm.clone())]).with_memory_cache();
        let bob = PrincipalCollection::single("db", "bob");

        authz.has_role(&alice(), "user").await.unwrap();
        authz.has_role(&bob, "user").await.unwrap();
        assert_eq!(authz.cached_entries(), Some(2));

        authz.clear_cached(&alice());
        assert_eq!(authz.cached_entries(), Some(1));
        authz.has_role(&bob, "user").await.unwrap();
        assert_eq!(realm.authz_calls(), 2);
    }

    #[tokio::test]
    async fn test_no_cache_always_calls_realm() {
        let realm = db_realm();
        let authz = ModularRealmAuthorizer::new(vec![shared(realm.clone())]);
        authz.has_role(&alice(), "user").await.unwrap();
        authz.has_role(&alice(), "user").await.unwrap();
        assert_eq!(realm.authz_calls(), 2);
    }

    #[tokio::test]
    async fn test_anonymous_has_nothing() {
        let realm = db_realm();
        let authz = ModularRealmAuthorizer::new(vec![shared(realm.clone())]);
        let nobody = PrincipalCollection::new();
        assert!(!authz.is_permitted(&nobody, "printer:print").await.unwrap());
        assert!(!authz.has_role(&nobody, "user").await.unwrap());
        assert_eq!(realm.authz_calls(), 0);
    }
}
