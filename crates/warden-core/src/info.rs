//! Account data returned by realms.
//!
//! [`AuthenticationInfo`] is what a realm hands back for a token;
//! [`AuthorizationInfo`] is the role and permission set attached to it.
//! Both merge by union so multi-realm aggregation is a pure fold.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use warden_crypto::StoredCredential;
use warden_permission::{Permission, PermissionResolver, RolePermissionResolver};

use crate::principal::{Principal, PrincipalCollection};

/// Roles and permissions held by a subject.
///
/// Permissions may be kept as raw strings (resolved on demand) or as
/// already-parsed objects.
#[derive(Clone, Default)]
pub struct AuthorizationInfo {
    roles: BTreeSet<String>,
    string_permissions: BTreeSet<String>,
    object_permissions: Vec<Arc<dyn Permission>>,
}

impl AuthorizationInfo {
    /// Empty role and permission set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Add several roles.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Add a permission string, resolved lazily at check time.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.string_permissions.insert(permission.into());
        self
    }

    /// Add several permission strings.
    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string_permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Add an already-parsed permission.
    #[must_use]
    pub fn with_object_permission(mut self, permission: Arc<dyn Permission>) -> Self {
        self.object_permissions.push(permission);
        self
    }

    /// Role names.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Raw permission strings.
    #[must_use]
    pub fn string_permissions(&self) -> &BTreeSet<String> {
        &self.string_permissions
    }

    /// Parsed permission objects.
    #[must_use]
    pub fn object_permissions(&self) -> &[Arc<dyn Permission>] {
        &self.object_permissions
    }

    /// Whether `role` is held.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Whether nothing is held at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
            && self.string_permissions.is_empty()
            && self.object_permissions.is_empty()
    }

    /// Union `other` into `self`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.roles.extend(other.roles);
        self.string_permissions.extend(other.string_permissions);
        self.object_permissions.extend(other.object_permissions);
        self
    }

    /// Every permission held, directly or through a role.
    ///
    /// Stored strings that fail to parse are skipped with a warning: they
    /// can only ever deny, never grant.
    #[must_use]
    pub fn resolve_permissions(
        &self,
        resolver: &dyn PermissionResolver,
        role_resolver: Option<&dyn RolePermissionResolver>,
    ) -> Vec<Arc<dyn Permission>> {
        let mut resolved = self.object_permissions.clone();
        for raw in &self.string_permissions {
            match resolver.resolve(raw) {
                Ok(p) => resolved.push(p),
                Err(e) => tracing::warn!(
                    permission = %raw,
                    error = %e,
                    "skipping malformed stored permission"
                ),
            }
        }
        if let Some(role_resolver) = role_resolver {
            for role in &self.roles {
                resolved.extend(role_resolver.resolve_permissions_in_role(role));
            }
        }
        resolved
    }

    /// Whether any held permission implies `required`.
    #[must_use]
    pub fn implies(
        &self,
        required: &dyn Permission,
        resolver: &dyn PermissionResolver,
        role_resolver: Option<&dyn RolePermissionResolver>,
    ) -> bool {
        self.resolve_permissions(resolver, role_resolver)
            .iter()
            .any(|granted| granted.implies(required))
    }
}

impl fmt::Debug for AuthorizationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let objects: Vec<String> =
            self.object_permissions.iter().map(ToString::to_string).collect();
        f.debug_struct("AuthorizationInfo")
            .field("roles", &self.roles)
            .field("string_permissions", &self.string_permissions)
            .field("object_permissions", &objects)
            .finish()
    }
}

/// Account data a realm returns for a token.
///
/// An info with no principals is "empty" and counts as no result.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationInfo {
    principals: PrincipalCollection,
    credentials: Option<StoredCredential>,
    authorization: AuthorizationInfo,
    locked: bool,
    credentials_expired: bool,
}

impl AuthenticationInfo {
    /// Info for `principal` contributed by `realm`.
    #[must_use]
    pub fn new(realm: impl Into<String>, principal: impl Into<Principal>) -> Self {
        Self {
            principals: PrincipalCollection::single(realm, principal),
            ..Self::default()
        }
    }

    /// Info with no principals, the starting point of an aggregation.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from an existing principal collection.
    #[must_use]
    pub fn from_principals(principals: PrincipalCollection) -> Self {
        Self {
            principals,
            ..Self::default()
        }
    }

    /// Attach the stored credentials to compare against.
    #[must_use]
    pub fn with_credentials(mut self, credentials: StoredCredential) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Attach roles and permissions.
    #[must_use]
    pub fn with_authorization(mut self, authorization: AuthorizationInfo) -> Self {
        self.authorization = authorization;
        self
    }

    /// Mark the account locked.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Mark the stored credentials expired.
    #[must_use]
    pub fn with_credentials_expired(mut self, expired: bool) -> Self {
        self.credentials_expired = expired;
        self
    }

    /// Principals, tagged by realm.
    #[must_use]
    pub fn principals(&self) -> &PrincipalCollection {
        &self.principals
    }

    /// Stored credentials, if the realm supplied them.
    #[must_use]
    pub fn credentials(&self) -> Option<&StoredCredential> {
        self.credentials.as_ref()
    }

    /// Roles and permissions.
    #[must_use]
    pub fn authorization(&self) -> &AuthorizationInfo {
        &self.authorization
    }

    /// Whether the account is locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the stored credentials have expired.
    #[must_use]
    pub fn is_credentials_expired(&self) -> bool {
        self.credentials_expired
    }

    /// Whether no realm has contributed a principal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }

    /// Union `other` into `self`.
    ///
    /// Principals, roles and permissions are unioned; the first credentials
    /// seen are kept; the locked and expired flags are sticky.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.principals.add_all(&other.principals);
        if self.credentials.is_none() {
            self.credentials = other.credentials;
        }
        self.authorization = self.authorization.merge(other.authorization);
        self.locked |= other.locked;
        self.credentials_expired |= other.credentials_expired;
        self
    }
}

#[cfg(test)]
mod tests {
    use warden_permission::{
        StaticRolePermissionResolver, WildcardPermission, WildcardPermissionResolver,
    };

    use super::*;

    #[test]
    fn test_empty_info() {
        assert!(AuthenticationInfo::empty().is_empty());
        assert!(!AuthenticationInfo::new("db", "alice").is_empty());
    }

    #[test]
    fn test_merge_unions_everything() {
        let a = AuthenticationInfo::new("ldap", "alice")
            .with_credentials(StoredCredential::new("a"))
            .with_authorization(AuthorizationInfo::new().with_role("admin"));
        let b = AuthenticationInfo::new("db", "42")
            .with_credentials(StoredCredential::new("b"))
            .with_locked(true)
            .with_authorization(
                AuthorizationInfo::new()
                    .with_role("user")
                    .with_permission("printer:print"),
            );

        let merged = a.merge(b);
        assert_eq!(merged.principals().len(), 2);
        assert_eq!(merged.principals().primary().unwrap().as_str(), "alice");
        assert!(merged.credentials().unwrap().value().ct_eq(b"a"));
        assert!(merged.is_locked());
        assert!(merged.authorization().has_role("admin"));
        assert!(merged.authorization().has_role("user"));
        assert_eq!(merged.authorization().string_permissions().len(), 1);
    }

    #[test]
    fn test_merge_is_order_independent_for_sets() {
        let a = AuthenticationInfo::new("r1", "x")
            .with_authorization(AuthorizationInfo::new().with_role("a"));
        let b = AuthenticationInfo::new("r2", "y")
            .with_authorization(AuthorizationInfo::new().with_role("b"));
        let ab = a.clone().merge(b.clone());
        let ba = b.merge(a);
        assert_eq!(ab.authorization().roles(), ba.authorization().roles());
        assert_eq!(ab.principals().len(), ba.principals().len());
    }

    #[test]
    fn test_implies_through_strings_objects_and_roles() {
        let resolver = WildcardPermissionResolver::new();
        let roles = StaticRolePermissionResolver::new()
            .with_role("ops", ["server:restart"])
            .unwrap();
        let info = AuthorizationInfo::new()
            .with_role("ops")
            .with_permission("printer:print")
            .with_permission("not::valid")
            .with_object_permission(Arc::new(WildcardPermission::parse("doc:read").unwrap()));

        let print = WildcardPermission::parse("printer:print:lp7200").unwrap();
        let read = WildcardPermission::parse("doc:read").unwrap();
        let restart = WildcardPermission::parse("server:restart:web1").unwrap();
        let delete = WildcardPermission::parse("doc:delete").unwrap();

        assert!(info.implies(&print, &resolver, None));
        assert!(info.implies(&read, &resolver, None));
        assert!(!info.implies(&restart, &resolver, None));
        assert!(info.implies(&restart, &resolver, Some(&roles)));
        assert!(!info.implies(&delete, &resolver, Some(&roles)));
    }
}
