//! Resolution of permission strings and role names into [`Permission`] objects.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::PermissionResult;
use crate::permission::Permission;
use crate::wildcard::WildcardPermission;

/// Turns a permission string into a [`Permission`].
pub trait PermissionResolver: Send + Sync {
    /// Resolve a permission string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid permission.
    fn resolve(&self, permission: &str) -> PermissionResult<Arc<dyn Permission>>;
}

/// Resolves strings into [`WildcardPermission`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardPermissionResolver {
    case_sensitive: bool,
}

impl WildcardPermissionResolver {
    /// Create a case-insensitive resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preserve token case when parsing.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl PermissionResolver for WildcardPermissionResolver {
    fn resolve(&self, permission: &str) -> PermissionResult<Arc<dyn Permission>> {
        let parsed = if self.case_sensitive {
            WildcardPermission::parse_case_sensitive(permission)?
        } else {
            WildcardPermission::parse(permission)?
        };
        Ok(Arc::new(parsed))
    }
}

/// Expands a role name into the permissions that role carries.
pub trait RolePermissionResolver: Send + Sync {
    /// Permissions implied by holding `role`. Unknown roles yield nothing.
    fn resolve_permissions_in_role(&self, role: &str) -> Vec<Arc<dyn Permission>>;
}

/// Role-to-permission mapping fixed at construction time.
#[derive(Debug, Default)]
pub struct StaticRolePermissionResolver {
    roles: HashMap<String, Vec<Arc<dyn Permission>>>,
}

impl StaticRolePermissionResolver {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role whose permissions are given as wildcard strings.
    ///
    /// # Errors
    ///
    /// Returns an error if any permission string is malformed; the role is
    /// not registered in that case.
    pub fn with_role<I, S>(
        mut self,
        role: impl Into<String>,
        permissions: I,
    ) -> PermissionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = permissions
            .into_iter()
            .map(|p| {
                WildcardPermission::parse(p.as_ref()).map(|w| Arc::new(w) as Arc<dyn Permission>)
            })
            .collect::<PermissionResult<Vec<_>>>()?;
        self.roles.insert(role.into(), parsed);
        Ok(self)
    }
}

impl RolePermissionResolver for StaticRolePermissionResolver {
    fn resolve_permissions_in_role(&self, role: &str) -> Vec<Arc<dyn Permission>> {
        self.roles.get(role).cloned().unwrap_or_default()
    }
}
