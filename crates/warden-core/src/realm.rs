//! The realm boundary: pluggable account-data sources.

use async_trait::async_trait;

use crate::error::{AuthcResult, AuthzResult};
use crate::info::{AuthenticationInfo, AuthorizationInfo};
use crate::principal::PrincipalCollection;
use crate::token::{AuthenticationToken, TokenKind};

/// An account-data source (LDAP directory, database, in-memory table).
///
/// Realms are opaque to the engine and may perform I/O. Transport failures
/// must be mapped into [`crate::AuthenticationError::RealmUnavailable`] or
/// [`crate::AuthorizationError::RealmUnavailable`].
#[async_trait]
pub trait Realm: Send + Sync {
    /// Unique name; principals are tagged with it.
    fn name(&self) -> &str;

    /// Whether this realm can authenticate tokens of `kind`.
    fn supports(&self, kind: &TokenKind) -> bool;

    /// Look up and verify the account for `token`.
    ///
    /// `Ok(None)` means the realm knows nothing about the principal.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::AuthenticationError`] when the account exists but
    /// cannot be authenticated, or the realm is unreachable.
    async fn authentication_info(
        &self,
        token: &AuthenticationToken,
    ) -> AuthcResult<Option<AuthenticationInfo>>;

    /// Roles and permissions for `principals`.
    ///
    /// Realms that only authenticate keep the default, which grants nothing.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::AuthorizationError`] if the realm is unreachable.
    async fn authorization_info(
        &self,
        principals: &PrincipalCollection,
    ) -> AuthzResult<Option<AuthorizationInfo>> {
        let _ = principals;
        Ok(None)
    }
}
