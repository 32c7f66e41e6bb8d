//! Observer hooks for authentication outcomes.

use crate::error::AuthenticationError;
use crate::info::AuthenticationInfo;
use crate::principal::PrincipalCollection;
use crate::token::AuthenticationToken;

/// Notified after each login attempt and on logout.
///
/// Callbacks run inline on the authenticating task and must not block.
pub trait AuthenticationListener: Send + Sync {
    /// A login attempt succeeded.
    fn on_success(&self, token: &AuthenticationToken, info: &AuthenticationInfo) {
        let _ = (token, info);
    }

    /// A login attempt failed.
    fn on_failure(&self, token: &AuthenticationToken, error: &AuthenticationError) {
        let _ = (token, error);
    }

    /// A subject logged out.
    fn on_logout(&self, principals: &PrincipalCollection) {
        let _ = principals;
    }
}
