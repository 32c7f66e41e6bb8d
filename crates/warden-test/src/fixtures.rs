//! Test fixtures for common types.

use warden_core::{AuthenticationInfo, AuthenticationToken, AuthorizationInfo};
use warden_crypto::StoredCredential;

/// Username/password token for `alice` / `secret`.
#[must_use]
pub fn test_token() -> AuthenticationToken {
    AuthenticationToken::username_password("alice", "secret")
}

/// Username/password token for a specific account.
#[must_use]
pub fn test_token_for(username: &str, password: &str) -> AuthenticationToken {
    AuthenticationToken::username_password(username, password)
}

/// Plaintext stored credential.
#[must_use]
pub fn test_stored_password(password: &str) -> StoredCredential {
    StoredCredential::new(password)
}

/// Roles `user` plus `printer:print` permission.
#[must_use]
pub fn test_authorization() -> AuthorizationInfo {
    AuthorizationInfo::new()
        .with_role("user")
        .with_permission("printer:print")
}

/// Account info for `principal` contributed by `realm`, carrying
/// [`test_authorization`].
#[must_use]
pub fn test_info(realm: &str, principal: &str) -> AuthenticationInfo {
    AuthenticationInfo::new(realm, principal).with_authorization(test_authorization())
}

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
