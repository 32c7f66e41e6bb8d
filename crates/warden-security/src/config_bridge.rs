//! Bridge from `warden_config::Config` to domain types.
//!
//! The config crate has no dependencies on other warden crates; every
//! conversion from its string-typed sections into strategies, matchers and
//! resolvers happens here, once.

use std::sync::Arc;

use warden_authc::{AuthenticationStrategy, strategy_from_name};
use warden_config::{
    AuthenticationSection, Config, CredentialsSection, PermissionsSection, SessionSection,
};
use warden_crypto::{HashAlgorithm, HashedCredentialsMatcher, StoredFormat};
use warden_permission::{PermissionResolver, WildcardPermissionResolver};
use warden_session::SessionManagerConfig;
use warden_telemetry::LogConfig;

use crate::error::{WardenError, WardenResult};

/// Convert the `[session]` section.
#[must_use]
pub fn to_session_config(section: &SessionSection) -> SessionManagerConfig {
    SessionManagerConfig {
        global_timeout: section.timeout(),
        validation_enabled: section.validation_enabled,
        validation_interval: section.validation_interval(),
        delete_invalid_sessions: section.delete_invalid_sessions,
    }
}

/// Convert the `[authentication]` section.
///
/// # Errors
///
/// [`WardenError::InvalidConfig`] for an unknown strategy name.
pub fn to_strategy(
    section: &AuthenticationSection,
) -> WardenResult<Arc<dyn AuthenticationStrategy>> {
    strategy_from_name(&section.strategy).ok_or_else(|| {
        WardenError::InvalidConfig(format!(
            "unknown authentication strategy '{}'",
            section.strategy
        ))
    })
}

/// Convert the `[credentials]` section into a matcher for hashed stores.
///
/// # Errors
///
/// [`WardenError::InvalidConfig`] for an unknown algorithm or format.
pub fn to_credentials_matcher(
    section: &CredentialsSection,
) -> WardenResult<HashedCredentialsMatcher> {
    let algorithm: HashAlgorithm = section
        .algorithm
        .parse()
        .map_err(|e| WardenError::InvalidConfig(format!("credentials.algorithm: {e}")))?;
    let format = match section.stored_format.as_str() {
        "raw" => StoredFormat::Raw,
        "hex" => StoredFormat::Hex,
        "base64" => StoredFormat::Base64,
        other => {
            return Err(WardenError::InvalidConfig(format!(
                "credentials.stored_format: unknown format '{other}'"
            )));
        },
    };
    Ok(HashedCredentialsMatcher::new(algorithm)
        .with_iterations(section.iterations)
        .with_format(format))
}

/// Convert the `[permissions]` section.
#[must_use]
pub fn to_permission_resolver(section: &PermissionsSection) -> Arc<dyn PermissionResolver> {
    Arc::new(WildcardPermissionResolver::new().case_sensitive(section.case_sensitive))
}

/// Convert the `[logging]` section.
#[must_use]
pub fn to_log_config(cfg: &Config) -> LogConfig {
    LogConfig::from(&cfg.logging)
}
