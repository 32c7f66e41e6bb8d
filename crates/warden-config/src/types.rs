//! Configuration types.
//!
//! Everything here is plain data with no dependency on the other warden
//! crates; conversion into domain types happens where the security manager
//! is assembled. Every struct implements [`Default`] with the same values
//! as the embedded `defaults.toml`, so a bare `[section]` header yields a
//! working configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration for a warden security manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session timeout and background validation.
    pub session: SessionSection,
    /// Multi-realm authentication policy.
    pub authentication: AuthenticationSection,
    /// How stored credentials are hashed and encoded.
    pub credentials: CredentialsSection,
    /// Permission string parsing.
    pub permissions: PermissionsSection,
    /// Authorization lookups.
    pub authorization: AuthorizationSection,
    /// Logging level, format, and per-target directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// SessionSection
// ---------------------------------------------------------------------------

/// Session lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Idle timeout in seconds. `0` disables idle expiry.
    pub timeout_secs: u64,
    /// Whether the periodic sweep runs at all.
    pub validation_enabled: bool,
    /// Seconds between sweeps.
    pub validation_interval_secs: u64,
    /// Whether a sweep deletes the invalid sessions it finds.
    pub delete_invalid_sessions: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            timeout_secs: 1800,
            validation_enabled: true,
            validation_interval_secs: 3600,
            delete_invalid_sessions: true,
        }
    }
}

impl SessionSection {
    /// The idle timeout, or `None` when disabled.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// The sweep interval.
    #[must_use]
    pub fn validation_interval(&self) -> Duration {
        Duration::from_secs(self.validation_interval_secs)
    }
}

// ---------------------------------------------------------------------------
// AuthenticationSection
// ---------------------------------------------------------------------------

/// Multi-realm authentication settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticationSection {
    /// Strategy name: `"all_successful"`, `"at_least_one_successful"` or
    /// `"first_successful"`.
    pub strategy: String,
}

impl Default for AuthenticationSection {
    fn default() -> Self {
        Self {
            strategy: "at_least_one_successful".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// CredentialsSection
// ---------------------------------------------------------------------------

/// Hashed credential settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsSection {
    /// Digest algorithm: `"sha256"`, `"sha384"` or `"sha512"`.
    pub algorithm: String,
    /// Number of hash rounds.
    pub iterations: u32,
    /// Encoding of stored digests: `"raw"`, `"hex"` or `"base64"`.
    pub stored_format: String,
}

impl Default for CredentialsSection {
    fn default() -> Self {
        Self {
            algorithm: "sha256".to_owned(),
            iterations: 1,
            stored_format: "hex".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// PermissionsSection
// ---------------------------------------------------------------------------

/// Permission parsing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsSection {
    /// Keep the case of permission tokens instead of lowercasing them.
    pub case_sensitive: bool,
}

// ---------------------------------------------------------------------------
// AuthorizationSection
// ---------------------------------------------------------------------------

/// Authorization lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationSection {
    /// Cache each realm's authorization data per principal.
    pub cache_enabled: bool,
}

impl Default for AuthorizationSection {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"` or `"json"`.
    pub format: String,
    /// Per-target directives (e.g. `["warden_session=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
