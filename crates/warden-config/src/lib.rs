//! Warden Config - Layered configuration for the warden security engine.
//!
//! This crate provides a single [`Config`] type covering session lifetime,
//! the multi-realm authentication strategy, credential hashing, permission
//! parsing, authorization caching and logging.
//!
//! # Usage
//!
//! ```rust,no_run
//! use warden_config::Config;
//!
//! let config = Config::load(Some(std::path::Path::new("warden.toml"))).unwrap();
//! println!("idle timeout: {:?}", config.session.timeout());
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Config file** passed to [`Config::load`]
//! 2. **Environment variables** (`WARDEN_*`), fallback only
//! 3. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! # Design
//!
//! This crate has no dependencies on other warden crates. Strategy names,
//! algorithms and formats stay strings here and are converted to domain
//! types when the security manager is built.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// Load configuration: defaults, then `path` if it exists, then
    /// environment fallbacks.
    ///
    /// See [`loader::load`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is malformed or the final
    /// configuration fails validation.
    pub fn load(path: Option<&std::path::Path>) -> ConfigResult<Self> {
        loader::load(path)
    }

    /// Parse a TOML string over the embedded defaults, ignoring the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the string is malformed or the result
    /// fails validation.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let overlay: toml::Value = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_owned(),
            source: e,
        })?;
        let mut merged = Self::default_value()?;
        loader::deep_merge(&mut merged, &overlay);
        let config: Self = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<string>".to_owned(),
                source: e,
            })?;
        validate::validate(&config)?;
        Ok(config)
    }

    /// Serialize to pretty JSON, for diagnostics.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the error type is kept for the caller's `?`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn default_value() -> ConfigResult<toml::Value> {
        toml::Value::try_from(Self::default()).map_err(|e| ConfigError::ValidationError {
            field: "<defaults>".to_owned(),
            message: e.to_string(),
        })
    }
}
