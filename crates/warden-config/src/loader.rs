//! Layered configuration loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse the embedded `defaults.toml` → base
//! 2. Merge the optional config file over it
//! 3. Apply `WARDEN_*` environment fallbacks for fields the file left unset
//! 4. Deserialize the merged tree → `Config`
//! 5. Validate

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load configuration from defaults, an optional file, and the process
/// environment.
///
/// A `path` that does not exist is skipped, not an error.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is unreadable or malformed, an
/// environment variable has the wrong type, or the result fails validation.
pub fn load(path: Option<&Path>) -> ConfigResult<Config> {
    load_with_env(path, &collect_env_vars())
}

/// Like [`load`], with an explicit set of environment variables.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env(
    path: Option<&Path>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<Config> {
    // 1. Embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    // 2. Optional file.
    let overlay = match path {
        Some(p) => try_load_file(p)?,
        None => None,
    };
    if let Some(ref overlay) = overlay {
        deep_merge(&mut merged, overlay);
        if let Some(p) = path {
            info!(path = %p.display(), "loaded config file");
        }
    }

    // 3. Environment fallbacks.
    let env_count = apply_env_fallbacks(&mut merged, overlay.as_ref(), env_vars)?;
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 4. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 5. Validate.
    validate::validate(&config)?;
    Ok(config)
}

/// Load a config from a specific file path (no defaults layer, no
/// environment). Missing keys still take their [`Default`] values.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = read_bounded(path)?;
    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Recursively deep-merge `overlay` into `base`.
///
/// Tables merge per key; scalars and arrays from the overlay replace the
/// base value.
pub fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

/// Try to load a file, returning `None` if it doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match read_bounded(path) {
        Ok(c) => c,
        Err(ConfigError::ReadError { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => return Err(e),
    };

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(value))
}

/// Read a file in one call, then reject it if oversized.
fn read_bounded(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let len = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if len > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {len} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
            ),
        });
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_defaults_deserialize_to_default_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_without_file() {
        let config = load_with_env(None, &HashMap::new()).unwrap();
        assert_eq!(config.session.timeout_secs, 1800);
        assert_eq!(config.session.validation_interval_secs, 3600);
        assert_eq!(config.authentication.strategy, "at_least_one_successful");
        assert!(config.authorization.cache_enabled);
        assert!(!config.permissions.case_sensitive);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config =
            load_with_env(Some(Path::new("/nonexistent/warden.toml")), &HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
            [session]
            timeout_secs = 120

            [authentication]
            strategy = "first_successful"
            "#,
        );
        let config = load_with_env(Some(file.path()), &HashMap::new()).unwrap();
        assert_eq!(config.session.timeout_secs, 120);
        assert!(config.session.validation_enabled);
        assert_eq!(config.authentication.strategy, "first_successful");
    }

    #[test]
    fn test_env_applies_only_where_file_is_silent() {
        let file = write_config("[session]\ntimeout_secs = 120\n");
        let config = load_with_env(
            Some(file.path()),
            &env(&[
                ("WARDEN_SESSION_TIMEOUT_SECS", "999"),
                ("WARDEN_LOG_LEVEL", "debug"),
            ]),
        )
        .unwrap();
        assert_eq!(config.session.timeout_secs, 120);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_file_value_fails_validation() {
        let file = write_config("[credentials]\niterations = 0\n");
        let result = load_with_env(Some(file.path()), &HashMap::new());
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_config("[session\n");
        let result = load_with_env(Some(file.path()), &HashMap::new());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_wrong_type_in_file() {
        let file = write_config("[session]\ntimeout_secs = \"soon\"\n");
        let result = load_with_env(Some(file.path()), &HashMap::new());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/warden.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        let result = try_load_file(&file_path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let mut base: toml::Value =
            toml::from_str("[logging]\ndirectives = [\"a=debug\"]\nlevel = \"info\"\n").unwrap();
        let overlay: toml::Value =
            toml::from_str("[logging]\ndirectives = [\"b=warn\"]\n").unwrap();
        deep_merge(&mut base, &overlay);
        let config: Config = base.try_into().unwrap();
        assert_eq!(config.logging.directives, vec!["b=warn".to_owned()]);
        assert_eq!(config.logging.level, "info");
    }
}
