//! Environment variable fallbacks.
//!
//! A `WARDEN_*` variable fills in a field only when no config file set it;
//! explicit file values always win.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Prefix shared by every recognised variable.
pub const ENV_PREFIX: &str = "WARDEN_";

#[derive(Debug, Clone, Copy)]
enum ValueKind {
    Integer,
    Bool,
    Text,
}

/// Variable name, dotted config path, value kind.
const ENV_MAPPINGS: &[(&str, &str, ValueKind)] = &[
    ("WARDEN_SESSION_TIMEOUT_SECS", "session.timeout_secs", ValueKind::Integer),
    ("WARDEN_SESSION_VALIDATION_ENABLED", "session.validation_enabled", ValueKind::Bool),
    (
        "WARDEN_SESSION_VALIDATION_INTERVAL_SECS",
        "session.validation_interval_secs",
        ValueKind::Integer,
    ),
    ("WARDEN_SESSION_DELETE_INVALID", "session.delete_invalid_sessions", ValueKind::Bool),
    ("WARDEN_AUTHC_STRATEGY", "authentication.strategy", ValueKind::Text),
    ("WARDEN_CREDENTIALS_ALGORITHM", "credentials.algorithm", ValueKind::Text),
    ("WARDEN_CREDENTIALS_ITERATIONS", "credentials.iterations", ValueKind::Integer),
    ("WARDEN_CREDENTIALS_FORMAT", "credentials.stored_format", ValueKind::Text),
    ("WARDEN_PERMISSIONS_CASE_SENSITIVE", "permissions.case_sensitive", ValueKind::Bool),
    ("WARDEN_AUTHZ_CACHE_ENABLED", "authorization.cache_enabled", ValueKind::Bool),
    ("WARDEN_LOG_LEVEL", "logging.level", ValueKind::Text),
    ("WARDEN_LOG_FORMAT", "logging.format", ValueKind::Text),
];

/// Snapshot every `WARDEN_*` variable from the process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect()
}

/// Fill fields of `merged` from `env_vars` unless `explicit` already sets
/// them. Returns how many fields were filled.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] if a variable cannot be parsed as the
/// field's type.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    explicit: Option<&toml::Value>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<usize> {
    let mut applied = 0usize;
    for &(var, path, kind) in ENV_MAPPINGS {
        let Some(raw) = env_vars.get(var) else {
            continue;
        };
        if explicit.is_some_and(|e| lookup(e, path).is_some()) {
            debug!(var, path, "config file sets field; ignoring environment");
            continue;
        }
        let value = parse_value(var, raw, kind)?;
        if set_path(merged, path, value) {
            applied = applied.saturating_add(1);
        }
    }
    Ok(applied)
}

fn parse_value(var: &str, raw: &str, kind: ValueKind) -> ConfigResult<toml::Value> {
    let raw = raw.trim();
    let err = |expected| ConfigError::EnvError {
        var: var.to_owned(),
        value: raw.to_owned(),
        expected,
    };
    match kind {
        ValueKind::Integer => raw
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|_| err("an integer")),
        ValueKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(toml::Value::Boolean(true)),
            "0" | "false" | "no" | "off" => Ok(toml::Value::Boolean(false)),
            _ => Err(err("a boolean")),
        },
        ValueKind::Text => Ok(toml::Value::String(raw.to_owned())),
    }
}

fn lookup<'a>(root: &'a toml::Value, path: &str) -> Option<&'a toml::Value> {
    path.split('.').try_fold(root, |node, key| node.get(key))
}

fn set_path(root: &mut toml::Value, path: &str, value: toml::Value) -> bool {
    let mut node = root;
    let mut keys = path.split('.').peekable();
    while let Some(key) = keys.next() {
        let Some(table) = node.as_table_mut() else {
            return false;
        };
        if keys.peek().is_none() {
            table.insert(key.to_owned(), value);
            return true;
        }
        node = table
            .entry(key.to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
    false
}
