//! Post-merge configuration validation.
//!
//! Checks that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges and name things that exist.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Strategy names accepted by `authentication.strategy`.
pub const STRATEGIES: &[&str] = &["all_successful", "at_least_one_successful", "first_successful"];

/// Accepted `credentials.algorithm` values.
pub const ALGORITHMS: &[&str] = &["sha256", "sha384", "sha512"];

/// Accepted `credentials.stored_format` values.
pub const STORED_FORMATS: &[&str] = &["raw", "hex", "base64"];

/// Accepted `logging.level` values.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Accepted `logging.format` values.
pub const LOG_FORMATS: &[&str] = &["pretty", "compact", "json"];

/// Upper bound on `credentials.iterations`.
const MAX_ITERATIONS: u32 = 10_000_000;

/// Upper bound on the idle timeout and sweep interval (one year).
const MAX_DURATION_SECS: u64 = 31_536_000;

/// Validate a fully merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_session(config)?;
    validate_authentication(config)?;
    validate_credentials(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message,
    }
}

fn one_of(field: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(invalid(
        field,
        format!("unsupported value '{value}'; expected one of: {}", allowed.join(", ")),
    ))
}

fn validate_session(config: &Config) -> ConfigResult<()> {
    let s = &config.session;

    if s.timeout_secs > MAX_DURATION_SECS {
        return Err(invalid(
            "session.timeout_secs",
            format!("timeout must not exceed {MAX_DURATION_SECS} seconds"),
        ));
    }

    if s.validation_enabled && s.validation_interval_secs == 0 {
        return Err(invalid(
            "session.validation_interval_secs",
            "interval must be positive while validation is enabled".to_owned(),
        ));
    }

    if s.validation_interval_secs > MAX_DURATION_SECS {
        return Err(invalid(
            "session.validation_interval_secs",
            format!("interval must not exceed {MAX_DURATION_SECS} seconds"),
        ));
    }

    Ok(())
}

fn validate_authentication(config: &Config) -> ConfigResult<()> {
    one_of("authentication.strategy", &config.authentication.strategy, STRATEGIES)
}

fn validate_credentials(config: &Config) -> ConfigResult<()> {
    let c = &config.credentials;
    one_of("credentials.algorithm", &c.algorithm, ALGORITHMS)?;
    one_of("credentials.stored_format", &c.stored_format, STORED_FORMATS)?;

    if c.iterations == 0 || c.iterations > MAX_ITERATIONS {
        return Err(invalid(
            "credentials.iterations",
            format!("iterations must be between 1 and {MAX_ITERATIONS}"),
        ));
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    one_of("logging.level", &config.logging.level, LOG_LEVELS)?;
    one_of("logging.format", &config.logging.format, LOG_FORMATS)?;

    if let Some(bad) = config.logging.directives.iter().find(|d| d.trim().is_empty()) {
        return Err(invalid(
            "logging.directives",
            format!("empty directive '{bad}'"),
        ));
    }

    Ok(())
}
