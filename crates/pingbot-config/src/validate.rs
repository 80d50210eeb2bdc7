//! Post-load configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Largest accepted `command.ping_count`.
const MAX_PING_COUNT: u32 = 100;

/// Accepted `logging.format` values.
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Accepted `logging.target` values.
const LOG_TARGETS: &[&str] = &["stderr", "stdout", "file"];

/// Accepted `logging.rotation` values.
const LOG_ROTATIONS: &[&str] = &["daily", "hourly", "never"];

/// Validate a loaded configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_account(config)?;
    validate_command(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn validate_account(config: &Config) -> ConfigResult<()> {
    let a = &config.account;

    if a.jid.trim().is_empty() {
        return Err(invalid(
            "account.jid",
            "must be set in the config file or PINGBOT_JID",
        ));
    }
    if a.password.is_empty() {
        return Err(invalid(
            "account.password",
            "must be set in the config file or PINGBOT_PASSWORD",
        ));
    }
    if a.connect_timeout_secs == 0 {
        return Err(invalid("account.connect_timeout_secs", "must be greater than 0"));
    }
    Ok(())
}

fn validate_command(config: &Config) -> ConfigResult<()> {
    let c = &config.command;

    if c.timeout_secs == 0 {
        return Err(invalid("command.timeout_secs", "must be greater than 0"));
    }
    if !(1..=MAX_PING_COUNT).contains(&c.ping_count) {
        return Err(invalid(
            "command.ping_count",
            format!(
                "{} is out of range; must be between 1 and {MAX_PING_COUNT}",
                c.ping_count
            ),
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    one_of("logging.format", &l.format, LOG_FORMATS)?;
    one_of("logging.target", &l.target, LOG_TARGETS)?;
    one_of("logging.rotation", &l.rotation, LOG_ROTATIONS)?;
    if l.target == "file" && l.directory.as_os_str().is_empty() {
        return Err(invalid(
            "logging.directory",
            "must be set when logging to files",
        ));
    }
    Ok(())
}

fn one_of(field: &str, value: &str, accepted: &[&str]) -> ConfigResult<()> {
    if accepted.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!(
                "unsupported value '{value}'; expected one of: {}",
                accepted.join(", ")
            ),
        ))
    }
}
