//! Post-load configuration validation.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];

/// Validate a loaded configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_workbench(config)?;
    validate_applications(config)?;
    validate_desktop(config)?;
    validate_logging(config)?;
    validate_bus(config)?;
    Ok(())
}

fn validate_workbench(config: &Config) -> ConfigResult<()> {
    if config.workbench.host_app.trim().is_empty() {
        return Err(ConfigError::validation(
            "workbench.host_app",
            "host application name must not be empty",
        ));
    }
    Ok(())
}

fn validate_applications(config: &Config) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for (index, app) in config.applications.iter().enumerate() {
        let field = format!("applications[{index}]");
        let name = app.symbolic_name.trim();
        if name.is_empty() {
            return Err(ConfigError::validation(
                format!("{field}.symbolic_name"),
                "symbolic name must not be empty",
            ));
        }
        if name == config.workbench.host_app {
            return Err(ConfigError::validation(
                format!("{field}.symbolic_name"),
                format!("'{name}' is the host application and is registered implicitly"),
            ));
        }
        if !seen.insert(name) {
            return Err(ConfigError::validation(
                format!("{field}.symbolic_name"),
                format!("application '{name}' is declared more than once"),
            ));
        }
        if app.base_url.trim().is_empty() {
            return Err(ConfigError::validation(
                format!("{field}.base_url"),
                format!("remote application '{name}' requires a base URL"),
            ));
        }
    }
    Ok(())
}

fn validate_desktop(config: &Config) -> ConfigResult<()> {
    for (index, rule) in config.desktop.pin.iter().enumerate() {
        if rule.capability_type.trim().is_empty() {
            return Err(ConfigError::validation(
                format!("desktop.pin[{index}].type"),
                "pin rule requires a capability type",
            ));
        }
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let logging = &config.logging;
    if !LEVELS.contains(&logging.level.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::validation(
            "logging.level",
            format!(
                "unknown level '{}'; expected one of: {}",
                logging.level,
                LEVELS.join(", ")
            ),
        ));
    }
    if !FORMATS.contains(&logging.format.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::validation(
            "logging.format",
            format!(
                "unknown format '{}'; expected one of: {}",
                logging.format,
                FORMATS.join(", ")
            ),
        ));
    }
    Ok(())
}

fn validate_bus(config: &Config) -> ConfigResult<()> {
    if config.bus.channel_capacity == 0 {
        return Err(ConfigError::validation(
            "bus.channel_capacity",
            "channel capacity must be at least 1",
        ));
    }
    Ok(())
}
