//! Conversion from configuration sections to domain types.

use serde::de::DeserializeOwned;
use serde_json::Value;
use trestle_capabilities::enrich::PinRule;
use trestle_capabilities::{Application, Manifest};
use trestle_config::{
    ApplicationSection, Config, DesktopSection, LoggingSection, NotificationDurationSection,
};
use trestle_core::QualifierPattern;
use trestle_surfaces::DurationDefaults;
use trestle_telemetry::{LogConfig, LogFormat};

use crate::error::{KernelError, KernelResult};

/// Logging configuration for the `[logging]` section.
#[must_use]
pub fn log_config(section: &LoggingSection) -> LogConfig {
    let format = match section.format.to_ascii_lowercase().as_str() {
        "pretty" => LogFormat::Pretty,
        "json" => LogFormat::Json,
        "full" => LogFormat::Full,
        _ => LogFormat::Compact,
    };
    section
        .directives
        .iter()
        .fold(LogConfig::new(&section.level).with_format(format), |config, d| {
            config.with_directive(d)
        })
}

/// Named notification durations for the `[surfaces]` section.
#[must_use]
pub fn duration_defaults(section: &NotificationDurationSection) -> DurationDefaults {
    DurationDefaults {
        short_ms: section.short_ms,
        medium_ms: section.medium_ms,
        long_ms: section.long_ms,
    }
}

/// Desktop pin rules.
#[must_use]
pub fn pin_rules(section: &DesktopSection) -> Vec<PinRule> {
    section
        .pin
        .iter()
        .map(|rule| {
            PinRule::new(
                rule.capability_type.clone(),
                QualifierPattern::from(rule.qualifier.clone()),
            )
        })
        .collect()
}

/// Applications declared in `[[applications]]`.
///
/// # Errors
///
/// Returns [`KernelError::InvalidEntry`] naming the first manifest entry that
/// is not a valid capability or intention.
pub fn applications(config: &Config) -> KernelResult<Vec<Application>> {
    config
        .applications
        .iter()
        .enumerate()
        .map(|(index, section)| application(index, section))
        .collect()
}

fn application(index: usize, section: &ApplicationSection) -> KernelResult<Application> {
    let field = format!("applications[{index}].manifest");
    let manifest = Manifest {
        name: section.manifest.name.clone(),
        capabilities: entries(&section.manifest.capabilities, &field, "capabilities")?,
        intentions: entries(&section.manifest.intentions, &field, "intentions")?,
    };

    let mut app = Application::new(
        section.symbolic_name.as_str(),
        section.base_url.as_str(),
        manifest,
    );
    app.scope_check_disabled = section.scope_check_disabled;
    app.intention_check_disabled = section.intention_check_disabled;
    Ok(app)
}

fn entries<T: DeserializeOwned>(values: &[Value], field: &str, kind: &str) -> KernelResult<Vec<T>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value.clone()).map_err(|e| KernelError::InvalidEntry {
                field: format!("{field}.{kind}[{index}]"),
                message: e.to_string(),
            })
        })
        .collect()
}
