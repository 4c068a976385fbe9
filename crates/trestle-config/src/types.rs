//! Configuration types for the Trestle workbench.
//!
//! These types have no dependencies on other internal trestle crates.
//! Manifest entries are kept as plain JSON values and converted to domain
//! types when the workbench boots. Every struct implements [`Default`] so
//! that a bare `[section]` header produces a working configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root configuration for the workbench.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host application and caller-side behaviour.
    pub workbench: WorkbenchSection,
    /// Applications registered at boot.
    pub applications: Vec<ApplicationSection>,
    /// Startup initializer settings.
    pub startup: StartupSection,
    /// Surface presentation defaults.
    pub surfaces: SurfacesSection,
    /// Desktop pinning rules.
    pub desktop: DesktopSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
    /// Message bus settings.
    pub bus: BusSection,
}

// ---------------------------------------------------------------------------
// Workbench
// ---------------------------------------------------------------------------

/// Default symbolic name of the host application.
pub const DEFAULT_HOST_APP: &str = "workbench-host";

/// `[workbench]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchSection {
    /// Symbolic name of the host application.
    pub host_app: String,
    /// Caller-side reply timeout in milliseconds. `0` waits indefinitely.
    pub reply_timeout_ms: u64,
}

impl Default for WorkbenchSection {
    fn default() -> Self {
        Self {
            host_app: DEFAULT_HOST_APP.to_owned(),
            reply_timeout_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

/// One `[[applications]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSection {
    /// Symbolic name of the application.
    pub symbolic_name: String,
    /// Base URL the application's microfrontends are served from.
    pub base_url: String,
    /// Inline manifest.
    pub manifest: ManifestSection,
    /// See private capabilities of other applications.
    pub scope_check_disabled: bool,
    /// Issue intents without declaring intentions.
    pub intention_check_disabled: bool,
}

/// Inline manifest of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSection {
    /// Human-readable application name.
    pub name: Option<String>,
    /// Capability declarations, in manifest shape.
    pub capabilities: Vec<Value>,
    /// Intention declarations, in manifest shape.
    pub intentions: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// `[startup]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupSection {
    /// Per-phase initializer timeout in milliseconds. `0` disables it.
    pub initializer_timeout_ms: u64,
}

// ---------------------------------------------------------------------------
// Surfaces
// ---------------------------------------------------------------------------

/// `[surfaces]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfacesSection {
    /// Named notification durations.
    pub notification_duration: NotificationDurationSection,
}

/// `[surfaces.notification_duration]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationDurationSection {
    /// Milliseconds for `short`.
    pub short_ms: u64,
    /// Milliseconds for `medium`.
    pub medium_ms: u64,
    /// Milliseconds for `long`.
    pub long_ms: u64,
}

impl Default for NotificationDurationSection {
    fn default() -> Self {
        Self {
            short_ms: 7_000,
            medium_ms: 15_000,
            long_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Desktop
// ---------------------------------------------------------------------------

/// `[desktop]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopSection {
    /// Capabilities pinned to the desktop.
    pub pin: Vec<PinSection>,
}

/// One `[[desktop.pin]]` rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinSection {
    /// Capability type the rule applies to.
    #[serde(rename = "type")]
    pub capability_type: String,
    /// Qualifier pattern; values may be `*` or `?`.
    pub qualifier: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Output format (`pretty`, `compact`, `json`, `full`).
    pub format: String,
    /// Per-target filter directives.
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

// ---------------------------------------------------------------------------
// Bus
// ---------------------------------------------------------------------------

/// `[bus]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSection {
    /// Per-subscription backlog above which a slow subscriber is logged.
    /// Messages are queued, never dropped.
    pub channel_capacity: usize,
}

impl Default for BusSection {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}
