//! Surface properties propagated onto handles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use trestle_core::{Params, substitute_opt};

/// Size contract of a surface container. Values are CSS lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSize {
    /// Width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Minimum width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<String>,
    /// Minimum height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<String>,
    /// Maximum width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    /// Maximum height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<String>,
}

/// How long a notification stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationDuration {
    /// Named duration.
    Named(NamedDuration),
    /// Explicit duration in milliseconds.
    Millis(u64),
}

/// Named notification durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedDuration {
    /// Short.
    Short,
    /// Medium.
    Medium,
    /// Long.
    Long,
    /// Stays open until closed.
    Infinite,
}

impl NamedDuration {
    /// Name as written in properties and headers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::Infinite => "infinite",
        }
    }
}

impl Default for NotificationDuration {
    fn default() -> Self {
        Self::Named(NamedDuration::Medium)
    }
}

impl NotificationDuration {
    /// Parse a duration from a property or header value.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// The value form used in properties and headers.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Self::Named(named) => Value::from(named.as_str()),
            Self::Millis(ms) => Value::from(ms),
        }
    }

    /// The concrete duration, or `None` for infinite notifications.
    #[must_use]
    pub fn resolve(self, defaults: &DurationDefaults) -> Option<Duration> {
        match self {
            Self::Named(NamedDuration::Short) => Some(Duration::from_millis(defaults.short_ms)),
            Self::Named(NamedDuration::Medium) => Some(Duration::from_millis(defaults.medium_ms)),
            Self::Named(NamedDuration::Long) => Some(Duration::from_millis(defaults.long_ms)),
            Self::Named(NamedDuration::Infinite) => None,
            Self::Millis(ms) => Some(Duration::from_millis(ms)),
        }
    }
}

/// Lengths of the named notification durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationDefaults {
    /// Short, in milliseconds.
    pub short_ms: u64,
    /// Medium, in milliseconds.
    pub medium_ms: u64,
    /// Long, in milliseconds.
    pub long_ms: u64,
}

impl Default for DurationDefaults {
    fn default() -> Self {
        Self {
            short_ms: 7_000,
            medium_ms: 15_000,
            long_ms: 30_000,
        }
    }
}

/// Properties of an open surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceProperties {
    /// Title, with named parameters substituted.
    pub title: Option<String>,
    /// Heading (views), with named parameters substituted.
    pub heading: Option<String>,
    /// Size contract.
    pub size: SurfaceSize,
    /// Whether the user may close the surface.
    pub closable: bool,
    /// Whether the user may resize the surface.
    pub resizable: bool,
    /// Whether the container pads its content.
    pub padding: bool,
    /// CSS classes added to the container.
    pub css_class: Vec<String>,
    /// Notification duration.
    pub duration: Option<NotificationDuration>,
}

impl Default for SurfaceProperties {
    fn default() -> Self {
        Self {
            title: None,
            heading: None,
            size: SurfaceSize::default(),
            closable: true,
            resizable: true,
            padding: true,
            css_class: Vec::new(),
            duration: None,
        }
    }
}

impl SurfaceProperties {
    /// Read properties from a capability's (or host route's) property object.
    ///
    /// `title` and `heading` have the intent's params substituted.
    #[must_use]
    pub fn from_map(properties: Option<&Map<String, Value>>, params: &Params) -> Self {
        let mut result = Self::default();
        if let Some(properties) = properties {
            result.apply(properties, params);
        }
        result
    }

    /// Overlay the entries of a property object. Absent entries keep their value.
    pub fn apply(&mut self, properties: &Map<String, Value>, params: &Params) {
        let text = |key: &str| substitute_opt(properties.get(key).and_then(Value::as_str), params);
        let flag = |key: &str| properties.get(key).and_then(Value::as_bool);

        if let Some(title) = text("title") {
            self.title = Some(title);
        }
        if let Some(heading) = text("heading") {
            self.heading = Some(heading);
        }
        if let Some(size) = properties
            .get("size")
            .and_then(|v| serde_json::from_value::<SurfaceSize>(v.clone()).ok())
        {
            self.size = size;
        }
        if let Some(closable) = flag("closable") {
            self.closable = closable;
        }
        if let Some(resizable) = flag("resizable") {
            self.resizable = resizable;
        }
        if let Some(padding) = flag("padding") {
            self.padding = padding;
        }
        match properties.get("cssClass") {
            Some(Value::String(class)) => {
                self.css_class = class.split_whitespace().map(String::from).collect();
            },
            Some(Value::Array(classes)) => {
                self.css_class = classes
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect();
            },
            _ => {},
        }
        if let Some(duration) = properties
            .get("duration")
            .and_then(NotificationDuration::from_value)
        {
            self.duration = Some(duration);
        }
    }
}
