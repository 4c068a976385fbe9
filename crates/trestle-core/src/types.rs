//! Capability and intent data model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::qualifier::{Qualifier, QualifierPattern};

/// Named parameters passed along with an intent.
pub type Params = HashMap<String, Value>;

/// Symbolic name identifying an application connected to the workbench.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppSymbolicName(String);

impl AppSymbolicName {
    /// Create a symbolic name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AppSymbolicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppSymbolicName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AppSymbolicName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The workbench surfaces a capability can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// A part of the workbench layout.
    Part,
    /// A view in a part's tab bar.
    View,
    /// A modal dialog.
    Dialog,
    /// A popup anchored to an element.
    Popup,
    /// A message box.
    #[serde(rename = "messagebox")]
    MessageBox,
    /// A notification toast.
    Notification,
}

impl SurfaceKind {
    /// All surface kinds, in validator registration order.
    pub const ALL: [Self; 6] = [
        Self::Part,
        Self::View,
        Self::Dialog,
        Self::Popup,
        Self::MessageBox,
        Self::Notification,
    ];

    /// The capability type string for this surface.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Part => "part",
            Self::View => "view",
            Self::Dialog => "dialog",
            Self::Popup => "popup",
            Self::MessageBox => "messagebox",
            Self::Notification => "notification",
        }
    }

    /// Human-readable label, used in error prefixes.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Part => "Part",
            Self::View => "View",
            Self::Dialog => "Dialog",
            Self::Popup => "Popup",
            Self::MessageBox => "MessageBox",
            Self::Notification => "Notification",
        }
    }

    /// Look up the surface for a capability type string.
    #[must_use]
    pub fn from_type(capability_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == capability_type)
    }

    /// The route guard a host route must declare to serve a capability.
    ///
    /// Host-provided capabilities have an empty path; the host's route table
    /// pairs them with a route carrying this guard.
    #[must_use]
    pub fn route_guard(self, qualifier: &Qualifier) -> String {
        format!("canMatchWorkbench{}Capability({qualifier})", self.label())
    }

    /// Whether intents of this surface are handled by an intent handler.
    ///
    /// Parts and views are routed directly and never travel as intents.
    #[must_use]
    pub fn is_intent_handled(self) -> bool {
        matches!(
            self,
            Self::Dialog | Self::Popup | Self::MessageBox | Self::Notification
        )
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Declares a named parameter a capability accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Parameter name.
    pub name: String,
    /// Whether an intent must pass this parameter.
    #[serde(default)]
    pub required: bool,
    /// Optional description for documentation purposes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamDescriptor {
    /// Create a required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            description: None,
        }
    }

    /// Create an optional parameter.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            description: None,
        }
    }
}

/// Metadata attached to a capability by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityMetadata {
    /// Application that declared the capability.
    #[serde(default)]
    pub app_symbolic_name: AppSymbolicName,
    /// Identifier assigned by the registry or the stable-id enricher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn default_private() -> bool {
    true
}

/// A declared, qualifier-addressed offering of an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Capability type, e.g. `dialog` or `messagebox`.
    #[serde(rename = "type")]
    pub capability_type: String,
    /// Qualifier addressing this capability.
    #[serde(default)]
    pub qualifier: Qualifier,
    /// Surface-specific properties. Validators require this to be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    /// Parameters the capability accepts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDescriptor>,
    /// Private capabilities are only visible to the declaring application.
    #[serde(default = "default_private")]
    pub private: bool,
    /// Registry-owned metadata.
    #[serde(default)]
    pub metadata: CapabilityMetadata,
}

impl Capability {
    /// Create a private capability of the given type without properties.
    #[must_use]
    pub fn new(capability_type: impl Into<String>) -> Self {
        Self {
            capability_type: capability_type.into(),
            qualifier: Qualifier::new(),
            properties: None,
            params: Vec::new(),
            private: true,
            metadata: CapabilityMetadata::default(),
        }
    }

    /// Set the qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// Set a property, creating the properties object if necessary.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Ensure an (empty) properties object exists.
    #[must_use]
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Add a parameter descriptor.
    #[must_use]
    pub fn with_param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// Mark the capability as public.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.private = false;
        self
    }

    /// Record the declaring application.
    #[must_use]
    pub fn declared_by(mut self, app: AppSymbolicName) -> Self {
        self.metadata.app_symbolic_name = app;
        self
    }

    /// The surface this capability describes, if any.
    #[must_use]
    pub fn surface(&self) -> Option<SurfaceKind> {
        SurfaceKind::from_type(&self.capability_type)
    }

    /// The declaring application.
    #[must_use]
    pub fn app(&self) -> &AppSymbolicName {
        &self.metadata.app_symbolic_name
    }

    /// Look up a property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    /// The `path` property, if it is a string.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.property("path").and_then(Value::as_str)
    }

    /// The registry-assigned identifier, or an empty string before registration.
    #[must_use]
    pub fn id(&self) -> &str {
        self.metadata.id.as_deref().unwrap_or_default()
    }
}

/// A qualifier-addressed request to use a capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Requested capability type.
    #[serde(rename = "type")]
    pub intent_type: String,
    /// Qualifier the capability must match exactly.
    #[serde(default)]
    pub qualifier: Qualifier,
    /// Named parameters for the capability.
    #[serde(default)]
    pub params: Params,
}

impl Intent {
    /// Create an intent of the given type with an empty qualifier.
    #[must_use]
    pub fn new(intent_type: impl Into<String>) -> Self {
        Self {
            intent_type: intent_type.into(),
            qualifier: Qualifier::new(),
            params: Params::new(),
        }
    }

    /// Create an intent for a workbench surface.
    #[must_use]
    pub fn for_surface(kind: SurfaceKind, qualifier: Qualifier) -> Self {
        Self::new(kind.type_name()).with_qualifier(qualifier)
    }

    /// Set the qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// Add a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The surface this intent addresses, if any.
    #[must_use]
    pub fn surface(&self) -> Option<SurfaceKind> {
        SurfaceKind::from_type(&self.intent_type)
    }
}

/// Declares that an application intends to use capabilities matching a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intention {
    /// Capability type the application intends to use.
    #[serde(rename = "type")]
    pub intention_type: String,
    /// Qualifier pattern, possibly with wildcards.
    #[serde(default)]
    pub qualifier: QualifierPattern,
}

impl Intention {
    /// Create an intention.
    #[must_use]
    pub fn new(intention_type: impl Into<String>, qualifier: QualifierPattern) -> Self {
        Self {
            intention_type: intention_type.into(),
            qualifier,
        }
    }

    /// Whether this intention covers the given intent.
    #[must_use]
    pub fn covers(&self, intent: &Intent) -> bool {
        self.intention_type == intent.intent_type && self.qualifier.matches(&intent.qualifier)
    }
}
