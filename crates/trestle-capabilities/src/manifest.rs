//! Application manifests.

use serde::{Deserialize, Serialize};
use trestle_core::{AppSymbolicName, Capability, Intention};

/// Capabilities and intentions declared by an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Human-readable application name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Capabilities the application provides.
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    /// Intentions the application declares.
    #[serde(default)]
    pub intentions: Vec<Intention>,
}

impl Manifest {
    /// Create an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability.
    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Add an intention.
    #[must_use]
    pub fn with_intention(mut self, intention: Intention) -> Self {
        self.intentions.push(intention);
        self
    }
}

/// An application connecting to the workbench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Symbolic name.
    pub symbolic_name: AppSymbolicName,
    /// Base URL microfrontend paths are resolved against. Empty for the host.
    #[serde(default)]
    pub base_url: String,
    /// The application's manifest.
    #[serde(default)]
    pub manifest: Manifest,
    /// Allow this application to see private capabilities of other applications.
    #[serde(default)]
    pub scope_check_disabled: bool,
    /// Allow this application to issue intents without declaring intentions.
    #[serde(default)]
    pub intention_check_disabled: bool,
}

impl Application {
    /// Create an application.
    #[must_use]
    pub fn new(
        symbolic_name: impl Into<AppSymbolicName>,
        base_url: impl Into<String>,
        manifest: Manifest,
    ) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
            base_url: base_url.into(),
            manifest,
            scope_check_disabled: false,
            intention_check_disabled: false,
        }
    }

    /// Disable the intention check for this application.
    #[must_use]
    pub fn without_intention_check(mut self) -> Self {
        self.intention_check_disabled = true;
        self
    }

    /// Disable the scope check for this application.
    #[must_use]
    pub fn without_scope_check(mut self) -> Self {
        self.scope_check_disabled = true;
        self
    }
}
