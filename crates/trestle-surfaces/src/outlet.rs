//! Outlets surfaces are embedded into.

use serde::{Deserialize, Serialize};
use trestle_core::{AppSymbolicName, SurfaceKind};

use crate::routes::RouteDescriptor;

/// Identifier of an outlet. Each surface session owns exactly one outlet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutletId(String);

impl OutletId {
    /// Create an outlet id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh outlet for a surface of the given kind.
    #[must_use]
    pub fn allocate(kind: SurfaceKind) -> Self {
        Self(format!("{}.{}", kind.type_name(), uuid::Uuid::new_v4().simple()))
    }

    /// The raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OutletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an outlet is navigated to.
#[derive(Debug, Clone, PartialEq)]
pub enum OutletTarget {
    /// Load a remote application's microfrontend into a sandboxed outlet.
    Remote {
        /// Providing application.
        app: AppSymbolicName,
        /// Absolute URL of the microfrontend.
        url: String,
    },
    /// Navigate in-process to a route of the host's route table.
    Host {
        /// The matched route.
        route: RouteDescriptor,
    },
}

impl OutletTarget {
    /// Whether the target is a remote microfrontend.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

/// Join a microfrontend path onto an application's base URL.
#[must_use]
pub fn microfrontend_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocated_outlets_are_unique() {
        let a = OutletId::allocate(SurfaceKind::Dialog);
        let b = OutletId::allocate(SurfaceKind::Dialog);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("dialog."));
    }

    #[test]
    fn test_microfrontend_url() {
        assert_eq!(
            microfrontend_url("https://app.example/", "/contact/1"),
            "https://app.example/contact/1"
        );
        assert_eq!(microfrontend_url("https://app.example", "x"), "https://app.example/x");
    }
}
