//! The host application's route table.
//!
//! Host capabilities carry an empty path. Their surfaces are served by a
//! host route guarded by [`RouteGuard::MatchesCapability`]; navigating a
//! host surface looks the route up by that guard and fails with
//! [`NavigationError::NoMatchingRoute`] if none is registered.
//!
//! The table serializes to the ordered list of route descriptors kept in the
//! session store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::RwLock;
use tracing::debug;
use trestle_core::{NavigationError, Qualifier, SurfaceKind};

/// Guard deciding whether a route may serve a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "guard", rename_all = "camelCase")]
pub enum RouteGuard {
    /// Matches the surface of the capability with exactly this qualifier.
    MatchesCapability {
        /// Surface kind.
        surface: SurfaceKind,
        /// Capability qualifier.
        qualifier: Qualifier,
    },
}

impl RouteGuard {
    /// Guard for a surface capability.
    #[must_use]
    pub fn matches_capability(surface: SurfaceKind, qualifier: Qualifier) -> Self {
        Self::MatchesCapability { surface, qualifier }
    }

    fn accepts(&self, kind: SurfaceKind, qualifier: &Qualifier) -> bool {
        match self {
            Self::MatchesCapability {
                surface,
                qualifier: expected,
            } => *surface == kind && expected == qualifier,
        }
    }
}

impl std::fmt::Display for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MatchesCapability { surface, qualifier } => {
                f.write_str(&surface.route_guard(qualifier))
            },
        }
    }
}

/// A route of the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    /// Route path. Empty for surface routes.
    #[serde(default)]
    pub path: String,
    /// Component rendered by the route.
    pub component: String,
    /// Route data, e.g. title and heading of host surfaces.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Guards the route must pass.
    #[serde(default)]
    pub can_match: Vec<RouteGuard>,
}

impl RouteDescriptor {
    /// Create a route rendering `component`.
    #[must_use]
    pub fn new(path: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component: component.into(),
            data: Map::new(),
            can_match: Vec::new(),
        }
    }

    /// Route serving a host surface capability.
    #[must_use]
    pub fn for_capability(
        surface: SurfaceKind,
        qualifier: Qualifier,
        component: impl Into<String>,
    ) -> Self {
        Self::new("", component).with_guard(RouteGuard::matches_capability(surface, qualifier))
    }

    /// Add a guard.
    #[must_use]
    pub fn with_guard(mut self, guard: RouteGuard) -> Self {
        self.can_match.push(guard);
        self
    }

    /// Add a data entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Ordered route table of the host application.
#[derive(Debug, Default)]
pub struct HostRouteTable {
    routes: RwLock<Vec<RouteDescriptor>>,
}

impl HostRouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from routes.
    #[must_use]
    pub fn with_routes(routes: Vec<RouteDescriptor>) -> Self {
        Self {
            routes: RwLock::new(routes),
        }
    }

    /// Append a route. Earlier routes take precedence.
    pub fn add(&self, route: RouteDescriptor) {
        if let Ok(mut routes) = self.routes.write() {
            debug!(component = %route.component, "Host route added");
            routes.push(route);
        }
    }

    /// Snapshot of all routes in order.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteDescriptor> {
        self.routes.read().map(|r| r.clone()).unwrap_or_default()
    }

    /// Find the route serving a host surface.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NoMatchingRoute`] naming the guard the
    /// route is missing.
    pub fn find(
        &self,
        kind: SurfaceKind,
        qualifier: &Qualifier,
    ) -> Result<RouteDescriptor, NavigationError> {
        self.routes
            .read()
            .ok()
            .and_then(|routes| {
                routes
                    .iter()
                    .find(|route| {
                        route.path.is_empty()
                            && route.can_match.iter().any(|g| g.accepts(kind, qualifier))
                    })
                    .cloned()
            })
            .ok_or_else(|| NavigationError::NoMatchingRoute {
                surface: kind.label().to_string(),
                qualifier: qualifier.clone(),
                guard: kind.route_guard(qualifier),
            })
    }

    /// Serialize the table to the session-store format.
    ///
    /// # Errors
    ///
    /// Returns a serialization error.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.routes())
    }

    /// Restore a table from the session-store format.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::with_routes(serde_json::from_str(json)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn about() -> Qualifier {
        Qualifier::new().with("component", "about")
    }

    #[test]
    fn test_find_by_guard() {
        let table = HostRouteTable::new();
        table.add(RouteDescriptor::new("settings", "settings-page"));
        table.add(
            RouteDescriptor::for_capability(SurfaceKind::Dialog, about(), "about-page")
                .with_data("title", "About"),
        );

        let route = table.find(SurfaceKind::Dialog, &about()).unwrap();
        assert_eq!(route.component, "about-page");
        assert_eq!(route.data.get("title"), Some(&Value::from("About")));
    }

    #[test]
    fn test_missing_route_names_guard() {
        let table = HostRouteTable::new();
        table.add(RouteDescriptor::for_capability(SurfaceKind::Popup, about(), "about-page"));

        let err = table.find(SurfaceKind::Dialog, &about()).unwrap_err();
        assert!(
            err.to_string()
                .contains(r#"canMatchWorkbenchDialogCapability({"component":"about"})"#),
            "{err}"
        );
    }

    #[test]
    fn test_session_store_format() {
        let table = HostRouteTable::new();
        table.add(RouteDescriptor::new("first", "a"));
        table.add(RouteDescriptor::for_capability(SurfaceKind::View, about(), "b"));

        let json = table.to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["path"], "first");
        assert_eq!(value[1]["canMatch"][0]["guard"], "matchesCapability");
        assert_eq!(value[1]["canMatch"][0]["surface"], "view");

        let restored = HostRouteTable::from_json(&json).unwrap();
        assert_eq!(restored.routes(), table.routes());
    }
}
