//! Test fixtures for common types.

use serde_json::json;
use trestle_capabilities::{Application, Manifest};
use trestle_core::{Capability, Intention, ParamDescriptor, Qualifier, QualifierPattern};

/// Symbolic name of the host application in fixtures.
pub const TEST_HOST_APP: &str = "workbench-host";

/// Symbolic name of the remote application in fixtures.
pub const TEST_APP: &str = "contacts";

/// Base URL of [`TEST_APP`].
pub const TEST_BASE_URL: &str = "https://contacts.example.com/";

/// A qualifier with a single `component` entry.
#[must_use]
pub fn test_qualifier(component: &str) -> Qualifier {
    Qualifier::new().with("component", component)
}

/// A remote dialog capability with a size and path.
#[must_use]
pub fn test_dialog_capability(component: &str, path: &str) -> Capability {
    Capability::new("dialog")
        .with_qualifier(test_qualifier(component))
        .with_property("path", path)
        .with_property("size", json!({"width": "400px", "height": "300px"}))
}

/// A remote popup capability.
#[must_use]
pub fn test_popup_capability(component: &str, path: &str) -> Capability {
    Capability::new("popup")
        .with_qualifier(test_qualifier(component))
        .with_property("path", path)
}

/// A remote message box capability.
#[must_use]
pub fn test_message_box_capability(component: &str, path: &str) -> Capability {
    Capability::new("messagebox")
        .with_qualifier(test_qualifier(component))
        .with_property("path", path)
}

/// A remote notification capability.
#[must_use]
pub fn test_notification_capability(component: &str, path: &str) -> Capability {
    Capability::new("notification")
        .with_qualifier(test_qualifier(component))
        .with_property("path", path)
}

/// A remote view capability with a required `id` parameter.
#[must_use]
pub fn test_view_capability(entity: &str, path: &str) -> Capability {
    Capability::new("view")
        .with_qualifier(Qualifier::new().with("entity", entity))
        .with_param(ParamDescriptor::required("id"))
        .with_property("path", path)
        .with_property("title", "View :id")
}

/// An intention covering every qualifier of `intention_type`.
#[must_use]
pub fn test_wildcard_intention(intention_type: &str) -> Intention {
    Intention::new(intention_type, QualifierPattern::any())
}

/// A manifest with a public contact dialog and a confirm message box.
#[must_use]
pub fn test_manifest() -> Manifest {
    Manifest::new()
        .with_capability(test_dialog_capability("contact", "contact/:id").public())
        .with_capability(test_message_box_capability("confirm", "confirm").public())
}

/// The host application with an empty manifest.
#[must_use]
pub fn test_host_app() -> Application {
    Application::new(TEST_HOST_APP, "", Manifest::new())
}

/// [`TEST_APP`] providing `manifest`.
#[must_use]
pub fn test_application(manifest: Manifest) -> Application {
    Application::new(TEST_APP, TEST_BASE_URL, manifest)
}
