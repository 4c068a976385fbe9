//! Capability validators, one per workbench surface.
//!
//! Every validator enforces the same base rules for its surface:
//!
//! - a non-empty qualifier, unless the capability is a built-in of the host
//! - a `properties` object
//! - host capabilities have an empty `path` and are served by a host route
//!   carrying the surface's guard; remote capabilities have a non-empty `path`
//! - host capabilities do not declare properties sourced from the host route
//!
//! Surface-specific rules (dialog size, docked part extras) are layered on
//! top in the per-surface modules. Validators only inspect; they never
//! rewrite the capability.
//!
//! The pairing of an empty host path with a route guard cannot be observed
//! here. It is checked when the surface is navigated (see the host route
//! table in `trestle-surfaces`).

mod dialog;
mod message_box;
mod notification;
mod part;
mod popup;
mod view;

pub use dialog::DialogCapabilityValidator;
pub use message_box::MessageBoxCapabilityValidator;
pub use notification::NotificationCapabilityValidator;
pub use part::PartCapabilityValidator;
pub use popup::PopupCapabilityValidator;
pub use view::ViewCapabilityValidator;

use serde_json::Value;
use std::sync::Arc;
use trestle_core::{Capability, DefinitionError, SurfaceKind};

use crate::enrich::is_builtin;
use crate::interceptor::RegistrationContext;
use crate::registry::CapabilityRegistry;

/// Properties a host capability must leave to its route declaration.
pub const HOST_ROUTE_PROPERTIES: [&str; 6] =
    ["title", "heading", "cssClass", "closable", "lazy", "showSplash"];

/// Register the validators of all surfaces, in [`SurfaceKind::ALL`] order.
pub fn register_all(registry: &CapabilityRegistry) {
    registry.register_capability_interceptor(Arc::new(PartCapabilityValidator));
    registry.register_capability_interceptor(Arc::new(ViewCapabilityValidator));
    registry.register_capability_interceptor(Arc::new(DialogCapabilityValidator));
    registry.register_capability_interceptor(Arc::new(PopupCapabilityValidator));
    registry.register_capability_interceptor(Arc::new(MessageBoxCapabilityValidator));
    registry.register_capability_interceptor(Arc::new(NotificationCapabilityValidator));
}

fn definition_error(kind: SurfaceKind, capability: &Capability, message: String) -> DefinitionError {
    DefinitionError::new(
        kind.label(),
        capability.app().clone(),
        capability.qualifier.clone(),
        message,
    )
}

/// Apply the base rules shared by every surface.
pub(crate) fn check_base_rules(
    kind: SurfaceKind,
    capability: &Capability,
    context: &RegistrationContext,
) -> Result<(), DefinitionError> {
    let host = context.is_host(capability);

    if capability.qualifier.is_empty() && !(host && is_builtin(capability)) {
        return Err(definition_error(
            kind,
            capability,
            format!("{} capability requires a qualifier.", kind.label()),
        ));
    }

    let Some(properties) = &capability.properties else {
        return Err(definition_error(
            kind,
            capability,
            format!("{} capability requires the 'properties' object.", kind.label()),
        ));
    };

    let path = properties.get("path");
    if host {
        if path.and_then(Value::as_str) != Some("") {
            return Err(definition_error(
                kind,
                capability,
                format!(
                    "{label} capabilities of the host application require an empty path. \
                     Change the path of the {type_name} capability to an empty path and add \
                     the guard `{guard}` to the route in the host's route table.",
                    label = kind.label(),
                    type_name = kind.type_name(),
                    guard = kind.route_guard(&capability.qualifier),
                ),
            ));
        }

        if let Some(property) = HOST_ROUTE_PROPERTIES
            .iter()
            .find(|p| properties.contains_key(**p))
        {
            return Err(definition_error(
                kind,
                capability,
                format!(
                    "Property '{property}' is not supported for {type_name} capabilities of the \
                     host application. Declare it in the data of the host route instead.",
                    type_name = kind.type_name(),
                ),
            ));
        }
    } else {
        match path {
            Some(Value::String(p)) if !p.is_empty() => {},
            Some(Value::String(_)) => {
                return Err(definition_error(
                    kind,
                    capability,
                    format!(
                        "{} capability requires a non-empty path. Empty paths are reserved for \
                         capabilities of the host application.",
                        kind.label()
                    ),
                ));
            },
            _ => {
                return Err(definition_error(
                    kind,
                    capability,
                    format!(
                        "{} capability requires the 'path' property to be a string.",
                        kind.label()
                    ),
                ));
            },
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use trestle_core::{AppSymbolicName, Qualifier};

    pub(crate) const HOST: &str = "workbench-host";
    pub(crate) const REMOTE: &str = "contacts";

    pub(crate) fn context() -> RegistrationContext {
        RegistrationContext {
            host_app: AppSymbolicName::new(HOST),
        }
    }

    pub(crate) fn remote(kind: SurfaceKind) -> Capability {
        Capability::new(kind.type_name())
            .with_qualifier(Qualifier::new().with("component", "contact"))
            .with_property("path", "contact/:id")
            .declared_by(AppSymbolicName::new(REMOTE))
    }

    pub(crate) fn host(kind: SurfaceKind) -> Capability {
        Capability::new(kind.type_name())
            .with_qualifier(Qualifier::new().with("component", "about"))
            .with_property("path", "")
            .declared_by(AppSymbolicName::new(HOST))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serde_json::Map;
    use trestle_core::Qualifier;

    #[test]
    fn test_remote_capability_passes() {
        for kind in SurfaceKind::ALL {
            assert!(check_base_rules(kind, &remote(kind), &context()).is_ok());
        }
    }

    #[test]
    fn test_empty_qualifier_rejected() {
        let capability = remote(SurfaceKind::Popup).with_qualifier(Qualifier::new());
        let err = check_base_rules(SurfaceKind::Popup, &capability, &context()).unwrap_err();
        assert_eq!(err.surface, "Popup");
        assert!(err.message.contains("requires a qualifier"));
    }

    #[test]
    fn test_builtin_marker_only_exempts_text_surfaces() {
        let marked = |kind: SurfaceKind| {
            let mut capability = host(kind).with_property(crate::enrich::BUILTIN_PROPERTY, true);
            capability.qualifier = Qualifier::new();
            capability
        };

        for kind in [SurfaceKind::View, SurfaceKind::Dialog, SurfaceKind::Popup, SurfaceKind::Part] {
            let err = check_base_rules(kind, &marked(kind), &context()).unwrap_err();
            assert!(err.message.contains("requires a qualifier"));
        }

        let message_box = crate::enrich::text_message_box_capability()
            .declared_by(trestle_core::AppSymbolicName::new(HOST));
        assert!(check_base_rules(SurfaceKind::MessageBox, &message_box, &context()).is_ok());

        let extra_param = message_box.with_param(trestle_core::ParamDescriptor::required("id"));
        assert!(check_base_rules(SurfaceKind::MessageBox, &extra_param, &context()).is_err());
    }

    #[test]
    fn test_missing_properties_rejected() {
        let mut capability = remote(SurfaceKind::View);
        capability.properties = None;
        let err = check_base_rules(SurfaceKind::View, &capability, &context()).unwrap_err();
        assert!(err.message.contains("'properties'"));
    }

    #[test]
    fn test_remote_path_must_be_string() {
        let mut capability = remote(SurfaceKind::Dialog);
        capability.properties = Some(Map::new());
        assert!(check_base_rules(SurfaceKind::Dialog, &capability, &context()).is_err());

        let capability = remote(SurfaceKind::Dialog).with_property("path", Value::Null);
        assert!(check_base_rules(SurfaceKind::Dialog, &capability, &context()).is_err());
    }

    #[test]
    fn test_remote_empty_path_rejected() {
        let capability = remote(SurfaceKind::MessageBox).with_property("path", "");
        let err = check_base_rules(SurfaceKind::MessageBox, &capability, &context()).unwrap_err();
        assert!(err.message.contains("non-empty path"));
    }

    #[test]
    fn test_host_empty_path_passes() {
        for kind in SurfaceKind::ALL {
            assert!(check_base_rules(kind, &host(kind), &context()).is_ok());
        }
    }

    #[test]
    fn test_host_non_empty_path_names_guard() {
        let capability = host(SurfaceKind::Dialog).with_property("path", "about");
        let err = check_base_rules(SurfaceKind::Dialog, &capability, &context()).unwrap_err();
        assert!(
            err.message
                .contains(r#"`canMatchWorkbenchDialogCapability({"component":"about"})`"#)
        );
    }

    #[test]
    fn test_host_route_properties_rejected() {
        for property in HOST_ROUTE_PROPERTIES {
            let capability = host(SurfaceKind::View).with_property(property, "x");
            let err = check_base_rules(SurfaceKind::View, &capability, &context()).unwrap_err();
            assert!(err.message.contains(property), "{property}");
        }
    }

    #[test]
    fn test_remote_may_declare_route_properties() {
        let capability = remote(SurfaceKind::View).with_property("title", "Contact");
        assert!(check_base_rules(SurfaceKind::View, &capability, &context()).is_ok());
    }
}
