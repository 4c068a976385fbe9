//! Stable capability identifiers.

use std::collections::HashSet;
use tracing::trace;
use trestle_core::{Capability, DefinitionError, SurfaceKind, stable_capability_id};

use crate::interceptor::{CapabilityInterceptor, RegistrationContext};

/// Replaces the registry-assigned id with a stable one.
///
/// The stable id is derived from the capability's type, qualifier and
/// declaring application, so it survives reloads. Surfaces need it to
/// restore their outlets from the session store.
#[derive(Debug, Clone)]
pub struct StableIdAssigner {
    types: HashSet<String>,
}

impl StableIdAssigner {
    /// Assign stable ids to capabilities of the given types.
    #[must_use]
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Assign stable ids to capabilities of every workbench surface.
    #[must_use]
    pub fn for_surfaces() -> Self {
        Self::new(SurfaceKind::ALL.iter().map(|kind| kind.type_name()))
    }
}

impl CapabilityInterceptor for StableIdAssigner {
    fn name(&self) -> &str {
        "stable-id-assigner"
    }

    fn intercept(
        &self,
        mut capability: Capability,
        _context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        if self.types.contains(&capability.capability_type) {
            let id = stable_capability_id(&capability);
            trace!(capability_type = %capability.capability_type, %id, "Assigned stable id");
            capability.metadata.id = Some(id);
        }
        Ok(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trestle_core::{AppSymbolicName, Qualifier};

    fn context() -> RegistrationContext {
        RegistrationContext {
            host_app: AppSymbolicName::new("host"),
        }
    }

    fn dialog(app: &str) -> Capability {
        let mut capability = Capability::new("dialog")
            .with_qualifier(Qualifier::new().with("component", "contact"))
            .declared_by(AppSymbolicName::new(app));
        capability.metadata.id = Some("random".into());
        capability
    }

    #[test]
    fn test_replaces_id_for_registered_types() {
        let assigner = StableIdAssigner::for_surfaces();
        let first = assigner.intercept(dialog("contacts"), &context()).unwrap();
        let second = assigner.intercept(dialog("contacts"), &context()).unwrap();
        assert_ne!(first.id(), "random");
        assert_eq!(first.id(), second.id());
        assert_eq!(first.id(), stable_capability_id(&dialog("contacts")));
    }

    #[test]
    fn test_id_differs_per_app() {
        let assigner = StableIdAssigner::for_surfaces();
        let a = assigner.intercept(dialog("a"), &context()).unwrap();
        let b = assigner.intercept(dialog("b"), &context()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_other_types_keep_their_id() {
        let assigner = StableIdAssigner::new(["view"]);
        let capability = assigner.intercept(dialog("contacts"), &context()).unwrap();
        assert_eq!(capability.id(), "random");
    }
}
