//! View capability validator.

use trestle_core::{Capability, DefinitionError, SurfaceKind};

use super::check_base_rules;
use crate::interceptor::{CapabilityInterceptor, RegistrationContext};

/// Validates view capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewCapabilityValidator;

impl CapabilityInterceptor for ViewCapabilityValidator {
    fn name(&self) -> &str {
        "view-capability-validator"
    }

    fn intercept(
        &self,
        capability: Capability,
        context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        if capability.surface() == Some(SurfaceKind::View) {
            check_base_rules(SurfaceKind::View, &capability, context)?;
        }
        Ok(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_host_view_must_not_declare_title() {
        let err = ViewCapabilityValidator
            .intercept(host(SurfaceKind::View).with_property("title", "About"), &context())
            .unwrap_err();
        assert!(err.to_string().starts_with("[ViewDefinitionError]"));
        assert!(err.message.contains("'title'"));
    }

    #[test]
    fn test_remote_view_without_path_rejected() {
        let mut capability = remote(SurfaceKind::View);
        if let Some(properties) = capability.properties.as_mut() {
            properties.remove("path");
        }
        assert!(ViewCapabilityValidator.intercept(capability, &context()).is_err());
    }
}
