//! Popup capability validator.

use trestle_core::{Capability, DefinitionError, SurfaceKind};

use super::check_base_rules;
use crate::interceptor::{CapabilityInterceptor, RegistrationContext};

/// Validates popup capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopupCapabilityValidator;

impl CapabilityInterceptor for PopupCapabilityValidator {
    fn name(&self) -> &str {
        "popup-capability-validator"
    }

    fn intercept(
        &self,
        capability: Capability,
        context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        if capability.surface() == Some(SurfaceKind::Popup) {
            check_base_rules(SurfaceKind::Popup, &capability, context)?;
        }
        Ok(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_popup_rules() {
        assert!(
            PopupCapabilityValidator
                .intercept(remote(SurfaceKind::Popup), &context())
                .is_ok()
        );
        let err = PopupCapabilityValidator
            .intercept(host(SurfaceKind::Popup).with_property("cssClass", "x"), &context())
            .unwrap_err();
        assert!(err.to_string().starts_with("[PopupDefinitionError]"));
    }
}
