//! Message box capability validator.

use trestle_core::{Capability, DefinitionError, SurfaceKind};

use super::check_base_rules;
use crate::interceptor::{CapabilityInterceptor, RegistrationContext};

/// Validates message box capabilities.
///
/// The built-in text message box of the host is the only message box
/// capability allowed without a qualifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageBoxCapabilityValidator;

impl CapabilityInterceptor for MessageBoxCapabilityValidator {
    fn name(&self) -> &str {
        "messagebox-capability-validator"
    }

    fn intercept(
        &self,
        capability: Capability,
        context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        if capability.surface() == Some(SurfaceKind::MessageBox) {
            check_base_rules(SurfaceKind::MessageBox, &capability, context)?;
        }
        Ok(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::enrich::text_message_box_capability;
    use trestle_core::{AppSymbolicName, Qualifier};

    #[test]
    fn test_builtin_text_message_box_passes_without_qualifier() {
        let builtin = text_message_box_capability().declared_by(AppSymbolicName::new(HOST));
        assert!(MessageBoxCapabilityValidator.intercept(builtin, &context()).is_ok());
    }

    #[test]
    fn test_remote_cannot_claim_builtin() {
        let imposter = text_message_box_capability().declared_by(AppSymbolicName::new(REMOTE));
        assert!(MessageBoxCapabilityValidator.intercept(imposter, &context()).is_err());
    }

    #[test]
    fn test_host_message_box_without_qualifier_rejected() {
        let capability = host(SurfaceKind::MessageBox).with_qualifier(Qualifier::new());
        assert!(MessageBoxCapabilityValidator.intercept(capability, &context()).is_err());
    }
}
