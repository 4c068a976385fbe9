//! Notification capability validator.

use trestle_core::{Capability, DefinitionError, SurfaceKind};

use super::check_base_rules;
use crate::interceptor::{CapabilityInterceptor, RegistrationContext};

/// Validates notification capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationCapabilityValidator;

impl CapabilityInterceptor for NotificationCapabilityValidator {
    fn name(&self) -> &str {
        "notification-capability-validator"
    }

    fn intercept(
        &self,
        capability: Capability,
        context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        if capability.surface() == Some(SurfaceKind::Notification) {
            check_base_rules(SurfaceKind::Notification, &capability, context)?;
        }
        Ok(capability)
    }
}
