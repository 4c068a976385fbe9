//! Dialog capability validator.

use serde_json::Value;
use trestle_core::{Capability, DefinitionError, SurfaceKind};

use super::{check_base_rules, definition_error};
use crate::interceptor::{CapabilityInterceptor, RegistrationContext};

/// Validates dialog capabilities.
///
/// Dialogs of remote applications must declare `size.width` and
/// `size.height`: the dialog is sized before the microfrontend has loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogCapabilityValidator;

impl CapabilityInterceptor for DialogCapabilityValidator {
    fn name(&self) -> &str {
        "dialog-capability-validator"
    }

    fn intercept(
        &self,
        capability: Capability,
        context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        if capability.surface() != Some(SurfaceKind::Dialog) {
            return Ok(capability);
        }
        check_base_rules(SurfaceKind::Dialog, &capability, context)?;

        if !context.is_host(&capability) {
            let size = capability.property("size");
            let has = |key: &str| {
                size.and_then(|s| s.get(key))
                    .is_some_and(|v| matches!(v, Value::String(s) if !s.is_empty()))
            };
            if !has("width") || !has("height") {
                return Err(definition_error(
                    SurfaceKind::Dialog,
                    &capability,
                    "Dialog capability requires a size. Specify 'size.width' and 'size.height' \
                     in the properties of the capability."
                        .to_string(),
                ));
            }
        }
        Ok(capability)
    }
}
