//! Part capability validator.

use serde_json::Value;
use trestle_core::{Capability, DefinitionError, SurfaceKind};

use super::{check_base_rules, definition_error};
use crate::interceptor::{CapabilityInterceptor, RegistrationContext};

/// Validates part capabilities.
///
/// A part that declares `extras` is docked to the side bar and must name the
/// `icon` and `label` of its toggle button.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartCapabilityValidator;

impl CapabilityInterceptor for PartCapabilityValidator {
    fn name(&self) -> &str {
        "part-capability-validator"
    }

    fn intercept(
        &self,
        capability: Capability,
        context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        if capability.surface() != Some(SurfaceKind::Part) {
            return Ok(capability);
        }
        check_base_rules(SurfaceKind::Part, &capability, context)?;

        if let Some(extras) = capability.property("extras") {
            for key in ["icon", "label"] {
                let present = extras
                    .get(key)
                    .is_some_and(|v| matches!(v, Value::String(s) if !s.is_empty()));
                if !present {
                    return Err(definition_error(
                        SurfaceKind::Part,
                        &capability,
                        format!("Docked part requires the '{key}' property in 'extras'."),
                    ));
                }
            }
        }
        Ok(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_part_passes() {
        assert!(
            PartCapabilityValidator
                .intercept(remote(SurfaceKind::Part), &context())
                .is_ok()
        );
    }

    #[test]
    fn test_docked_part_requires_icon_and_label() {
        let capability =
            remote(SurfaceKind::Part).with_property("extras", json!({"icon": "folder"}));
        let err = PartCapabilityValidator
            .intercept(capability, &context())
            .unwrap_err();
        assert!(err.message.contains("'label'"));

        let capability = remote(SurfaceKind::Part)
            .with_property("extras", json!({"icon": "folder", "label": "Files"}));
        assert!(PartCapabilityValidator.intercept(capability, &context()).is_ok());
    }
}
