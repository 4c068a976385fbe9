//! Desktop pinning.

use serde::{Deserialize, Serialize};
use trestle_core::{Capability, DefinitionError, QualifierPattern};

use crate::interceptor::{CapabilityInterceptor, RegistrationContext};

/// Property set on pinned capabilities.
pub const PIN_TO_DESKTOP_PROPERTY: &str = "pinToDesktop";

/// Selects capabilities to pin to the desktop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRule {
    /// Capability type.
    #[serde(rename = "type")]
    pub capability_type: String,
    /// Qualifier pattern the capability's qualifier must match.
    #[serde(default)]
    pub qualifier: QualifierPattern,
}

impl PinRule {
    /// Create a rule.
    #[must_use]
    pub fn new(capability_type: impl Into<String>, qualifier: QualifierPattern) -> Self {
        Self {
            capability_type: capability_type.into(),
            qualifier,
        }
    }

    fn matches(&self, capability: &Capability) -> bool {
        self.capability_type == capability.capability_type
            && self.qualifier.matches(&capability.qualifier)
    }
}

/// Sets [`PIN_TO_DESKTOP_PROPERTY`] on capabilities matching any rule.
#[derive(Debug, Clone, Default)]
pub struct DesktopPinEnricher {
    rules: Vec<PinRule>,
}

impl DesktopPinEnricher {
    /// Create an enricher from pin rules.
    #[must_use]
    pub fn new(rules: Vec<PinRule>) -> Self {
        Self { rules }
    }
}

impl CapabilityInterceptor for DesktopPinEnricher {
    fn name(&self) -> &str {
        "desktop-pin-enricher"
    }

    fn intercept(
        &self,
        capability: Capability,
        _context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        if self.rules.iter().any(|rule| rule.matches(&capability)) {
            return Ok(capability.with_property(PIN_TO_DESKTOP_PROPERTY, true));
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

    #[test]
    fn test_pins_matching_capability() {
        let enricher = DesktopPinEnricher::new(vec![PinRule::new(
            "view",
            QualifierPattern::from_entries([("component", "*")]),
        )]);
        let capability = Capability::new("view")
            .with_qualifier(Qualifier::new().with("component", "inbox"))
            .with_property("path", "inbox");

        let pinned = enricher.intercept(capability, &context()).unwrap();
        assert_eq!(
            pinned.property(PIN_TO_DESKTOP_PROPERTY),
            Some(&serde_json::Value::Bool(true))
        );
        assert_eq!(pinned.path(), Some("inbox"));
    }

    #[test]
    fn test_leaves_other_capabilities_untouched() {
        let enricher = DesktopPinEnricher::new(vec![PinRule::new(
            "view",
            QualifierPattern::from_entries([("component", "inbox")]),
        )]);
        let capability =
            Capability::new("dialog").with_qualifier(Qualifier::new().with("component", "inbox"));
        let result = enricher.intercept(capability.clone(), &context()).unwrap();
        assert_eq!(result, capability);
    }

    #[test]
    fn test_rule_deserializes_wildcards() {
        let rule: PinRule =
            serde_json::from_str(r#"{"type":"view","qualifier":{"*":"*"}}"#).unwrap();
        assert!(rule.qualifier.allows_wildcard_keys());
    }
}
