//! Built-in capabilities of the host application.

use tracing::debug;
use trestle_core::{
    Capability, Intention, ParamDescriptor, Qualifier, QualifierPattern, SurfaceKind,
};

use crate::interceptor::ManifestInterceptor;
use crate::manifest::Manifest;

/// Property marking a capability as built-in.
pub const BUILTIN_PROPERTY: &str = "builtin";

/// Parameter carrying the text of built-in message boxes and notifications.
pub const MESSAGE_PARAM: &str = "message";

fn text_capability(kind: SurfaceKind) -> Capability {
    Capability::new(kind.type_name())
        .with_qualifier(Qualifier::new())
        .with_property("path", "")
        .with_property(BUILTIN_PROPERTY, true)
        .with_param(ParamDescriptor::optional(MESSAGE_PARAM))
        .public()
}

/// The built-in message box displaying plain text.
///
/// Addressed with an empty qualifier; the text is passed in the
/// [`MESSAGE_PARAM`] parameter.
#[must_use]
pub fn text_message_box_capability() -> Capability {
    text_capability(SurfaceKind::MessageBox)
}

/// The built-in notification displaying plain text.
#[must_use]
pub fn text_notification_capability() -> Capability {
    text_capability(SurfaceKind::Notification)
}

/// Injects the built-in capabilities into the host manifest.
///
/// Also grants the host wildcard intentions for every surface, so it can
/// open any public surface of any application.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCapabilityProvider;

impl ManifestInterceptor for BuiltinCapabilityProvider {
    fn name(&self) -> &str {
        "builtin-capability-provider"
    }

    fn intercept(&self, manifest: &mut Manifest) {
        manifest.capabilities.push(text_message_box_capability());
        manifest.capabilities.push(text_notification_capability());
        for kind in SurfaceKind::ALL {
            manifest
                .intentions
                .push(Intention::new(kind.type_name(), QualifierPattern::any()));
        }
        debug!(
            capabilities = manifest.capabilities.len(),
            intentions = manifest.intentions.len(),
            "Injected built-in capabilities into host manifest"
        );
    }
}
