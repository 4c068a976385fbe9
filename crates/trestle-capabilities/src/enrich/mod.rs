//! Capability enrichers.
//!
//! Enrichers are capability interceptors that rewrite a capability after it
//! passed validation. They are registered after the validators and run in
//! registration order; two enrichers touching the same property must be
//! ordered deliberately.

mod builtin;
mod desktop_pin;
mod stable_id;

pub use builtin::{
    BUILTIN_PROPERTY, BuiltinCapabilityProvider, MESSAGE_PARAM, text_message_box_capability,
    text_notification_capability,
};
pub use desktop_pin::{DesktopPinEnricher, PIN_TO_DESKTOP_PROPERTY, PinRule};
pub use stable_id::StableIdAssigner;

use serde_json::Value;
use trestle_core::{Capability, SurfaceKind};

/// Whether the capability is one of the built-in capabilities of the host.
///
/// Only text message boxes and text notifications qualify, and only in the
/// shape [`BuiltinCapabilityProvider`] injects them: marked built-in, empty
/// qualifier and path, and the built-in parameters.
#[must_use]
pub fn is_builtin(capability: &Capability) -> bool {
    let reference = match capability.surface() {
        Some(SurfaceKind::MessageBox) => text_message_box_capability(),
        Some(SurfaceKind::Notification) => text_notification_capability(),
        _ => return false,
    };
    capability.property(BUILTIN_PROPERTY) == Some(&Value::Bool(true))
        && capability.qualifier == reference.qualifier
        && capability.params == reference.params
        && capability.path() == Some("")
}
