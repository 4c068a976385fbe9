//! Intent handlers of the workbench surfaces.
//!
//! A surface handler swallows intents for its surface: it opens the
//! container in a detached task and returns at once, because the surface may
//! stay open indefinitely. When the session ends, the issuer receives exactly
//! one reply: TERMINAL with the close result, or ERROR. Replies to a disposed
//! bus are dropped.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use trestle_core::SurfaceKind;
use trestle_events::{MessageBus, Replier};
use trestle_surfaces::{NotificationDuration, SurfaceLauncher, SurfaceRequest};

use crate::broker::IntentBroker;
use crate::error::IntentResult;
use crate::interceptor::{IntentInterceptor, Next};
use crate::message::{DURATION_HEADER, IntentMessage};

/// Opens surfaces of one kind in response to intents.
#[derive(Debug, Clone)]
pub struct SurfaceIntentHandler {
    kind: SurfaceKind,
    name: String,
    bus: MessageBus,
    launcher: SurfaceLauncher,
}

impl SurfaceIntentHandler {
    /// Create a handler for intents of `kind`.
    #[must_use]
    pub fn new(kind: SurfaceKind, bus: MessageBus, launcher: SurfaceLauncher) -> Self {
        Self {
            kind,
            name: format!("{}-intent-handler", kind.type_name()),
            bus,
            launcher,
        }
    }

    /// Surface kind handled.
    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    fn request(&self, message: &IntentMessage) -> SurfaceRequest {
        let mut request = SurfaceRequest::new(message.capability.clone())
            .with_params(message.intent.params.clone());
        if let Some(sender) = message.sender() {
            request = request.with_referrer(sender);
        }
        if self.kind == SurfaceKind::Notification
            && let Some(duration) = message
                .header(DURATION_HEADER)
                .and_then(NotificationDuration::from_value)
        {
            request = request.with_duration(duration);
        }
        request
    }
}

#[async_trait]
impl IntentInterceptor for SurfaceIntentHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn intercept(&self, message: IntentMessage, next: Next<'_>) -> IntentResult<()> {
        if message.intent.surface() != Some(self.kind) {
            return next.handle(message).await;
        }

        let request = self.request(&message);
        let replier = message
            .reply_to()
            .map(|reply_to| Replier::new(self.bus.clone(), reply_to));
        let launcher = self.launcher.clone();
        let kind = self.kind;

        debug!(
            kind = %kind,
            capability_id = message.capability.id(),
            "Opening surface for intent"
        );
        tokio::spawn(async move {
            let outcome = launcher.open(request).await;
            match (replier, outcome) {
                (Some(replier), Ok(result)) => replier.terminal(result),
                (Some(replier), Err(e)) => replier.error(e),
                (None, Err(e)) => warn!(kind = %kind, error = %e, "Surface failed"),
                (None, Ok(_)) => {},
            }
        });
        Ok(())
    }
}

/// Register the handlers of the intent-handled surfaces, in the order
/// Dialog, Popup, MessageBox, Notification.
pub fn register_surface_handlers(broker: &IntentBroker, bus: &MessageBus, launcher: &SurfaceLauncher) {
    for kind in SurfaceKind::ALL.into_iter().filter(|k| k.is_intent_handled()) {
        broker.register_intent_interceptor(Arc::new(SurfaceIntentHandler::new(
            kind,
            bus.clone(),
            launcher.clone(),
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use trestle_capabilities::CapabilityRegistry;
    use trestle_core::{AppSymbolicName, Capability, Intent, NavigationError, Qualifier};
    use trestle_events::ReplyError;
    use trestle_surfaces::{
        HostRouteTable, OutletId, OutletTarget, SurfaceHandle, WorkbenchShell,
    };

    #[derive(Default)]
    struct ClosingShell {
        presented: Mutex<Vec<SurfaceHandle>>,
    }

    #[async_trait]
    impl WorkbenchShell for ClosingShell {
        async fn present(&self, handle: SurfaceHandle) {
            self.presented.lock().unwrap().push(handle);
        }

        async fn navigate(
            &self,
            _outlet: &OutletId,
            _target: &OutletTarget,
        ) -> Result<(), NavigationError> {
            Ok(())
        }

        async fn clear(&self, _outlet: &OutletId) {}
    }

    fn handler(kind: SurfaceKind, shell: Arc<ClosingShell>) -> (MessageBus, SurfaceIntentHandler) {
        let bus = MessageBus::new();
        let registry = Arc::new(CapabilityRegistry::new(AppSymbolicName::new("host")));
        registry
            .register_application(trestle_capabilities::Application::new(
                "contacts",
                "https://contacts.example",
                trestle_capabilities::Manifest::new(),
            ))
            .unwrap();
        let launcher =
            SurfaceLauncher::new(bus.clone(), shell, registry, Arc::new(HostRouteTable::new()));
        let handler = SurfaceIntentHandler::new(kind, bus.clone(), launcher);
        (bus, handler)
    }

    fn popup_message() -> IntentMessage {
        let qualifier = Qualifier::new().with("component", "contact");
        IntentMessage::new(
            Intent::for_surface(SurfaceKind::Popup, qualifier.clone()),
            Capability::new("popup")
                .with_qualifier(qualifier)
                .with_property("path", "contact")
                .declared_by(AppSymbolicName::new("contacts")),
        )
    }

    #[tokio::test]
    async fn test_other_intents_are_forwarded() {
        let (_bus, handler) = handler(SurfaceKind::Dialog, Arc::new(ClosingShell::default()));
        let forwarded = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&forwarded);
        let terminal = move |_message: IntentMessage| {
            *flag.lock().unwrap() = true;
            Ok(())
        };
        let interceptors: Vec<Arc<dyn IntentInterceptor>> = vec![Arc::new(handler)];

        Next::new(&interceptors, &terminal)
            .handle(popup_message())
            .await
            .unwrap();
        assert!(*forwarded.lock().unwrap());
    }

    #[tokio::test]
    async fn test_swallows_and_replies_on_close() {
        let shell = Arc::new(ClosingShell::default());
        let (bus, handler) = handler(SurfaceKind::Popup, Arc::clone(&shell));
        let receiver = bus.reply_receiver().unwrap();
        let mut message = popup_message();
        message.headers.insert(
            trestle_events::headers::REPLY_TO.into(),
            receiver.reply_to().into(),
        );
        let terminal = |_message: IntentMessage| -> IntentResult<()> {
            panic!("surface intents must not reach the terminal")
        };
        let interceptors: Vec<Arc<dyn IntentInterceptor>> = vec![Arc::new(handler)];

        // Returns before the popup is closed.
        Next::new(&interceptors, &terminal)
            .handle(message)
            .await
            .unwrap();

        let handle = loop {
            if let Some(handle) = shell.presented.lock().unwrap().first().cloned() {
                break handle;
            }
            tokio::task::yield_now().await;
        };
        handle.close_with_error("cancelled");
        assert_eq!(
            receiver.result().await.unwrap_err(),
            ReplyError::Remote("cancelled".into())
        );
    }
}
