//! Intent broker.
//!
//! Receives intents published to [`INTENT_TOPIC`], resolves them against the
//! capability registry and runs them through the interceptor chain. The
//! chain's terminal forwards the intent to the provider's inbox topic. When
//! an intent cannot be resolved, the issuer receives an error reply.

use serde_json::json;
use std::sync::{Arc, RwLock};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};
use trestle_capabilities::CapabilityRegistry;
use trestle_core::{AppSymbolicName, Intent, ResolutionError};
use trestle_events::{Message, MessageBus, PublishOptions, Replier};
use trestle_telemetry::RequestContext;

use crate::error::{IntentError, IntentResult};
use crate::interceptor::{IntentInterceptor, Next};
use crate::message::{INTENT_TOPIC, IntentMessage, inbox_topic};

/// Dispatches intents to interceptors and providers.
#[derive(Clone)]
pub struct IntentBroker {
    bus: MessageBus,
    registry: Arc<CapabilityRegistry>,
    interceptors: Arc<RwLock<Vec<Arc<dyn IntentInterceptor>>>>,
}

impl std::fmt::Debug for IntentBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentBroker")
            .field("interceptors", &self.interceptor_names())
            .finish_non_exhaustive()
    }
}

impl IntentBroker {
    /// Create a broker.
    #[must_use]
    pub fn new(bus: MessageBus, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            bus,
            registry,
            interceptors: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append an interceptor. Interceptors run in registration order.
    pub fn register_intent_interceptor(&self, interceptor: Arc<dyn IntentInterceptor>) {
        match self.interceptors.write() {
            Ok(mut interceptors) => {
                debug!(interceptor = interceptor.name(), "Registered intent interceptor");
                interceptors.push(interceptor);
            },
            Err(e) => warn!(error = %e, "Intent interceptor chain poisoned"),
        }
    }

    /// Interceptor names in execution order.
    #[must_use]
    pub fn interceptor_names(&self) -> Vec<String> {
        self.interceptors
            .read()
            .map(|i| i.iter().map(|i| i.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// Start receiving intents.
    ///
    /// The subscription is in place when this returns; the task ends when
    /// the bus is disposed.
    ///
    /// # Errors
    ///
    /// Returns a bus error if subscribing fails.
    pub fn spawn(&self) -> IntentResult<JoinHandle<()>> {
        let mut subscription = self.bus.subscribe(INTENT_TOPIC)?;
        let broker = self.clone();
        info!("Intent broker started");
        Ok(tokio::spawn(async move {
            while let Some(message) = subscription.recv().await {
                // Failures are logged and replied to by dispatch.
                let _ = broker.dispatch(&message).await;
            }
            debug!("Intent broker stopped");
        }))
    }

    /// Dispatch one intent message.
    ///
    /// # Errors
    ///
    /// Returns why the intent could not be dispatched; the issuer has
    /// already received an error reply.
    pub async fn dispatch(&self, message: &Message) -> IntentResult<()> {
        let mut context = RequestContext::new("intent-broker");
        if let Some(sender) = message.sender() {
            context = context.with_app(sender);
        }
        let result = self.route(message).instrument(context.span()).await;
        if let Err(e) = &result {
            warn!(topic = %message.topic, error = %e, "Intent dispatch failed");
            if let Some(replier) = Replier::for_request(&self.bus, message) {
                replier.error(e);
            }
        }
        result
    }

    async fn route(&self, message: &Message) -> IntentResult<()> {
        let intent: Intent = match &message.body {
            Some(body) => serde_json::from_value(body.clone())
                .map_err(|e| IntentError::Malformed(e.to_string()))?,
            None => return Err(IntentError::Malformed("empty body".into())),
        };
        let sender = message
            .sender()
            .map(AppSymbolicName::new)
            .ok_or_else(|| IntentError::Malformed("missing sender header".into()))?;

        let capabilities = if intent.surface().is_some() {
            vec![self.registry.resolve_one(&intent, &sender)?]
        } else {
            let capabilities = self.registry.resolve(&intent, &sender)?;
            if capabilities.is_empty() {
                return Err(IntentError::Capability(
                    ResolutionError::NoCapability {
                        intent_type: intent.intent_type.clone(),
                        qualifier: intent.qualifier.clone(),
                        app: sender,
                    }
                    .into(),
                ));
            }
            capabilities
        };

        let interceptors = self
            .interceptors
            .read()
            .map(|i| i.clone())
            .unwrap_or_default();
        let bus = self.bus.clone();
        let terminal = move |message: IntentMessage| forward(&bus, message);

        for capability in capabilities {
            debug!(
                intent_type = %intent.intent_type,
                app = %capability.app(),
                capability_id = capability.id(),
                "Dispatching intent"
            );
            let intent_message = IntentMessage {
                intent: intent.clone(),
                capability,
                headers: message.headers.clone(),
            };
            Next::new(&interceptors, &terminal)
                .handle(intent_message)
                .await?;
        }
        Ok(())
    }
}

/// Forward an intent to the inbox of its provider.
fn forward(bus: &MessageBus, message: IntentMessage) -> IntentResult<()> {
    let topic = inbox_topic(message.capability.app());
    let body = json!({
        "intent": message.intent,
        "capability": message.capability,
    });
    let options = PublishOptions {
        retain: false,
        headers: message.headers,
    };
    bus.publish(&topic, Some(body), options)?;
    debug!(%topic, "Intent forwarded to provider");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use trestle_capabilities::{Application, Manifest};
    use trestle_core::{Capability, Intention, Qualifier, QualifierPattern};
    use trestle_events::{ReplyError, headers};

    fn fixture() -> (MessageBus, IntentBroker) {
        let bus = MessageBus::new();
        let registry = Arc::new(CapabilityRegistry::new(AppSymbolicName::new("host")));
        registry
            .register_application(Application::new(
                "clock",
                "https://clock.example",
                Manifest::new().with_capability(
                    Capability::new("time")
                        .with_qualifier(Qualifier::new().with("zone", "utc"))
                        .public(),
                ),
            ))
            .unwrap();
        registry
            .register_application(Application::new(
                "mail",
                "https://mail.example",
                Manifest::new().with_intention(Intention::new("time", QualifierPattern::any())),
            ))
            .unwrap();
        let broker = IntentBroker::new(bus.clone(), registry);
        (bus, broker)
    }

    #[tokio::test]
    async fn test_forwards_to_provider_inbox() {
        let (bus, broker) = fixture();
        let mut inbox = bus.subscribe("trestle/intents/clock").unwrap();
        let intent = Intent::new("time").with_qualifier(Qualifier::new().with("zone", "utc"));
        let mut message = Message::new(INTENT_TOPIC, Some(serde_json::to_value(&intent).unwrap()));
        message
            .headers
            .insert(headers::SENDER.into(), Value::from("mail"));

        broker.dispatch(&message).await.unwrap();

        let forwarded = inbox.recv().await.unwrap();
        assert_eq!(forwarded.sender(), Some("mail"));
        let body = forwarded.body.unwrap();
        assert_eq!(body["intent"]["type"], "time");
        assert_eq!(body["capability"]["metadata"]["appSymbolicName"], "clock");
    }

    #[tokio::test]
    async fn test_unresolvable_intent_replies_error() {
        let (bus, broker) = fixture();
        let receiver = bus.reply_receiver().unwrap();
        let intent = Intent::new("time").with_qualifier(Qualifier::new().with("zone", "cet"));
        let mut message = Message::new(INTENT_TOPIC, Some(serde_json::to_value(&intent).unwrap()));
        message
            .headers
            .insert(headers::SENDER.into(), Value::from("mail"));
        message
            .headers
            .insert(headers::REPLY_TO.into(), Value::from(receiver.reply_to()));

        assert!(broker.dispatch(&message).await.is_err());
        match receiver.result().await.unwrap_err() {
            ReplyError::Remote(reason) => assert!(reason.contains("NullProviderError"), "{reason}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_sender_is_malformed() {
        let (_bus, broker) = fixture();
        let message = Message::new(
            INTENT_TOPIC,
            Some(serde_json::to_value(Intent::new("time")).unwrap()),
        );
        assert!(matches!(
            broker.dispatch(&message).await,
            Err(IntentError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_spawned_broker_handles_published_intents() {
        let (bus, broker) = fixture();
        let _task = broker.spawn().unwrap();
        let mut inbox = bus.subscribe("trestle/intents/clock").unwrap();
        let intent = Intent::new("time").with_qualifier(Qualifier::new().with("zone", "utc"));
        bus.publish(
            INTENT_TOPIC,
            Some(serde_json::to_value(&intent).unwrap()),
            PublishOptions::default().with_header(headers::SENDER, "mail"),
        )
        .unwrap();

        assert!(inbox.recv().await.is_some());
    }
}
