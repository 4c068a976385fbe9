//! Per-surface open entry points for the host UI shell.
//!
//! Each call issues an intent on behalf of one application and resolves with
//! the surface's result once it closes.

use serde_json::Value;
use trestle_capabilities::enrich::MESSAGE_PARAM;
use trestle_core::{Intent, Params, Qualifier, SurfaceKind};
use trestle_events::PublishOptions;
use trestle_intents::{ClientResult, DURATION_HEADER, IntentClient};
use trestle_surfaces::NotificationDuration;

/// Options for opening a qualified surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenOptions {
    /// Named parameters passed to the capability.
    pub params: Params,
}

impl OpenOptions {
    /// Add a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Options for showing a notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationOptions {
    /// Named parameters passed to the capability.
    pub params: Params,
    /// How long the notification stays open. Defaults to the capability's
    /// own duration.
    pub duration: Option<NotificationDuration>,
}

/// What a message box or notification shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceContent {
    /// Plain text, shown by the built-in text surface.
    Text(String),
    /// A capability addressed by qualifier.
    Component(Qualifier),
}

impl From<&str> for SurfaceContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for SurfaceContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Qualifier> for SurfaceContent {
    fn from(qualifier: Qualifier) -> Self {
        Self::Component(qualifier)
    }
}

/// Dialog, popup, message box and notification entry points.
#[derive(Debug, Clone)]
pub struct WorkbenchServices {
    client: IntentClient,
}

impl WorkbenchServices {
    /// Issue intents through `client`.
    #[must_use]
    pub fn new(client: IntentClient) -> Self {
        Self { client }
    }

    /// The underlying intent client.
    #[must_use]
    pub fn client(&self) -> &IntentClient {
        &self.client
    }

    /// Open a dialog and wait for its result.
    ///
    /// # Errors
    ///
    /// Returns the rejection if no single dialog capability matches or the
    /// dialog closes with an error.
    pub async fn open_dialog(
        &self,
        qualifier: Qualifier,
        options: OpenOptions,
    ) -> ClientResult<Option<Value>> {
        self.open(SurfaceKind::Dialog, qualifier, options.params).await
    }

    /// Open a popup and wait for its result.
    ///
    /// # Errors
    ///
    /// See [`WorkbenchServices::open_dialog`].
    pub async fn open_popup(
        &self,
        qualifier: Qualifier,
        options: OpenOptions,
    ) -> ClientResult<Option<Value>> {
        self.open(SurfaceKind::Popup, qualifier, options.params).await
    }

    /// Open a message box and wait for the user's action.
    ///
    /// # Errors
    ///
    /// See [`WorkbenchServices::open_dialog`].
    pub async fn open_message_box(
        &self,
        content: impl Into<SurfaceContent>,
        options: OpenOptions,
    ) -> ClientResult<Option<Value>> {
        let intent = surface_intent(SurfaceKind::MessageBox, content.into(), options.params);
        self.client.request(&intent).await
    }

    /// Show a notification and wait until it closes.
    ///
    /// # Errors
    ///
    /// See [`WorkbenchServices::open_dialog`].
    pub async fn show_notification(
        &self,
        content: impl Into<SurfaceContent>,
        options: NotificationOptions,
    ) -> ClientResult<()> {
        let intent = surface_intent(SurfaceKind::Notification, content.into(), options.params);
        let publish = match options.duration {
            Some(duration) => {
                PublishOptions::default().with_header(DURATION_HEADER, duration.to_value())
            },
            None => PublishOptions::default(),
        };
        self.client.request_with(&intent, publish).await.map(|_| ())
    }

    async fn open(
        &self,
        kind: SurfaceKind,
        qualifier: Qualifier,
        params: Params,
    ) -> ClientResult<Option<Value>> {
        let mut intent = Intent::for_surface(kind, qualifier);
        intent.params = params;
        self.client.request(&intent).await
    }
}

fn surface_intent(kind: SurfaceKind, content: SurfaceContent, params: Params) -> Intent {
    match content {
        SurfaceContent::Text(text) => {
            let mut intent = Intent::for_surface(kind, Qualifier::new());
            intent.params = params;
            intent.params.insert(MESSAGE_PARAM.to_owned(), Value::from(text));
            intent
        },
        SurfaceContent::Component(qualifier) => {
            let mut intent = Intent::for_surface(kind, qualifier);
            intent.params = params;
            intent
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trestle_core::AppSymbolicName;
    use trestle_events::{MessageBus, Replier};
    use trestle_intents::INTENT_TOPIC;

    #[test]
    fn test_text_content_targets_builtin_surface() {
        let intent = surface_intent(
            SurfaceKind::MessageBox,
            "Saved.".into(),
            Params::new(),
        );
        assert!(intent.qualifier.is_empty());
        assert_eq!(intent.params[MESSAGE_PARAM], Value::from("Saved."));
    }

    #[test]
    fn test_component_content_keeps_qualifier() {
        let qualifier = Qualifier::new().with("component", "confirm");
        let intent = surface_intent(
            SurfaceKind::MessageBox,
            qualifier.clone().into(),
            Params::new(),
        );
        assert_eq!(intent.qualifier, qualifier);
        assert!(intent.params.is_empty());
    }

    #[tokio::test]
    async fn test_notification_duration_travels_as_header() {
        let bus = MessageBus::new();
        let mut intents = bus.subscribe(INTENT_TOPIC).unwrap();
        let services =
            WorkbenchServices::new(IntentClient::new(bus.clone(), AppSymbolicName::new("host")));

        let responder = tokio::spawn({
            let bus = bus.clone();
            async move {
                let message = intents.recv().await.unwrap();
                assert_eq!(message.header(DURATION_HEADER), Some(&Value::from("short")));
                Replier::for_request(&bus, &message).unwrap().terminal(None);
            }
        });

        services
            .show_notification(
                "Copied",
                NotificationOptions {
                    duration: Some(NotificationDuration::Named(
                        trestle_surfaces::NamedDuration::Short,
                    )),
                    ..NotificationOptions::default()
                },
            )
            .await
            .unwrap();
        responder.await.unwrap();
    }
}
