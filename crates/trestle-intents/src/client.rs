//! Issuing intents.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use trestle_core::{AppSymbolicName, Intent};
use trestle_events::{MessageBus, PublishOptions, headers};

use crate::error::{ClientError, ClientResult};
use crate::message::INTENT_TOPIC;

/// Issues intents on behalf of one application.
#[derive(Debug, Clone)]
pub struct IntentClient {
    bus: MessageBus,
    app: AppSymbolicName,
    timeout: Option<Duration>,
}

impl IntentClient {
    /// Create a client for `app`.
    #[must_use]
    pub fn new(bus: MessageBus, app: AppSymbolicName) -> Self {
        Self {
            bus,
            app,
            timeout: None,
        }
    }

    /// Give up waiting for replies after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The issuing application.
    #[must_use]
    pub fn app(&self) -> &AppSymbolicName {
        &self.app
    }

    /// Issue an intent and wait for its result.
    ///
    /// For surface intents, resolves once the surface is closed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rejected`] if the intent cannot be resolved or
    /// the surface closes with an error, [`ClientError::Timeout`] if a
    /// timeout is configured and elapses.
    pub async fn request(&self, intent: &Intent) -> ClientResult<Option<Value>> {
        self.request_with(intent, PublishOptions::default()).await
    }

    /// Like [`request`](Self::request), with extra headers.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn request_with(
        &self,
        intent: &Intent,
        options: PublishOptions,
    ) -> ClientResult<Option<Value>> {
        let receiver = self.bus.request(
            INTENT_TOPIC,
            Some(self.body(intent)),
            options.with_header(headers::SENDER, self.app.as_str()),
        )?;
        debug!(app = %self.app, intent_type = %intent.intent_type, "Intent issued");

        match self.timeout {
            Some(timeout) => receiver
                .result_within(timeout)
                .await
                .map_err(ClientError::from),
            None => receiver.result().await.map_err(ClientError::from),
        }
    }

    /// Issue an intent without waiting for a reply.
    ///
    /// # Errors
    ///
    /// Returns a bus error if publishing fails.
    pub fn publish(&self, intent: &Intent) -> ClientResult<()> {
        self.bus.publish(
            INTENT_TOPIC,
            Some(self.body(intent)),
            PublishOptions::default().with_header(headers::SENDER, self.app.as_str()),
        )?;
        Ok(())
    }

    fn body(&self, intent: &Intent) -> Value {
        serde_json::to_value(intent).unwrap_or_default()
    }
}
