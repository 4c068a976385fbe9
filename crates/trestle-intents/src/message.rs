//! Intent messages and topics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use trestle_core::{AppSymbolicName, Capability, Intent};
use trestle_events::headers;

/// Topic applications publish intents to.
pub const INTENT_TOPIC: &str = "trestle/intents";

/// Header carrying a notification duration chosen by the opener.
pub const DURATION_HEADER: &str = "trestle.notification-duration";

/// Inbox topic of an application, receiving intents for its capabilities.
#[must_use]
pub fn inbox_topic(app: &AppSymbolicName) -> String {
    format!("{INTENT_TOPIC}/{app}")
}

/// An intent together with the capability it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMessage {
    /// The intent.
    pub intent: Intent,
    /// The resolved capability.
    pub capability: Capability,
    /// Headers of the inbound message.
    #[serde(default)]
    pub headers: HashMap<String, Value>,
}

impl IntentMessage {
    /// Create an intent message without headers.
    #[must_use]
    pub fn new(intent: Intent, capability: Capability) -> Self {
        Self {
            intent,
            capability,
            headers: HashMap::new(),
        }
    }

    /// The issuing application.
    #[must_use]
    pub fn sender(&self) -> Option<AppSymbolicName> {
        self.headers
            .get(headers::SENDER)
            .and_then(Value::as_str)
            .map(AppSymbolicName::new)
    }

    /// The topic the issuer expects the reply on.
    #[must_use]
    pub fn reply_to(&self) -> Option<&str> {
        self.headers.get(headers::REPLY_TO).and_then(Value::as_str)
    }

    /// Look up a header.
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&Value> {
        self.headers.get(key)
    }
}
