//! Messages and publish options.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Well-known header names.
pub mod headers {
    /// Topic the receiver should reply to.
    pub const REPLY_TO: &str = "trestle.reply-to";
    /// Status code of a reply.
    pub const STATUS: &str = "trestle.status";
    /// Symbolic name of the publishing application.
    pub const SENDER: &str = "trestle.sender";
}

/// Status of a reply message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyStatus {
    /// Intermediate reply; more may follow.
    Ok,
    /// Final reply carrying the result.
    Terminal,
    /// Final reply carrying an error message.
    Error,
}

impl ReplyStatus {
    /// Numeric status code carried in the status header.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Terminal => 250,
            Self::Error => 500,
        }
    }

    /// Parse a numeric status code.
    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            200 => Some(Self::Ok),
            250 => Some(Self::Terminal),
            500 => Some(Self::Error),
            _ => None,
        }
    }

    /// Whether no further replies follow.
    #[must_use]
    pub fn is_final(self) -> bool {
        matches!(self, Self::Terminal | Self::Error)
    }
}

/// Options controlling how a message is published.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishOptions {
    /// Retain the message for late subscribers. An empty body clears the
    /// retained message on the topic.
    pub retain: bool,
    /// Message headers.
    pub headers: HashMap<String, Value>,
}

impl PublishOptions {
    /// Retained publish.
    #[must_use]
    pub fn retained() -> Self {
        Self {
            retain: true,
            headers: HashMap::new(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// A message delivered through the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Concrete topic the message was published to.
    pub topic: String,
    /// Message body. `None` for empty messages.
    #[serde(default)]
    pub body: Option<Value>,
    /// Message headers.
    #[serde(default)]
    pub headers: HashMap<String, Value>,
    /// Whether the message was delivered from the retained store.
    #[serde(default)]
    pub retained: bool,
    /// Values captured by `:param` segments of the subscription pattern.
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl Message {
    /// Create a message.
    #[must_use]
    pub fn new(topic: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            topic: topic.into(),
            body,
            headers: HashMap::new(),
            retained: false,
            params: HashMap::new(),
        }
    }

    /// Look up a header.
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&Value> {
        self.headers.get(key)
    }

    /// The topic a reply should be sent to, if the publisher expects one.
    #[must_use]
    pub fn reply_to(&self) -> Option<&str> {
        self.header(headers::REPLY_TO).and_then(Value::as_str)
    }

    /// The reply status, if this is a reply.
    #[must_use]
    pub fn status(&self) -> Option<ReplyStatus> {
        self.header(headers::STATUS)
            .and_then(Value::as_u64)
            .and_then(ReplyStatus::from_code)
    }

    /// The publishing application, if stamped.
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.header(headers::SENDER).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_roundtrip() {
        for status in [ReplyStatus::Ok, ReplyStatus::Terminal, ReplyStatus::Error] {
            assert_eq!(ReplyStatus::from_code(u64::from(status.code())), Some(status));
        }
        assert_eq!(ReplyStatus::from_code(404), None);
    }

    #[test]
    fn test_message_header_accessors() {
        let mut message = Message::new("a/b", None);
        message
            .headers
            .insert(headers::REPLY_TO.into(), Value::from("reply/1"));
        message.headers.insert(
            headers::STATUS.into(),
            Value::from(ReplyStatus::Terminal.code()),
        );

        assert_eq!(message.reply_to(), Some("reply/1"));
        assert_eq!(message.status(), Some(ReplyStatus::Terminal));
        assert_eq!(message.sender(), None);
    }
}
