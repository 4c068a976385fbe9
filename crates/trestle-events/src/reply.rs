//! Request/reply correlation.
//!
//! The replying side holds a [`Replier`], which publishes at most one final
//! reply. Sending consumes the replier; dropping an unsent replier publishes
//! an error reply so the requester is never left waiting. Replies addressed
//! to a disposed bus are dropped silently.

use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::bus::{MessageBus, Subscription};
use crate::error::ReplyError;
use crate::message::{Message, PublishOptions, ReplyStatus, headers};

/// Error message published when a replier is dropped without answering.
const DROPPED_REPLY: &str = "request ended without a reply";

/// Single-fire sender of the final reply to a request.
#[derive(Debug)]
pub struct Replier {
    bus: MessageBus,
    reply_to: Option<String>,
}

impl Replier {
    /// Create a replier for the given reply topic.
    #[must_use]
    pub fn new(bus: MessageBus, reply_to: impl Into<String>) -> Self {
        Self {
            bus,
            reply_to: Some(reply_to.into()),
        }
    }

    /// Create a replier for a request message, if it expects a reply.
    #[must_use]
    pub fn for_request(bus: &MessageBus, request: &Message) -> Option<Self> {
        request
            .reply_to()
            .map(|reply_to| Self::new(bus.clone(), reply_to))
    }

    /// The reply topic.
    #[must_use]
    pub fn reply_to(&self) -> &str {
        self.reply_to.as_deref().unwrap_or_default()
    }

    /// Reply with a result.
    pub fn terminal(mut self, body: Option<Value>) {
        self.send(ReplyStatus::Terminal, body);
    }

    /// Reply with an error.
    pub fn error(mut self, error: impl std::fmt::Display) {
        self.send(ReplyStatus::Error, Some(Value::String(error.to_string())));
    }

    fn send(&mut self, status: ReplyStatus, body: Option<Value>) {
        let Some(reply_to) = self.reply_to.take() else {
            return;
        };
        let options = PublishOptions::default().with_header(headers::STATUS, status.code());
        match self.bus.publish(&reply_to, body, options) {
            Ok(_) => debug!(topic = %reply_to, ?status, "Reply sent"),
            Err(e) if e.is_teardown() => {
                debug!(topic = %reply_to, "Message bus disposed, reply dropped");
            },
            Err(e) => warn!(topic = %reply_to, error = %e, "Failed to send reply"),
        }
    }
}

impl Drop for Replier {
    fn drop(&mut self) {
        if self.reply_to.is_some() {
            self.send(
                ReplyStatus::Error,
                Some(Value::String(DROPPED_REPLY.to_string())),
            );
        }
    }
}

/// A reply received by the requesting side.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Reply status.
    pub status: ReplyStatus,
    /// Reply body.
    pub body: Option<Value>,
}

/// Receiver for the replies to one request.
#[derive(Debug)]
pub struct ReplyReceiver {
    reply_to: String,
    subscription: Subscription,
}

impl ReplyReceiver {
    pub(crate) fn new(reply_to: String, subscription: Subscription) -> Self {
        Self {
            reply_to,
            subscription,
        }
    }

    /// The reply topic to pass in the [`headers::REPLY_TO`] header.
    #[must_use]
    pub fn reply_to(&self) -> &str {
        &self.reply_to
    }

    /// Receive the next reply.
    ///
    /// Messages without a status header are treated as terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Closed`] if the bus is disposed first.
    pub async fn next(&mut self) -> Result<Reply, ReplyError> {
        let message = self.subscription.recv().await.ok_or(ReplyError::Closed)?;
        Ok(Reply {
            status: message.status().unwrap_or(ReplyStatus::Terminal),
            body: message.body,
        })
    }

    /// Wait for the final reply and convert it into a result.
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Remote`] for an error reply, or
    /// [`ReplyError::Closed`] if the bus is disposed first.
    pub async fn result(mut self) -> Result<Option<Value>, ReplyError> {
        loop {
            let reply = self.next().await?;
            match reply.status {
                ReplyStatus::Ok => {},
                ReplyStatus::Terminal => return Ok(reply.body),
                ReplyStatus::Error => {
                    let message = match reply.body {
                        Some(Value::String(s)) => s,
                        Some(other) => other.to_string(),
                        None => "unknown error".to_string(),
                    };
                    return Err(ReplyError::Remote(message));
                },
            }
        }
    }

    /// Like [`result`](Self::result), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Timeout`] if no final reply arrives in time.
    pub async fn result_within(self, timeout: Duration) -> Result<Option<Value>, ReplyError> {
        tokio::time::timeout(timeout, self.result())
            .await
            .map_err(|_| ReplyError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }
}
