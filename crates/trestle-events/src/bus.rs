//! Message bus for broadcasting topic-addressed messages.

use dashmap::DashMap;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};
use trestle_core::TransportTeardownError;

use crate::error::{BusError, BusResult};
use crate::message::{Message, PublishOptions, headers};
use crate::reply::ReplyReceiver;
use crate::topic::{TopicPattern, validate_topic};

/// Default backlog above which a slow subscription is reported.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Prefix of generated reply topics.
const REPLY_TOPIC_PREFIX: &str = "trestle/replies";

/// Delivery side of one subscription.
#[derive(Debug)]
struct Subscriber {
    pattern: TopicPattern,
    sender: mpsc::UnboundedSender<Message>,
    backlog: Arc<AtomicUsize>,
}

/// Topic-addressed publish/subscribe bus.
///
/// Every subscription owns an unbounded queue; publishing hands the message
/// to each subscription whose pattern matches the topic, so a slow
/// subscriber never loses messages. Clones share the same subscriptions,
/// retained store and disposal state. Once [`dispose`](Self::dispose) is
/// called, publishing fails with [`BusError::Disposed`] and subscriptions
/// end.
#[derive(Debug, Clone)]
pub struct MessageBus {
    /// Live subscriptions by id.
    subscribers: Arc<DashMap<u64, Subscriber>>,
    /// Source of subscription ids.
    next_id: Arc<AtomicU64>,
    /// Last retained message per topic.
    retained: Arc<DashMap<String, Arc<Message>>>,
    /// Disposal signal.
    disposed: Arc<watch::Sender<bool>>,
    /// Backlog above which a subscription is reported as lagging.
    capacity: usize,
}

impl MessageBus {
    /// Create a new message bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new message bus reporting subscriptions whose backlog
    /// reaches `capacity`. Messages are never dropped.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (disposed, _) = watch::channel(false);
        Self {
            subscribers: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(0)),
            retained: Arc::new(DashMap::new()),
            disposed: Arc::new(disposed),
            capacity: capacity.max(1),
        }
    }

    /// Publish a message.
    ///
    /// Returns the number of subscriptions the message was handed to.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Disposed`] once the bus is disposed, or
    /// [`BusError::InvalidTopic`] if the topic contains wildcards.
    pub fn publish(
        &self,
        topic: &str,
        body: Option<Value>,
        options: PublishOptions,
    ) -> BusResult<usize> {
        if self.is_disposed() {
            return Err(TransportTeardownError {
                topic: topic.to_string(),
            }
            .into());
        }
        validate_topic(topic)?;

        let message = Message {
            topic: topic.to_string(),
            body,
            headers: options.headers,
            retained: false,
            params: std::collections::HashMap::new(),
        };

        if options.retain {
            if message.body.is_some() {
                self.retained
                    .insert(topic.to_string(), Arc::new(message.clone()));
            } else if self.retained.remove(topic).is_some() {
                debug!(topic, "Retained message cleared");
            }
        }

        trace!(topic, "Publishing message");
        let mut delivered = 0usize;
        let mut closed = Vec::new();
        for entry in self.subscribers.iter() {
            let subscriber = entry.value();
            let Some(params) = subscriber.pattern.matches(topic) else {
                continue;
            };
            let mut copy = message.clone();
            copy.params = params;
            if subscriber.sender.send(copy).is_err() {
                closed.push(*entry.key());
                continue;
            }
            delivered = delivered.saturating_add(1);
            let backlog = subscriber.backlog.fetch_add(1, Ordering::Relaxed);
            if backlog == self.capacity {
                warn!(
                    pattern = subscriber.pattern.as_str(),
                    backlog,
                    "Subscription is falling behind"
                );
            }
        }
        for id in closed {
            self.subscribers.remove(&id);
        }
        if delivered == 0 {
            trace!(topic, "No subscribers for message");
        }
        Ok(delivered)
    }

    /// Subscribe to messages whose topic matches `pattern`.
    ///
    /// Retained messages on matching topics are delivered first.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Disposed`] once the bus is disposed, or
    /// [`BusError::InvalidTopic`] if the pattern is malformed.
    pub fn subscribe(&self, pattern: &str) -> BusResult<Subscription> {
        if self.is_disposed() {
            return Err(TransportTeardownError {
                topic: pattern.to_string(),
            }
            .into());
        }
        let pattern = TopicPattern::parse(pattern)?;

        // Register before snapshotting so nothing published in between is lost.
        let (sender, receiver) = mpsc::unbounded_channel();
        let backlog = Arc::new(AtomicUsize::new(0));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(
            id,
            Subscriber {
                pattern: pattern.clone(),
                sender,
                backlog: Arc::clone(&backlog),
            },
        );
        let pending = self
            .retained
            .iter()
            .filter_map(|entry| {
                let params = pattern.matches(entry.key())?;
                let mut message = Message::clone(entry.value());
                message.retained = true;
                message.params = params;
                Some(message)
            })
            .collect();

        debug!(pattern = pattern.as_str(), "Subscription created");
        Ok(Subscription {
            id,
            pattern,
            receiver,
            backlog,
            pending,
            subscribers: Arc::clone(&self.subscribers),
            disposed: self.disposed.subscribe(),
        })
    }

    /// Publish a request and return a receiver for its replies.
    ///
    /// A unique reply topic is generated and passed in the
    /// [`headers::REPLY_TO`] header.
    ///
    /// # Errors
    ///
    /// Returns [`BusError`] if subscribing to the reply topic or publishing fails.
    pub fn request(
        &self,
        topic: &str,
        body: Option<Value>,
        options: PublishOptions,
    ) -> BusResult<ReplyReceiver> {
        let reply_to = format!("{REPLY_TOPIC_PREFIX}/{}", uuid::Uuid::new_v4());
        let subscription = self.subscribe(&reply_to)?;
        self.publish(
            topic,
            body,
            options.with_header(headers::REPLY_TO, reply_to.clone()),
        )?;
        Ok(ReplyReceiver::new(reply_to, subscription))
    }

    /// Create a reply receiver for a caller-chosen reply topic.
    ///
    /// # Errors
    ///
    /// Returns [`BusError`] if the subscription cannot be created.
    pub fn reply_receiver(&self) -> BusResult<ReplyReceiver> {
        let reply_to = format!("{REPLY_TOPIC_PREFIX}/{}", uuid::Uuid::new_v4());
        let subscription = self.subscribe(&reply_to)?;
        Ok(ReplyReceiver::new(reply_to, subscription))
    }

    /// Look up the retained message of a topic.
    #[must_use]
    pub fn retained(&self, topic: &str) -> Option<Arc<Message>> {
        self.retained.get(topic).map(|entry| Arc::clone(entry.value()))
    }

    /// Dispose the bus. Further publishing fails and subscriptions end.
    pub fn dispose(&self) {
        if !self.disposed.send_replace(true) {
            warn!(retained = self.retained.len(), "Message bus disposed");
            self.retained.clear();
            self.subscribers.clear();
        }
    }

    /// Whether the bus has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        *self.disposed.borrow()
    }

    /// Current number of subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Backlog above which a subscription is reported as lagging.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream of messages matching a topic pattern.
///
/// Dropping the subscription unregisters it from the bus.
pub struct Subscription {
    id: u64,
    pattern: TopicPattern,
    receiver: mpsc::UnboundedReceiver<Message>,
    backlog: Arc<AtomicUsize>,
    pending: VecDeque<Message>,
    subscribers: Arc<DashMap<u64, Subscriber>>,
    disposed: watch::Receiver<bool>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("pattern", &self.pattern.as_str())
            .field("pending", &self.pending.len())
            .field("backlog", &self.backlog.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// The subscribed pattern.
    #[must_use]
    pub fn pattern(&self) -> &TopicPattern {
        &self.pattern
    }

    fn taken(&self, message: Message) -> Message {
        let _ = self
            .backlog
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(1))
            });
        message
    }

    /// Receive the next matching message.
    ///
    /// Returns `None` once the bus is disposed.
    pub async fn recv(&mut self) -> Option<Message> {
        if let Some(message) = self.pending.pop_front() {
            return Some(message);
        }
        if *self.disposed.borrow() {
            return None;
        }
        let received = tokio::select! {
            received = self.receiver.recv() => received,
            _ = self.disposed.wait_for(|disposed| *disposed) => return None,
        };
        received.map(|message| self.taken(message))
    }

    /// Receive the next matching message without waiting.
    pub fn try_recv(&mut self) -> Option<Message> {
        if let Some(message) = self.pending.pop_front() {
            return Some(message);
        }
        let message = self.receiver.try_recv().ok()?;
        Some(self.taken(message))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.subscribers.remove(&self.id);
    }
}
