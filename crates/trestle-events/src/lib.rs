//! Trestle Events - Message bus for the Trestle workbench.
//!
//! This crate provides:
//! - Topic-addressed publish/subscribe with `:param` and trailing `*` patterns
//! - Retained messages delivered to late subscribers
//! - Request/reply correlation through a `reply-to` header and status codes
//! - A single-fire [`Replier`] that answers a request at most once
//!
//! # Example
//!
//! ```rust
//! use trestle_events::{MessageBus, PublishOptions};
//!
//! # async fn example() {
//! let bus = MessageBus::new();
//! let mut subscription = bus.subscribe("workbench/dialogs/:id/close").unwrap();
//!
//! bus.publish("workbench/dialogs/42/close", None, PublishOptions::default())
//!     .unwrap();
//!
//! let message = subscription.recv().await.unwrap();
//! assert_eq!(message.params.get("id").map(String::as_str), Some("42"));
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod error;
mod message;
mod reply;
mod topic;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, MessageBus, Subscription};
pub use error::{BusError, BusResult, ReplyError};
pub use message::{Message, PublishOptions, ReplyStatus, headers};
pub use reply::{Replier, Reply, ReplyReceiver};
pub use topic::TopicPattern;
