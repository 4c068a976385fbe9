//! Prelude module - commonly used types for convenient import.
//!
//! Use `use trestle_events::prelude::*;` to import all essential types.

// Bus
pub use crate::{DEFAULT_CHANNEL_CAPACITY, MessageBus, Subscription};

// Messages
pub use crate::{Message, PublishOptions, ReplyStatus, TopicPattern, headers};

// Request/reply
pub use crate::{Replier, Reply, ReplyReceiver};

// Errors
pub use crate::{BusError, BusResult, ReplyError};
