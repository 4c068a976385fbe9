//! Prelude module - commonly used types for convenient import.
//!
//! Use `use trestle_intents::prelude::*;` to import all essential types.

// Dispatch
pub use crate::{IntentBroker, IntentInterceptor, IntentMessage, Next, SurfaceIntentHandler};

// Client
pub use crate::IntentClient;

// Errors
pub use crate::{ClientError, ClientResult, IntentError, IntentResult};
