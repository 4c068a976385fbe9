//! Trestle Intents - Intent dispatch for the Trestle workbench.
//!
//! This crate provides:
//! - [`IntentInterceptor`] and [`Next`]: an ordered swallow-or-forward chain
//! - [`IntentBroker`]: resolves published intents and runs the chain; the
//!   chain ends by forwarding to the provider's inbox topic
//! - [`SurfaceIntentHandler`]: opens dialogs, popups, message boxes and
//!   notifications and replies when they close
//! - [`IntentClient`]: issues intents and awaits their result
//!
//! # Example
//!
//! ```rust,no_run
//! use trestle_core::{AppSymbolicName, Intent, Qualifier, SurfaceKind};
//! use trestle_events::MessageBus;
//! use trestle_intents::IntentClient;
//!
//! # async fn example(bus: MessageBus) {
//! let client = IntentClient::new(bus, AppSymbolicName::new("mail"));
//! let intent = Intent::for_surface(
//!     SurfaceKind::Dialog,
//!     Qualifier::new().with("component", "contact"),
//! );
//! let result = client.request(&intent).await;
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod broker;
mod client;
mod error;
mod handler;
mod interceptor;
mod message;

pub use broker::IntentBroker;
pub use client::IntentClient;
pub use error::{ClientError, ClientResult, IntentError, IntentResult};
pub use handler::{SurfaceIntentHandler, register_surface_handlers};
pub use interceptor::{IntentInterceptor, Next, Terminal};
pub use message::{DURATION_HEADER, INTENT_TOPIC, IntentMessage, inbox_topic};
