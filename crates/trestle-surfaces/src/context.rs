//! Context of embedded surfaces.
//!
//! Before a surface is navigated, its container writes why the surface was
//! opened into the outlet's context: the capability, the params and the
//! opening application. Entries are retained messages, so the embedded
//! content reads them on subscription without a round trip. Teardown
//! publishes empty retained messages to release them.

use serde_json::Value;
use tracing::debug;
use trestle_events::{BusResult, MessageBus, PublishOptions};

use crate::topics::context_topic;

/// Context key of the capability.
pub const CAPABILITY_KEY: &str = "capability";
/// Context key of the params.
pub const PARAMS_KEY: &str = "params";
/// Context key of the opening application.
pub const REFERRER_KEY: &str = "referrer";

/// Outlet context backed by retained bus messages.
#[derive(Debug, Clone)]
pub struct ContextStore {
    bus: MessageBus,
}

impl ContextStore {
    /// Create a store on the given bus.
    #[must_use]
    pub fn new(bus: MessageBus) -> Self {
        Self { bus }
    }

    /// Set a context entry.
    ///
    /// # Errors
    ///
    /// Returns a bus error if publishing fails.
    pub fn set(&self, outlet: &str, key: &str, value: Value) -> BusResult<()> {
        self.bus
            .publish(&context_topic(outlet, key), Some(value), PublishOptions::retained())?;
        Ok(())
    }

    /// Read a context entry.
    #[must_use]
    pub fn get(&self, outlet: &str, key: &str) -> Option<Value> {
        self.bus
            .retained(&context_topic(outlet, key))
            .and_then(|message| message.body.clone())
    }

    /// Remove context entries of an outlet.
    ///
    /// A disposed bus has already dropped its retained messages.
    pub fn clear(&self, outlet: &str, keys: &[&str]) {
        for key in keys {
            let topic = context_topic(outlet, key);
            if let Err(e) = self.bus.publish(&topic, None, PublishOptions::retained()) {
                debug!(%topic, error = %e, "Context entry not released");
            }
        }
    }
}
