//! Topics addressing surface instances.
//!
//! Remote surfaces command their container over per-instance topics. The
//! container subscribes to them for its lifetime and releases any retained
//! message on them at teardown.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Topic a remote surface publishes to close itself.
#[must_use]
pub fn close_topic(instance_id: &str) -> String {
    format!("trestle/surfaces/{instance_id}/close")
}

/// Topic a remote surface publishes to change its title.
#[must_use]
pub fn title_topic(instance_id: &str) -> String {
    format!("trestle/surfaces/{instance_id}/title")
}

/// Topic a remote surface publishes to change its heading.
#[must_use]
pub fn heading_topic(instance_id: &str) -> String {
    format!("trestle/surfaces/{instance_id}/heading")
}

/// Topic of a context entry of an outlet.
#[must_use]
pub fn context_topic(outlet: &str, key: &str) -> String {
    format!("trestle/outlets/{outlet}/context/{key}")
}

/// Body of a close request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloseCommand {
    /// The result handed back to the opener.
    #[serde(default)]
    pub result: Option<Value>,
    /// Close with an error; `result` carries the error message.
    #[serde(default)]
    pub error: bool,
}

impl CloseCommand {
    /// Parse a close request body. An empty body closes without result.
    #[must_use]
    pub fn from_body(body: Option<&Value>) -> Self {
        body.and_then(|b| serde_json::from_value(b.clone()).ok())
            .unwrap_or_default()
    }
}
