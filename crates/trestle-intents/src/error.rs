//! Intent error types.

use thiserror::Error;
use trestle_capabilities::CapabilityError;
use trestle_events::{BusError, ReplyError};

/// Errors raised while dispatching an intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    /// Resolving the intent failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Publishing failed.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The intent message is malformed.
    #[error("malformed intent message: {0}")]
    Malformed(String),
}

/// Result type for intent dispatch.
pub type IntentResult<T> = Result<T, IntentError>;

/// Errors seen by the application issuing an intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The intent was rejected or its surface closed with an error.
    #[error("{0}")]
    Rejected(String),

    /// No reply arrived in time.
    #[error("no reply within {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The message bus was disposed before a reply arrived.
    #[error("message bus disposed before a reply arrived")]
    Closed,

    /// Publishing the intent failed.
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl From<ReplyError> for ClientError {
    fn from(error: ReplyError) -> Self {
        match error {
            ReplyError::Remote(message) => Self::Rejected(message),
            ReplyError::Closed => Self::Closed,
            ReplyError::Timeout { timeout_ms } => Self::Timeout { timeout_ms },
        }
    }
}

/// Result type for intent clients.
pub type ClientResult<T> = Result<T, ClientError>;
