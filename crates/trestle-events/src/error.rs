//! Message bus error types.

use thiserror::Error;
use trestle_core::TransportTeardownError;

/// Errors raised by the message bus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// The bus has been disposed.
    #[error(transparent)]
    Disposed(#[from] TransportTeardownError),

    /// A topic or topic pattern is malformed.
    #[error("invalid topic '{topic}': {reason}")]
    InvalidTopic {
        /// The offending topic.
        topic: String,
        /// Why it is invalid.
        reason: String,
    },
}

impl BusError {
    /// Whether this error only signals that the bus is gone.
    #[must_use]
    pub fn is_teardown(&self) -> bool {
        matches!(self, Self::Disposed(_))
    }
}

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;

/// Errors observed by the requesting side of a request/reply exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    /// The replier answered with an error status.
    #[error("{0}")]
    Remote(String),

    /// The bus was disposed before a reply arrived.
    #[error("reply channel closed before a reply was received")]
    Closed,

    /// No reply arrived within the timeout.
    #[error("no reply received within {timeout_ms}ms")]
    Timeout {
        /// Timeout in milliseconds.
        timeout_ms: u64,
    },
}
