//! Kernel error types.

use thiserror::Error;
use trestle_capabilities::CapabilityError;
use trestle_config::ConfigError;
use trestle_intents::IntentError;
use trestle_telemetry::TelemetryError;

use crate::startup::StartupPhase;

/// Errors raised while booting the workbench.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A startup initializer failed.
    #[error("initializer '{name}' failed: {message}")]
    Initializer {
        /// Initializer name.
        name: String,
        /// Failure description.
        message: String,
    },

    /// A startup phase did not complete in time.
    #[error("{phase} initializers did not complete within {timeout_ms}ms")]
    StartupTimeout {
        /// The phase that timed out.
        phase: StartupPhase,
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// A configuration entry could not be converted to a domain type.
    #[error("invalid configuration entry {field}: {message}")]
    InvalidEntry {
        /// Path of the offending entry.
        field: String,
        /// Failure description.
        message: String,
    },

    /// Configuration loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging setup failed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// Capability registration failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The intent broker could not start.
    #[error(transparent)]
    Intent(#[from] IntentError),
}

impl KernelError {
    /// Failure of a named initializer.
    #[must_use]
    pub fn initializer(name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Initializer {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;
