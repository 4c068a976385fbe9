//! Capability registry error types.

use thiserror::Error;
use trestle_core::{DefinitionError, ResolutionError};

/// Errors raised by the capability registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// A capability failed validation.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// An intent could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The application is not registered.
    #[error("application not registered: {0}")]
    UnknownApplication(String),

    /// The application is already registered.
    #[error("application already registered: {0}")]
    DuplicateApplication(String),

    /// Registry storage failure (poisoned lock).
    #[error("registry storage error: {0}")]
    StorageError(String),
}

/// Result type for capability registry operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
