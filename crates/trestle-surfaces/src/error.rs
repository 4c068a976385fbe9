//! Surface error types.

use thiserror::Error;
use trestle_capabilities::CapabilityError;
use trestle_core::NavigationError;
use trestle_events::BusError;

/// Errors ending a surface session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// Embedding the surface into its outlet failed.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Resolving the capability or its application failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The message bus rejected a command subscription.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The surface was closed with an error result.
    #[error("{0}")]
    ClosedWithError(String),

    /// The capability does not describe a workbench surface.
    #[error("capability of type '{0}' is not a workbench surface")]
    NotASurface(String),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Outcome of a surface session: the close result, or why it failed.
pub type SurfaceOutcome = SurfaceResult<Option<serde_json::Value>>;
