//! Prelude module - commonly used types for convenient import.
//!
//! Use `use trestle_surfaces::prelude::*;` to import all essential types.

// Sessions
pub use crate::{SurfaceHandle, SurfaceLauncher, SurfaceRequest, SurfaceRouter};

// Shell boundary
pub use crate::{OutletId, OutletTarget, WorkbenchShell};

// Routes
pub use crate::{HostRouteTable, RouteDescriptor, RouteGuard};

// Properties
pub use crate::{NotificationDuration, SurfaceProperties};

// Errors
pub use crate::{SurfaceError, SurfaceOutcome, SurfaceResult};
