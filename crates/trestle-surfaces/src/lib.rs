//! Trestle Surfaces - Surface sessions for the Trestle workbench.
//!
//! This crate provides:
//! - [`SurfaceLauncher`]: opens a container for a resolved capability and
//!   runs its session until it closes
//! - [`SurfaceHandle`]: the single close path of a session, shared with the UI
//! - [`WorkbenchShell`]: the boundary to the UI shell rendering surfaces
//! - [`HostRouteTable`]: the host's routes, looked up by capability guard
//! - [`SurfaceRouter`]: direct routing of views and parts
//!
//! # Session lifecycle
//!
//! ```text
//! open ──► target (remote URL | host route) ──► properties + context
//!      ──► present ──► navigate ──► wait: close | command | timer
//!      ──► teardown: clear outlet, release retained messages
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod context;
pub mod topics;

mod error;
mod handle;
mod launcher;
mod outlet;
mod properties;
mod router;
mod routes;
mod shell;

pub use error::{SurfaceError, SurfaceOutcome, SurfaceResult};
pub use handle::SurfaceHandle;
pub use launcher::{SurfaceLauncher, SurfaceRequest};
pub use outlet::{OutletId, OutletTarget, microfrontend_url};
pub use properties::{
    DurationDefaults, NamedDuration, NotificationDuration, SurfaceProperties, SurfaceSize,
};
pub use router::SurfaceRouter;
pub use routes::{HostRouteTable, RouteDescriptor, RouteGuard};
pub use shell::WorkbenchShell;
