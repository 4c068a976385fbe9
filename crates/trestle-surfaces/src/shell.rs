//! Boundary to the host UI shell.

use async_trait::async_trait;
use trestle_core::NavigationError;

use crate::handle::SurfaceHandle;
use crate::outlet::{OutletId, OutletTarget};

/// The UI shell rendering workbench surfaces.
///
/// The shell owns rendering and routing. Containers tell it which surface
/// to show, where its outlet navigates to, and when to unload it. The
/// shell closes a surface through its [`SurfaceHandle`].
#[async_trait]
pub trait WorkbenchShell: Send + Sync {
    /// Show the container of a surface.
    async fn present(&self, handle: SurfaceHandle);

    /// Navigate an outlet.
    ///
    /// # Errors
    ///
    /// Returns a [`NavigationError`] if the navigation is rejected.
    async fn navigate(&self, outlet: &OutletId, target: &OutletTarget)
    -> Result<(), NavigationError>;

    /// Navigate an outlet to nothing, unloading its content, and remove the
    /// container.
    async fn clear(&self, outlet: &OutletId);
}
