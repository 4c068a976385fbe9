//! Direct routing of views and parts.
//!
//! Views and parts have no intent handler. The router resolves their
//! capability from the registry on behalf of the requesting application
//! and opens a container for it.

use tokio::task::JoinHandle;
use tracing::debug;
use trestle_core::{AppSymbolicName, Intent, Params, Qualifier, SurfaceKind};

use crate::error::{SurfaceOutcome, SurfaceResult};
use crate::launcher::{SurfaceLauncher, SurfaceRequest};

/// Opens views and parts.
#[derive(Debug, Clone)]
pub struct SurfaceRouter {
    launcher: SurfaceLauncher,
}

impl SurfaceRouter {
    /// Create a router.
    #[must_use]
    pub fn new(launcher: SurfaceLauncher) -> Self {
        Self { launcher }
    }

    /// Open the view matching `qualifier`.
    ///
    /// Returns the running session; it completes when the view is closed.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if no single view capability is visible to
    /// the requester.
    pub fn open_view(
        &self,
        qualifier: Qualifier,
        params: Params,
        requester: &AppSymbolicName,
    ) -> SurfaceResult<JoinHandle<SurfaceOutcome>> {
        self.open(SurfaceKind::View, qualifier, params, requester)
    }

    /// Open the part matching `qualifier`.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if no single part capability is visible to
    /// the requester.
    pub fn open_part(
        &self,
        qualifier: Qualifier,
        params: Params,
        requester: &AppSymbolicName,
    ) -> SurfaceResult<JoinHandle<SurfaceOutcome>> {
        self.open(SurfaceKind::Part, qualifier, params, requester)
    }

    fn open(
        &self,
        kind: SurfaceKind,
        qualifier: Qualifier,
        params: Params,
        requester: &AppSymbolicName,
    ) -> SurfaceResult<JoinHandle<SurfaceOutcome>> {
        let mut intent = Intent::for_surface(kind, qualifier);
        intent.params = params;
        let capability = self.launcher.registry().resolve_one(&intent, requester)?;
        debug!(
            kind = %kind,
            capability_id = capability.id(),
            requester = %requester,
            "Routing surface"
        );

        let request = SurfaceRequest::new(capability)
            .with_params(intent.params)
            .with_referrer(requester.clone());
        let launcher = self.launcher.clone();
        Ok(tokio::spawn(async move { launcher.open(request).await }))
    }
}
