//! Mock implementations for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use trestle_core::NavigationError;
use trestle_surfaces::{OutletId, OutletTarget, SurfaceHandle, WorkbenchShell};

/// How long the `wait_for_*` helpers wait before giving up.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Mock implementation of [`WorkbenchShell`] for testing.
///
/// Records every presented surface, navigation and clear. Navigation can be
/// scripted to fail for chosen targets. Clones share the same recordings.
#[derive(Debug, Clone, Default)]
pub struct MockShell {
    /// Handles of presented surfaces.
    presented: Arc<Mutex<Vec<SurfaceHandle>>>,
    /// Navigations in call order.
    navigations: Arc<Mutex<Vec<(OutletId, OutletTarget)>>>,
    /// Cleared outlets in call order.
    cleared: Arc<Mutex<Vec<OutletId>>>,
    /// Targets whose navigation is rejected: remote URL suffixes or host
    /// route components.
    rejected: Arc<Mutex<Vec<String>>>,
    /// Reject every navigation.
    reject_all: bool,
    /// Woken on every recorded call.
    changed: Arc<Notify>,
}

impl MockShell {
    /// Create a new mock shell that accepts every navigation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject navigation to remote URLs ending in `target`, or to host routes
    /// rendering the component `target`.
    #[must_use]
    pub fn rejecting(self, target: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.rejected.lock() {
            guard.push(target.into());
        }
        self
    }

    /// Reject every navigation.
    #[must_use]
    pub fn rejecting_all(mut self) -> Self {
        self.reject_all = true;
        self
    }

    /// Handles of presented surfaces, oldest first.
    #[must_use]
    pub fn presented(&self) -> Vec<SurfaceHandle> {
        self.presented.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// The most recently presented surface.
    #[must_use]
    pub fn last_presented(&self) -> Option<SurfaceHandle> {
        self.presented.lock().ok().and_then(|g| g.last().cloned())
    }

    /// Recorded navigations.
    #[must_use]
    pub fn navigations(&self) -> Vec<(OutletId, OutletTarget)> {
        self.navigations.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Recorded clears.
    #[must_use]
    pub fn cleared(&self) -> Vec<OutletId> {
        self.cleared.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Wait until at least `count` surfaces were presented, or
    /// [`WAIT_TIMEOUT`] elapsed. Returns the presented handles.
    pub async fn wait_for_presented(&self, count: usize) -> Vec<SurfaceHandle> {
        self.wait_until(|shell| shell.presented().len() >= count).await;
        self.presented()
    }

    /// Wait until at least `count` outlets were cleared, or
    /// [`WAIT_TIMEOUT`] elapsed. Returns the cleared outlets.
    pub async fn wait_for_cleared(&self, count: usize) -> Vec<OutletId> {
        self.wait_until(|shell| shell.cleared().len() >= count).await;
        self.cleared()
    }

    async fn wait_until(&self, done: impl Fn(&Self) -> bool) {
        let wait = async {
            loop {
                let changed = self.changed.notified();
                if done(self) {
                    return;
                }
                changed.await;
            }
        };
        let _ = tokio::time::timeout(WAIT_TIMEOUT, wait).await;
    }

    fn is_rejected(&self, target: &OutletTarget) -> bool {
        if self.reject_all {
            return true;
        }
        let Ok(rejected) = self.rejected.lock() else {
            return false;
        };
        rejected.iter().any(|r| match target {
            OutletTarget::Remote { url, .. } => url.ends_with(r.as_str()),
            OutletTarget::Host { route } => route.component == *r,
        })
    }
}

#[async_trait]
impl WorkbenchShell for MockShell {
    async fn present(&self, handle: SurfaceHandle) {
        if let Ok(mut guard) = self.presented.lock() {
            guard.push(handle);
        }
        self.changed.notify_waiters();
    }

    async fn navigate(
        &self,
        outlet: &OutletId,
        target: &OutletTarget,
    ) -> Result<(), NavigationError> {
        if let Ok(mut guard) = self.navigations.lock() {
            guard.push((outlet.clone(), target.clone()));
        }
        self.changed.notify_waiters();
        if self.is_rejected(target) {
            return Err(NavigationError::GuardRejected {
                outlet: outlet.to_string(),
                target: describe(target),
            });
        }
        Ok(())
    }

    async fn clear(&self, outlet: &OutletId) {
        if let Ok(mut guard) = self.cleared.lock() {
            guard.push(outlet.clone());
        }
        self.changed.notify_waiters();
    }
}

fn describe(target: &OutletTarget) -> String {
    match target {
        OutletTarget::Remote { url, .. } => url.clone(),
        OutletTarget::Host { route } => route.component.clone(),
    }
}
