//! Handles to open surfaces.
//!
//! A [`SurfaceHandle`] is shared between the container running the session
//! and the UI shell rendering it. Closing goes through a single path: the
//! first `close`/`close_with_error` wins and later calls are no-ops, so a
//! session produces exactly one outcome.

use serde_json::Value;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::oneshot;
use tracing::debug;
use trestle_core::{AppSymbolicName, Capability, Params, SurfaceKind};

use crate::error::{SurfaceError, SurfaceOutcome};
use crate::outlet::OutletId;
use crate::properties::SurfaceProperties;

struct HandleInner {
    instance_id: String,
    kind: SurfaceKind,
    outlet: OutletId,
    capability: Capability,
    params: Params,
    referrer: Option<AppSymbolicName>,
    properties: RwLock<SurfaceProperties>,
    closer: Mutex<Option<oneshot::Sender<SurfaceOutcome>>>,
}

/// Handle to an open surface.
#[derive(Clone)]
pub struct SurfaceHandle {
    inner: Arc<HandleInner>,
}

impl std::fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("instance_id", &self.inner.instance_id)
            .field("kind", &self.inner.kind)
            .field("outlet", &self.inner.outlet)
            .finish_non_exhaustive()
    }
}

impl SurfaceHandle {
    pub(crate) fn new(
        kind: SurfaceKind,
        capability: Capability,
        params: Params,
        referrer: Option<AppSymbolicName>,
        properties: SurfaceProperties,
    ) -> (Self, oneshot::Receiver<SurfaceOutcome>) {
        let (tx, rx) = oneshot::channel();
        let handle = Self {
            inner: Arc::new(HandleInner {
                instance_id: uuid::Uuid::new_v4().to_string(),
                kind,
                outlet: OutletId::allocate(kind),
                capability,
                params,
                referrer,
                properties: RwLock::new(properties),
                closer: Mutex::new(Some(tx)),
            }),
        };
        (handle, rx)
    }

    /// Unique id of this surface instance.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.inner.instance_id
    }

    /// Surface kind.
    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.inner.kind
    }

    /// The outlet owned by this surface.
    #[must_use]
    pub fn outlet(&self) -> &OutletId {
        &self.inner.outlet
    }

    /// The capability the surface was opened for.
    #[must_use]
    pub fn capability(&self) -> &Capability {
        &self.inner.capability
    }

    /// The params the surface was opened with.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.inner.params
    }

    /// The application that opened the surface, if known.
    #[must_use]
    pub fn referrer(&self) -> Option<&AppSymbolicName> {
        self.inner.referrer.as_ref()
    }

    /// Snapshot of the current properties.
    #[must_use]
    pub fn properties(&self) -> SurfaceProperties {
        self.inner
            .properties
            .read()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Replace the properties.
    pub fn set_properties(&self, properties: SurfaceProperties) {
        if let Ok(mut current) = self.inner.properties.write() {
            *current = properties;
        }
    }

    /// Change the title.
    pub fn set_title(&self, title: Option<String>) {
        if let Ok(mut properties) = self.inner.properties.write() {
            properties.title = title;
        }
    }

    /// Change the heading.
    pub fn set_heading(&self, heading: Option<String>) {
        if let Ok(mut properties) = self.inner.properties.write() {
            properties.heading = heading;
        }
    }

    /// Close the surface with a result.
    ///
    /// Returns `false` if the surface was already closed.
    pub fn close(&self, result: Option<Value>) -> bool {
        self.finish(Ok(result))
    }

    /// Close the surface with an error.
    ///
    /// Returns `false` if the surface was already closed.
    pub fn close_with_error(&self, message: impl Into<String>) -> bool {
        self.finish(Err(SurfaceError::ClosedWithError(message.into())))
    }

    /// Close the surface because the session failed.
    pub(crate) fn fail(&self, error: SurfaceError) -> bool {
        self.finish(Err(error))
    }

    /// Whether the surface has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner
            .closer
            .lock()
            .map(|closer| closer.is_none())
            .unwrap_or(true)
    }

    fn finish(&self, outcome: SurfaceOutcome) -> bool {
        let sender = match self.inner.closer.lock() {
            Ok(mut closer) => closer.take(),
            Err(_) => None,
        };
        let Some(sender) = sender else {
            debug!(instance = %self.inner.instance_id, "Surface already closed");
            return false;
        };
        // The receiver is gone when the session was dropped; nothing to deliver.
        let _ = sender.send(outcome);
        true
    }
}
