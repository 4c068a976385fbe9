//! Surface sessions.
//!
//! [`SurfaceLauncher::open`] runs the whole life of one surface session:
//!
//! 1. Resolve the outlet target. Remote capabilities load the providing
//!    application's microfrontend at its base URL plus the capability path
//!    (params substituted). Host capabilities navigate to the host route
//!    guarded for the capability.
//! 2. Propagate properties onto the handle and write the outlet context.
//! 3. Subscribe to the instance's command topics (remote only), present the
//!    container and navigate its outlet. A failed navigation closes the
//!    surface with an error.
//! 4. Wait for the single close, a close command, or the notification timer.
//! 5. Tear down: clear the outlet and release retained messages.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, info, info_span, warn};
use trestle_capabilities::{CapabilityError, CapabilityRegistry};
use trestle_core::{AppSymbolicName, Capability, Params, SurfaceKind, substitute};
use trestle_events::{Message, MessageBus, PublishOptions, Subscription};

use crate::context::{CAPABILITY_KEY, ContextStore, PARAMS_KEY, REFERRER_KEY};
use crate::error::{SurfaceError, SurfaceOutcome, SurfaceResult};
use crate::handle::SurfaceHandle;
use crate::outlet::{OutletTarget, microfrontend_url};
use crate::properties::{DurationDefaults, NotificationDuration, SurfaceProperties};
use crate::routes::HostRouteTable;
use crate::shell::WorkbenchShell;
use crate::topics::{CloseCommand, close_topic, heading_topic, title_topic};

/// A request to open a surface for a resolved capability.
#[derive(Debug, Clone)]
pub struct SurfaceRequest {
    /// The resolved capability.
    pub capability: Capability,
    /// Params of the intent.
    pub params: Params,
    /// The application opening the surface.
    pub referrer: Option<AppSymbolicName>,
    /// Notification duration chosen by the opener.
    pub duration: Option<NotificationDuration>,
}

impl SurfaceRequest {
    /// Request to open a capability without params.
    #[must_use]
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            params: Params::new(),
            referrer: None,
            duration: None,
        }
    }

    /// Set the params.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Set the opening application.
    #[must_use]
    pub fn with_referrer(mut self, referrer: AppSymbolicName) -> Self {
        self.referrer = Some(referrer);
        self
    }

    /// Set the notification duration.
    #[must_use]
    pub fn with_duration(mut self, duration: NotificationDuration) -> Self {
        self.duration = Some(duration);
        self
    }
}

enum SessionEvent {
    Closed(SurfaceOutcome),
    Expired,
    Command(Option<Message>),
}

/// Opens surfaces and runs their sessions.
#[derive(Clone)]
pub struct SurfaceLauncher {
    bus: MessageBus,
    shell: Arc<dyn WorkbenchShell>,
    registry: Arc<CapabilityRegistry>,
    routes: Arc<HostRouteTable>,
    context: ContextStore,
    durations: DurationDefaults,
}

impl std::fmt::Debug for SurfaceLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceLauncher")
            .field("durations", &self.durations)
            .finish_non_exhaustive()
    }
}

impl SurfaceLauncher {
    /// Create a launcher.
    #[must_use]
    pub fn new(
        bus: MessageBus,
        shell: Arc<dyn WorkbenchShell>,
        registry: Arc<CapabilityRegistry>,
        routes: Arc<HostRouteTable>,
    ) -> Self {
        Self {
            context: ContextStore::new(bus.clone()),
            bus,
            shell,
            registry,
            routes,
            durations: DurationDefaults::default(),
        }
    }

    /// Set the lengths of named notification durations.
    #[must_use]
    pub fn with_durations(mut self, durations: DurationDefaults) -> Self {
        self.durations = durations;
        self
    }

    /// The capability registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }

    /// The host route table.
    #[must_use]
    pub fn routes(&self) -> &Arc<HostRouteTable> {
        &self.routes
    }

    /// The outlet context store.
    #[must_use]
    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    /// Open a surface and wait until it is closed.
    ///
    /// Resolves to the close result.
    ///
    /// # Errors
    ///
    /// Returns the error the surface was closed with, or why it could not
    /// be opened. The container is torn down in every case.
    pub async fn open(&self, request: SurfaceRequest) -> SurfaceOutcome {
        let kind = request
            .capability
            .surface()
            .ok_or_else(|| SurfaceError::NotASurface(request.capability.capability_type.clone()))?;

        let span = info_span!(
            "surface",
            kind = %kind,
            app = %request.capability.app(),
            capability_id = request.capability.id(),
        );
        self.run_session(kind, request).instrument(span).await
    }

    async fn run_session(&self, kind: SurfaceKind, request: SurfaceRequest) -> SurfaceOutcome {
        let SurfaceRequest {
            capability,
            params,
            referrer,
            duration,
        } = request;

        let target = self.target(kind, &capability, &params);
        let mut properties = SurfaceProperties::from_map(capability.properties.as_ref(), &params);
        if let Ok(OutletTarget::Host { route }) = &target {
            properties.apply(&route.data, &params);
        }
        if duration.is_some() {
            properties.duration = duration;
        }
        let timeout = (kind == SurfaceKind::Notification)
            .then(|| properties.duration.unwrap_or_default().resolve(&self.durations))
            .flatten();

        let (handle, closed) = SurfaceHandle::new(kind, capability, params, referrer, properties);
        info!(outlet = %handle.outlet(), instance = handle.instance_id(), "Opening surface");

        let remote = target.as_ref().is_ok_and(OutletTarget::is_remote);
        let commands = match self.prepare(&handle, remote) {
            Ok(commands) => commands,
            Err(e) => {
                handle.fail(e);
                None
            },
        };

        self.shell.present(handle.clone()).await;
        if !handle.is_closed() {
            let navigated = match target {
                Ok(target) => self
                    .shell
                    .navigate(handle.outlet(), &target)
                    .await
                    .map_err(SurfaceError::from),
                Err(e) => Err(e),
            };
            if let Err(e) = navigated {
                warn!(outlet = %handle.outlet(), error = %e, "Surface navigation failed");
                handle.fail(e);
            }
        }

        let outcome = self.wait_for_close(&handle, closed, commands, timeout).await;
        self.teardown(&handle).await;
        outcome
    }

    fn target(
        &self,
        kind: SurfaceKind,
        capability: &Capability,
        params: &Params,
    ) -> SurfaceResult<OutletTarget> {
        if capability.app() == self.registry.host_app() {
            let route = self.routes.find(kind, &capability.qualifier)?;
            return Ok(OutletTarget::Host { route });
        }
        let application = self
            .registry
            .application(capability.app())
            .ok_or_else(|| CapabilityError::UnknownApplication(capability.app().to_string()))?;
        let path = substitute(capability.path().unwrap_or_default(), params);
        Ok(OutletTarget::Remote {
            app: application.symbolic_name,
            url: microfrontend_url(&application.base_url, &path),
        })
    }

    /// Write the outlet context and subscribe to the command topics.
    fn prepare(&self, handle: &SurfaceHandle, remote: bool) -> SurfaceResult<Option<Subscription>> {
        let outlet = handle.outlet().as_str();
        self.context.set(
            outlet,
            CAPABILITY_KEY,
            serde_json::to_value(handle.capability()).unwrap_or_default(),
        )?;
        self.context.set(
            outlet,
            PARAMS_KEY,
            Value::Object(handle.params().clone().into_iter().collect()),
        )?;
        if let Some(referrer) = handle.referrer() {
            self.context
                .set(outlet, REFERRER_KEY, Value::String(referrer.to_string()))?;
        }

        if !remote {
            return Ok(None);
        }
        let pattern = format!("trestle/surfaces/{}/:command", handle.instance_id());
        Ok(Some(self.bus.subscribe(&pattern)?))
    }

    async fn wait_for_close(
        &self,
        handle: &SurfaceHandle,
        mut closed: oneshot::Receiver<SurfaceOutcome>,
        mut commands: Option<Subscription>,
        timeout: Option<std::time::Duration>,
    ) -> SurfaceOutcome {
        let sleep = async {
            match timeout {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(sleep);
        let mut expired = false;

        loop {
            let event = tokio::select! {
                outcome = &mut closed => SessionEvent::Closed(outcome.unwrap_or(Ok(None))),
                () = &mut sleep, if !expired => SessionEvent::Expired,
                message = next_command(commands.as_mut()) => SessionEvent::Command(message),
            };
            match event {
                SessionEvent::Closed(outcome) => return outcome,
                SessionEvent::Expired => {
                    expired = true;
                    debug!(instance = handle.instance_id(), "Notification duration elapsed");
                    handle.close(None);
                },
                SessionEvent::Command(Some(message)) => apply_command(handle, &message),
                SessionEvent::Command(None) => {
                    debug!(instance = handle.instance_id(), "Command topics closed");
                    commands = None;
                },
            }
        }
    }

    async fn teardown(&self, handle: &SurfaceHandle) {
        let outlet = handle.outlet();
        self.shell.clear(outlet).await;
        self.context
            .clear(outlet.as_str(), &[CAPABILITY_KEY, PARAMS_KEY, REFERRER_KEY]);
        for topic in [
            close_topic(handle.instance_id()),
            title_topic(handle.instance_id()),
            heading_topic(handle.instance_id()),
        ] {
            if let Err(e) = self.bus.publish(&topic, None, PublishOptions::retained()) {
                debug!(%topic, error = %e, "Retained command not released");
            }
        }
        info!(%outlet, "Surface closed");
    }
}

async fn next_command(commands: Option<&mut Subscription>) -> Option<Message> {
    match commands {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

fn apply_command(handle: &SurfaceHandle, message: &Message) {
    let text = || message.body.as_ref().and_then(Value::as_str).map(String::from);
    match message.params.get("command").map(String::as_str) {
        Some("close") => {
            let command = CloseCommand::from_body(message.body.as_ref());
            if command.error {
                let reason = match command.result {
                    Some(Value::String(s)) => s,
                    Some(other) => other.to_string(),
                    None => "surface closed with an error".to_string(),
                };
                handle.close_with_error(reason);
            } else {
                handle.close(command.result);
            }
        },
        Some("title") => handle.set_title(text()),
        Some("heading") => handle.set_heading(text()),
        other => debug!(command = ?other, "Ignoring unknown surface command"),
    }
}
