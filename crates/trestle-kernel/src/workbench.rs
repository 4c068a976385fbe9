//! Workbench boot wiring.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;
use trestle_capabilities::{Application, CapabilityInterceptor, CapabilityRegistry, Manifest};
use trestle_config::Config;
use trestle_core::AppSymbolicName;
use trestle_events::MessageBus;
use trestle_intents::{IntentBroker, IntentClient, IntentInterceptor};
use trestle_surfaces::{
    HostRouteTable, RouteDescriptor, SurfaceLauncher, SurfaceRouter, WorkbenchShell,
};

use crate::bridge;
use crate::error::KernelResult;
use crate::initializers::{
    ApplicationInitializer, CapabilityChainInitializer, HostRouteInitializer,
    IntentChainInitializer,
};
use crate::services::WorkbenchServices;
use crate::startup::{Initializer, StartupOrchestrator, StartupPhase};

/// Collects what the workbench is booted with.
pub struct WorkbenchBuilder {
    config: Config,
    shell: Arc<dyn WorkbenchShell>,
    host_manifest: Manifest,
    applications: Vec<Application>,
    routes: Vec<RouteDescriptor>,
    capability_interceptors: Vec<Arc<dyn CapabilityInterceptor>>,
    intent_interceptors: Vec<Arc<dyn IntentInterceptor>>,
    initializers: Vec<(StartupPhase, Arc<dyn Initializer>)>,
}

impl std::fmt::Debug for WorkbenchBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkbenchBuilder")
            .field("host_app", &self.config.workbench.host_app)
            .field("applications", &self.applications.len())
            .field("routes", &self.routes.len())
            .finish_non_exhaustive()
    }
}

impl WorkbenchBuilder {
    /// Start building a workbench that presents surfaces through `shell`.
    #[must_use]
    pub fn new(shell: Arc<dyn WorkbenchShell>) -> Self {
        Self {
            config: Config::default(),
            shell,
            host_manifest: Manifest::new(),
            applications: Vec::new(),
            routes: Vec::new(),
            capability_interceptors: Vec::new(),
            intent_interceptors: Vec::new(),
            initializers: Vec::new(),
        }
    }

    /// Use `config` instead of the defaults.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Capabilities and intentions of the host application.
    #[must_use]
    pub fn with_host_manifest(mut self, manifest: Manifest) -> Self {
        self.host_manifest = manifest;
        self
    }

    /// Register an application in addition to the configured ones.
    #[must_use]
    pub fn with_application(mut self, application: Application) -> Self {
        self.applications.push(application);
        self
    }

    /// Add a host route.
    #[must_use]
    pub fn with_route(mut self, route: RouteDescriptor) -> Self {
        self.routes.push(route);
        self
    }

    /// Append a capability interceptor after the built-in validators and
    /// enrichers.
    #[must_use]
    pub fn with_capability_interceptor(
        mut self,
        interceptor: Arc<dyn CapabilityInterceptor>,
    ) -> Self {
        self.capability_interceptors.push(interceptor);
        self
    }

    /// Append an intent interceptor after the built-in surface handlers.
    #[must_use]
    pub fn with_intent_interceptor(mut self, interceptor: Arc<dyn IntentInterceptor>) -> Self {
        self.intent_interceptors.push(interceptor);
        self
    }

    /// Run `initializer` during startup.
    #[must_use]
    pub fn with_initializer(
        mut self,
        phase: StartupPhase,
        initializer: Arc<dyn Initializer>,
    ) -> Self {
        self.initializers.push((phase, initializer));
        self
    }

    /// Boot the workbench.
    ///
    /// Runs the built-in and user initializers phase by phase, then starts
    /// the intent broker.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::KernelError`] if a configured application cannot be
    /// converted, an initializer fails or times out, or the broker cannot
    /// subscribe.
    pub async fn start(self) -> KernelResult<Workbench> {
        let config = self.config;
        let host = AppSymbolicName::new(config.workbench.host_app.as_str());

        let bus = MessageBus::with_capacity(config.bus.channel_capacity);
        let registry = Arc::new(CapabilityRegistry::new(host.clone()));
        let routes = Arc::new(HostRouteTable::new());
        let launcher = SurfaceLauncher::new(
            bus.clone(),
            self.shell,
            Arc::clone(&registry),
            Arc::clone(&routes),
        )
        .with_durations(bridge::duration_defaults(
            &config.surfaces.notification_duration,
        ));
        let broker = IntentBroker::new(bus.clone(), Arc::clone(&registry));

        let mut applications = vec![Application::new(host.clone(), "", self.host_manifest)];
        applications.extend(bridge::applications(&config)?);
        applications.extend(self.applications);

        let mut orchestrator = StartupOrchestrator::new();
        if config.startup.initializer_timeout_ms > 0 {
            orchestrator = orchestrator
                .with_timeout(Duration::from_millis(config.startup.initializer_timeout_ms));
        }
        orchestrator.register_in(
            StartupPhase::PreStartup,
            Arc::new(CapabilityChainInitializer::new(
                Arc::clone(&registry),
                bridge::pin_rules(&config.desktop),
                self.capability_interceptors,
            )),
        );
        orchestrator.register_in(
            StartupPhase::PreStartup,
            Arc::new(IntentChainInitializer::new(
                broker.clone(),
                bus.clone(),
                launcher.clone(),
                self.intent_interceptors,
            )),
        );
        orchestrator.register_in(
            StartupPhase::PreStartup,
            Arc::new(HostRouteInitializer::new(Arc::clone(&routes), self.routes)),
        );
        orchestrator.register_in(
            StartupPhase::PostStartup,
            Arc::new(ApplicationInitializer::new(
                Arc::clone(&registry),
                applications,
            )),
        );
        for (phase, initializer) in self.initializers {
            orchestrator.register_in(phase, initializer);
        }

        orchestrator.run().await?;
        let broker_task = broker.spawn()?;

        info!(
            host_app = %host,
            applications = registry.applications().len(),
            "Workbench started"
        );

        Ok(Workbench {
            config,
            host,
            bus,
            registry,
            routes,
            router: SurfaceRouter::new(launcher),
            broker,
            broker_task,
        })
    }
}

/// A running workbench.
pub struct Workbench {
    config: Config,
    host: AppSymbolicName,
    bus: MessageBus,
    registry: Arc<CapabilityRegistry>,
    routes: Arc<HostRouteTable>,
    router: SurfaceRouter,
    broker: IntentBroker,
    broker_task: JoinHandle<()>,
}

impl std::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbench")
            .field("host", &self.host)
            .field("broker", &self.broker)
            .finish_non_exhaustive()
    }
}

impl Workbench {
    /// Start building a workbench.
    #[must_use]
    pub fn builder(shell: Arc<dyn WorkbenchShell>) -> WorkbenchBuilder {
        WorkbenchBuilder::new(shell)
    }

    /// The configuration the workbench was booted with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Symbolic name of the host application.
    #[must_use]
    pub fn host_app(&self) -> &AppSymbolicName {
        &self.host
    }

    /// The message bus.
    #[must_use]
    pub fn bus(&self) -> &MessageBus {
        &self.bus
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

    /// Direct view and part routing.
    #[must_use]
    pub fn router(&self) -> &SurfaceRouter {
        &self.router
    }

    /// The intent broker.
    #[must_use]
    pub fn broker(&self) -> &IntentBroker {
        &self.broker
    }

    /// Intent client acting as `app`, honouring the configured reply timeout.
    #[must_use]
    pub fn client(&self, app: impl Into<AppSymbolicName>) -> IntentClient {
        let client = IntentClient::new(self.bus.clone(), app.into());
        match self.config.workbench.reply_timeout_ms {
            0 => client,
            ms => client.with_timeout(Duration::from_millis(ms)),
        }
    }

    /// Open entry points acting as the host application.
    #[must_use]
    pub fn services(&self) -> WorkbenchServices {
        WorkbenchServices::new(self.client(self.host.clone()))
    }

    /// Open entry points acting as `app`.
    #[must_use]
    pub fn services_for(&self, app: impl Into<AppSymbolicName>) -> WorkbenchServices {
        WorkbenchServices::new(self.client(app))
    }

    /// Dispose the bus and wait for the broker to stop.
    pub async fn shutdown(self) {
        self.bus.dispose();
        if let Err(e) = self.broker_task.await {
            tracing::debug!(error = %e, "Intent broker task ended abnormally");
        }
        info!("Workbench stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use trestle_core::{Qualifier, SurfaceKind};
    use trestle_test::MockShell;

    #[tokio::test]
    async fn test_start_registers_host_with_builtins() {
        let workbench = Workbench::builder(Arc::new(MockShell::new()))
            .start()
            .await
            .unwrap();

        let host = workbench
            .registry()
            .application(workbench.host_app())
            .unwrap();
        assert_eq!(host.symbolic_name.as_str(), "workbench-host");
        assert!(
            workbench
                .routes()
                .find(SurfaceKind::Notification, &Qualifier::new())
                .is_ok()
        );
        workbench.shutdown().await;
    }

    #[tokio::test]
    async fn test_user_initializers_run_once() {
        let seen = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&seen);
        let count_runs = move || {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
                KernelResult::Ok(())
            }
        };
        let workbench = Workbench::builder(Arc::new(MockShell::new()))
            .with_initializer(
                StartupPhase::PostStartup,
                Arc::new(crate::startup::FnInitializer::new("probe", count_runs)),
            )
            .start()
            .await
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        workbench.shutdown().await;
    }

    #[tokio::test]
    async fn test_unresolvable_dialog_is_rejected() {
        let mut config = Config::default();
        config.workbench.reply_timeout_ms = 5_000;
        let workbench = Workbench::builder(Arc::new(MockShell::new()))
            .with_config(config)
            .start()
            .await
            .unwrap();

        let err = workbench
            .services()
            .open_dialog(
                Qualifier::new().with("component", "missing"),
                crate::services::OpenOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, trestle_intents::ClientError::Rejected(_)));
        workbench.shutdown().await;
    }
}
