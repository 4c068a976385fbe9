//! Built-in startup initializers.
//!
//! Pre-startup, in separate initializers that touch disjoint state:
//! - [`CapabilityChainInitializer`]: validators (Part, View, Dialog, Popup,
//!   MessageBox, Notification), the stable-id assigner, the desktop-pin
//!   enricher, then user capability interceptors; plus the built-in
//!   capability provider on the host manifest.
//! - [`IntentChainInitializer`]: Dialog, Popup, MessageBox and Notification
//!   handlers, then user intent interceptors.
//! - [`HostRouteInitializer`]: routes for the built-in text surfaces, then
//!   user routes.
//!
//! Post-startup:
//! - [`ApplicationInitializer`]: registers the host, then every configured
//!   application. Runs after the chains are in place so every capability
//!   passes through them.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use trestle_capabilities::enrich::{
    BuiltinCapabilityProvider, DesktopPinEnricher, PinRule, StableIdAssigner,
};
use trestle_capabilities::{Application, CapabilityInterceptor, CapabilityRegistry, validate};
use trestle_core::{Qualifier, SurfaceKind};
use trestle_events::MessageBus;
use trestle_intents::{IntentBroker, IntentInterceptor, register_surface_handlers};
use trestle_surfaces::{HostRouteTable, RouteDescriptor, SurfaceLauncher};

use crate::error::KernelResult;
use crate::startup::Initializer;

/// Component serving the built-in text message box.
pub const TEXT_MESSAGE_BOX_COMPONENT: &str = "trestle-text-message-box";
/// Component serving the built-in text notification.
pub const TEXT_NOTIFICATION_COMPONENT: &str = "trestle-text-notification";

/// Installs the capability interceptor chain and host manifest interceptors.
pub struct CapabilityChainInitializer {
    registry: Arc<CapabilityRegistry>,
    pins: Vec<PinRule>,
    extra: Vec<Arc<dyn CapabilityInterceptor>>,
}

impl CapabilityChainInitializer {
    /// Create the initializer.
    #[must_use]
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        pins: Vec<PinRule>,
        extra: Vec<Arc<dyn CapabilityInterceptor>>,
    ) -> Self {
        Self {
            registry,
            pins,
            extra,
        }
    }
}

#[async_trait]
impl Initializer for CapabilityChainInitializer {
    fn name(&self) -> &str {
        "capability-chain"
    }

    async fn initialize(&self) -> KernelResult<()> {
        validate::register_all(&self.registry);
        self.registry
            .register_capability_interceptor(Arc::new(StableIdAssigner::for_surfaces()));
        self.registry
            .register_capability_interceptor(Arc::new(DesktopPinEnricher::new(self.pins.clone())));
        for interceptor in &self.extra {
            self.registry
                .register_capability_interceptor(Arc::clone(interceptor));
        }
        self.registry
            .register_host_manifest_interceptor(Arc::new(BuiltinCapabilityProvider));

        info!(
            interceptors = ?self.registry.capability_interceptor_names(),
            "Capability chain installed"
        );
        Ok(())
    }
}

/// Installs the intent interceptor chain.
pub struct IntentChainInitializer {
    broker: IntentBroker,
    bus: MessageBus,
    launcher: SurfaceLauncher,
    extra: Vec<Arc<dyn IntentInterceptor>>,
}

impl IntentChainInitializer {
    /// Create the initializer.
    #[must_use]
    pub fn new(
        broker: IntentBroker,
        bus: MessageBus,
        launcher: SurfaceLauncher,
        extra: Vec<Arc<dyn IntentInterceptor>>,
    ) -> Self {
        Self {
            broker,
            bus,
            launcher,
            extra,
        }
    }
}

#[async_trait]
impl Initializer for IntentChainInitializer {
    fn name(&self) -> &str {
        "intent-chain"
    }

    async fn initialize(&self) -> KernelResult<()> {
        register_surface_handlers(&self.broker, &self.bus, &self.launcher);
        for interceptor in &self.extra {
            self.broker.register_intent_interceptor(Arc::clone(interceptor));
        }
        info!(
            interceptors = ?self.broker.interceptor_names(),
            "Intent chain installed"
        );
        Ok(())
    }
}

/// Adds host routes.
pub struct HostRouteInitializer {
    routes: Arc<HostRouteTable>,
    extra: Vec<RouteDescriptor>,
}

impl HostRouteInitializer {
    /// Create the initializer.
    #[must_use]
    pub fn new(routes: Arc<HostRouteTable>, extra: Vec<RouteDescriptor>) -> Self {
        Self { routes, extra }
    }
}

/// Routes serving the built-in text surfaces.
#[must_use]
pub fn builtin_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::for_capability(
            SurfaceKind::MessageBox,
            Qualifier::new(),
            TEXT_MESSAGE_BOX_COMPONENT,
        ),
        RouteDescriptor::for_capability(
            SurfaceKind::Notification,
            Qualifier::new(),
            TEXT_NOTIFICATION_COMPONENT,
        ),
    ]
}

#[async_trait]
impl Initializer for HostRouteInitializer {
    fn name(&self) -> &str {
        "host-routes"
    }

    async fn initialize(&self) -> KernelResult<()> {
        for route in builtin_routes().into_iter().chain(self.extra.iter().cloned()) {
            self.routes.add(route);
        }
        Ok(())
    }
}

/// Registers the host and the configured applications.
pub struct ApplicationInitializer {
    registry: Arc<CapabilityRegistry>,
    applications: Vec<Application>,
}

impl ApplicationInitializer {
    /// Create the initializer. `applications` should start with the host.
    #[must_use]
    pub fn new(registry: Arc<CapabilityRegistry>, applications: Vec<Application>) -> Self {
        Self {
            registry,
            applications,
        }
    }
}

#[async_trait]
impl Initializer for ApplicationInitializer {
    fn name(&self) -> &str {
        "applications"
    }

    async fn initialize(&self) -> KernelResult<()> {
        for app in &self.applications {
            let report = self.registry.register_application(app.clone())?;
            if !report.rejected.is_empty() {
                warn!(
                    app = %app.symbolic_name,
                    rejected = report.rejected.len(),
                    "Application registered with rejected capabilities"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trestle_capabilities::{CapabilityQuery, Manifest};
    use trestle_capabilities::enrich::is_builtin;
    use trestle_core::{AppSymbolicName, Capability, QualifierPattern};
    use trestle_test::MockShell;

    const HOST: &str = "workbench-host";

    fn registry() -> Arc<CapabilityRegistry> {
        Arc::new(CapabilityRegistry::new(AppSymbolicName::new(HOST)))
    }

    #[tokio::test]
    async fn test_capability_chain_order() {
        let registry = registry();
        CapabilityChainInitializer::new(Arc::clone(&registry), Vec::new(), Vec::new())
            .initialize()
            .await
            .unwrap();

        assert_eq!(
            registry.capability_interceptor_names(),
            vec![
                "part-capability-validator",
                "view-capability-validator",
                "dialog-capability-validator",
                "popup-capability-validator",
                "messagebox-capability-validator",
                "notification-capability-validator",
                "stable-id-assigner",
                "desktop-pin-enricher",
            ]
        );
    }

    #[tokio::test]
    async fn test_host_receives_builtin_capabilities() {
        let registry = registry();
        CapabilityChainInitializer::new(Arc::clone(&registry), Vec::new(), Vec::new())
            .initialize()
            .await
            .unwrap();
        ApplicationInitializer::new(
            Arc::clone(&registry),
            vec![Application::new(HOST, "", Manifest::new())],
        )
        .initialize()
        .await
        .unwrap();

        let builtins: Vec<Capability> = registry
            .lookup(&CapabilityQuery::default())
            .unwrap()
            .into_iter()
            .filter(is_builtin)
            .collect();
        assert_eq!(builtins.len(), 2);
        assert!(builtins.iter().all(|c| c.metadata.id.is_some()));
    }

    #[tokio::test]
    async fn test_pin_rules_reach_enricher() {
        let registry = registry();
        let pins = vec![PinRule::new("view", QualifierPattern::any())];
        CapabilityChainInitializer::new(Arc::clone(&registry), pins, Vec::new())
            .initialize()
            .await
            .unwrap();

        let manifest = Manifest::new().with_capability(
            Capability::new("view")
                .with_qualifier(Qualifier::new().with("entity", "person"))
                .with_property("path", "person"),
        );
        ApplicationInitializer::new(
            Arc::clone(&registry),
            vec![Application::new("people", "https://people.example", manifest)],
        )
        .initialize()
        .await
        .unwrap();

        let views = registry.lookup(&CapabilityQuery::of_type("view")).unwrap();
        assert_eq!(
            views[0].property("pinToDesktop"),
            Some(&serde_json::Value::Bool(true))
        );
    }

    #[tokio::test]
    async fn test_host_routes_include_builtins() {
        let routes = Arc::new(HostRouteTable::new());
        let extra = RouteDescriptor::for_capability(
            SurfaceKind::Dialog,
            Qualifier::new().with("component", "about"),
            "about-dialog",
        );
        HostRouteInitializer::new(Arc::clone(&routes), vec![extra])
            .initialize()
            .await
            .unwrap();

        assert_eq!(routes.routes().len(), 3);
        let route = routes
            .find(SurfaceKind::MessageBox, &Qualifier::new())
            .unwrap();
        assert_eq!(route.component, TEXT_MESSAGE_BOX_COMPONENT);
    }

    #[tokio::test]
    async fn test_intent_chain_order() {
        let bus = MessageBus::new();
        let registry = registry();
        let broker = IntentBroker::new(bus.clone(), Arc::clone(&registry));
        let launcher = SurfaceLauncher::new(
            bus.clone(),
            Arc::new(MockShell::new()),
            registry,
            Arc::new(HostRouteTable::new()),
        );
        IntentChainInitializer::new(broker.clone(), bus, launcher, Vec::new())
            .initialize()
            .await
            .unwrap();

        assert_eq!(
            broker.interceptor_names(),
            vec![
                "dialog-intent-handler",
                "popup-intent-handler",
                "messagebox-intent-handler",
                "notification-intent-handler",
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_application_fails() {
        let registry = registry();
        let app = Application::new("people", "https://people.example", Manifest::new());
        let err = ApplicationInitializer::new(Arc::clone(&registry), vec![app.clone(), app])
            .initialize()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("people"));
    }
}
