//! Capability registry.
//!
//! In-process model of the application platform: applications register
//! their manifests, capabilities pass the interceptor chain, and intents are
//! resolved against the registered capabilities.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, warn};
use trestle_core::{
    AppSymbolicName, Capability, DefinitionError, Intent, Intention, QualifierPattern,
    ResolutionError,
};

use crate::error::{CapabilityError, CapabilityResult};
use crate::interceptor::{
    CapabilityInterceptor, CapabilityInterceptorChain, ManifestInterceptor, RegistrationContext,
};
use crate::manifest::Application;

/// A registered application, without its capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationInfo {
    /// Symbolic name.
    pub symbolic_name: AppSymbolicName,
    /// Human-readable name from the manifest.
    pub name: Option<String>,
    /// Base URL microfrontend paths are resolved against.
    pub base_url: String,
    /// Declared intentions.
    pub intentions: Vec<Intention>,
    /// May see private capabilities of other applications.
    pub scope_check_disabled: bool,
    /// May issue intents without declaring intentions.
    pub intention_check_disabled: bool,
}

/// Outcome of registering an application.
#[derive(Debug, Clone, Default)]
pub struct RegistrationReport {
    /// Capabilities that passed the interceptor chain, as stored.
    pub registered: Vec<Capability>,
    /// Capabilities rejected by a validator.
    pub rejected: Vec<DefinitionError>,
}

/// Filter for [`CapabilityRegistry::lookup`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CapabilityQuery {
    /// Capability id.
    pub id: Option<String>,
    /// Capability type.
    pub capability_type: Option<String>,
    /// Qualifier pattern.
    pub qualifier: Option<QualifierPattern>,
    /// Declaring application.
    pub app: Option<AppSymbolicName>,
}

impl CapabilityQuery {
    /// Match capabilities of a type.
    #[must_use]
    pub fn of_type(capability_type: impl Into<String>) -> Self {
        Self {
            capability_type: Some(capability_type.into()),
            ..Self::default()
        }
    }

    /// Match a capability by id.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Restrict to a qualifier pattern.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: QualifierPattern) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Restrict to a declaring application.
    #[must_use]
    pub fn declared_by(mut self, app: AppSymbolicName) -> Self {
        self.app = Some(app);
        self
    }

    fn matches(&self, capability: &Capability) -> bool {
        self.id.as_deref().is_none_or(|id| capability.id() == id)
            && self
                .capability_type
                .as_deref()
                .is_none_or(|t| capability.capability_type == t)
            && self
                .qualifier
                .as_ref()
                .is_none_or(|q| q.matches(&capability.qualifier))
            && self.app.as_ref().is_none_or(|app| capability.app() == app)
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    applications: HashMap<AppSymbolicName, ApplicationInfo>,
    /// Capabilities in registration order.
    capabilities: Vec<Capability>,
}

/// Registry of applications and their capabilities.
pub struct CapabilityRegistry {
    host_app: AppSymbolicName,
    interceptors: RwLock<CapabilityInterceptorChain>,
    manifest_interceptors: RwLock<Vec<Arc<dyn ManifestInterceptor>>>,
    state: RwLock<RegistryState>,
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("host_app", &self.host_app)
            .finish_non_exhaustive()
    }
}

impl CapabilityRegistry {
    /// Create an empty registry for the given host application.
    #[must_use]
    pub fn new(host_app: AppSymbolicName) -> Self {
        Self {
            host_app,
            interceptors: RwLock::new(CapabilityInterceptorChain::new()),
            manifest_interceptors: RwLock::new(Vec::new()),
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// The host application.
    #[must_use]
    pub fn host_app(&self) -> &AppSymbolicName {
        &self.host_app
    }

    /// Append a capability interceptor to the chain.
    ///
    /// Only capabilities registered afterwards pass through it.
    pub fn register_capability_interceptor(&self, interceptor: Arc<dyn CapabilityInterceptor>) {
        match self.interceptors.write() {
            Ok(mut chain) => {
                debug!(interceptor = interceptor.name(), "Registered capability interceptor");
                chain.push(interceptor);
            },
            Err(e) => warn!(error = %e, "Capability interceptor chain poisoned"),
        }
    }

    /// Append an interceptor for the host application's manifest.
    pub fn register_host_manifest_interceptor(&self, interceptor: Arc<dyn ManifestInterceptor>) {
        match self.manifest_interceptors.write() {
            Ok(mut interceptors) => {
                debug!(interceptor = interceptor.name(), "Registered host manifest interceptor");
                interceptors.push(interceptor);
            },
            Err(e) => warn!(error = %e, "Host manifest interceptors poisoned"),
        }
    }

    /// Names of the capability interceptors in execution order.
    #[must_use]
    pub fn capability_interceptor_names(&self) -> Vec<String> {
        self.interceptors
            .read()
            .map(|chain| chain.names())
            .unwrap_or_default()
    }

    /// Register an application and its manifest.
    ///
    /// Every capability runs through the interceptor chain. Rejected
    /// capabilities are logged and reported, but do not fail the
    /// registration of the others.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::DuplicateApplication`] if the application
    /// is already registered, or a storage error.
    pub fn register_application(
        &self,
        application: Application,
    ) -> CapabilityResult<RegistrationReport> {
        let Application {
            symbolic_name,
            base_url,
            mut manifest,
            scope_check_disabled,
            intention_check_disabled,
        } = application;

        if self.read_state()?.applications.contains_key(&symbolic_name) {
            return Err(CapabilityError::DuplicateApplication(
                symbolic_name.to_string(),
            ));
        }

        if symbolic_name == self.host_app {
            let interceptors = self
                .manifest_interceptors
                .read()
                .map_err(|e| CapabilityError::StorageError(e.to_string()))?
                .clone();
            for interceptor in interceptors {
                debug!(interceptor = interceptor.name(), "Intercepting host manifest");
                interceptor.intercept(&mut manifest);
            }
        }

        let chain = self
            .interceptors
            .read()
            .map_err(|e| CapabilityError::StorageError(e.to_string()))?
            .clone();
        let context = RegistrationContext {
            host_app: self.host_app.clone(),
        };

        let mut report = RegistrationReport::default();
        for mut capability in manifest.capabilities {
            capability.metadata.app_symbolic_name = symbolic_name.clone();
            capability.metadata.id = Some(uuid::Uuid::new_v4().to_string());
            match chain.run(capability, &context) {
                Ok(capability) => report.registered.push(capability),
                Err(e) => {
                    error!(app = %symbolic_name, error = %e, "Capability rejected");
                    report.rejected.push(e);
                },
            }
        }

        let mut state = self.write_state()?;
        // Re-checked under the write guard.
        if state.applications.contains_key(&symbolic_name) {
            return Err(CapabilityError::DuplicateApplication(
                symbolic_name.to_string(),
            ));
        }
        for capability in &report.registered {
            if let Some(existing) = state
                .capabilities
                .iter_mut()
                .find(|c| c.id() == capability.id())
            {
                warn!(
                    app = %symbolic_name,
                    capability_id = capability.id(),
                    "Capability id already registered, replacing"
                );
                *existing = capability.clone();
            } else {
                state.capabilities.push(capability.clone());
            }
        }
        state.applications.insert(
            symbolic_name.clone(),
            ApplicationInfo {
                symbolic_name: symbolic_name.clone(),
                name: manifest.name,
                base_url,
                intentions: manifest.intentions,
                scope_check_disabled,
                intention_check_disabled,
            },
        );

        info!(
            app = %symbolic_name,
            registered = report.registered.len(),
            rejected = report.rejected.len(),
            "Registered application"
        );
        Ok(report)
    }

    /// Look up a registered application.
    #[must_use]
    pub fn application(&self, symbolic_name: &AppSymbolicName) -> Option<ApplicationInfo> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.applications.get(symbolic_name).cloned())
    }

    /// Symbolic names of all registered applications, sorted.
    #[must_use]
    pub fn applications(&self) -> Vec<AppSymbolicName> {
        let mut names: Vec<AppSymbolicName> = self
            .state
            .read()
            .map(|state| state.applications.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Look up a capability by id.
    #[must_use]
    pub fn capability(&self, id: &str) -> Option<Capability> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.capabilities.iter().find(|c| c.id() == id).cloned())
    }

    /// All capabilities matching a query, in registration order.
    ///
    /// Visibility is not applied.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the registry lock is poisoned.
    pub fn lookup(&self, query: &CapabilityQuery) -> CapabilityResult<Vec<Capability>> {
        Ok(self
            .read_state()?
            .capabilities
            .iter()
            .filter(|c| query.matches(c))
            .cloned()
            .collect())
    }

    /// Capabilities the requester may use for an intent.
    ///
    /// The qualifier must match exactly. Private capabilities of other
    /// applications are only visible with the scope check disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NotQualified`] if the requester has no
    /// intention covering the intent, or
    /// [`CapabilityError::UnknownApplication`] for an unregistered requester.
    pub fn resolve(
        &self,
        intent: &Intent,
        requester: &AppSymbolicName,
    ) -> CapabilityResult<Vec<Capability>> {
        let state = self.read_state()?;
        let info = state
            .applications
            .get(requester)
            .ok_or_else(|| CapabilityError::UnknownApplication(requester.to_string()))?;

        if !info.intention_check_disabled && !is_qualified(&state, info, intent) {
            return Err(ResolutionError::NotQualified {
                app: requester.clone(),
                intent_type: intent.intent_type.clone(),
                qualifier: intent.qualifier.clone(),
            }
            .into());
        }

        Ok(state
            .capabilities
            .iter()
            .filter(|c| c.capability_type == intent.intent_type)
            .filter(|c| c.qualifier == intent.qualifier)
            .filter(|c| !c.private || c.app() == requester || info.scope_check_disabled)
            .cloned()
            .collect())
    }

    /// Resolve an intent to exactly one capability and check its params.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] if no or several capabilities match,
    /// or the intent's params do not fit the capability.
    pub fn resolve_one(
        &self,
        intent: &Intent,
        requester: &AppSymbolicName,
    ) -> CapabilityResult<Capability> {
        let mut candidates = self.resolve(intent, requester)?;
        let capability = match candidates.len() {
            0 => {
                return Err(ResolutionError::NoCapability {
                    intent_type: intent.intent_type.clone(),
                    qualifier: intent.qualifier.clone(),
                    app: requester.clone(),
                }
                .into());
            },
            1 => candidates.remove(0),
            count => {
                let providers = candidates
                    .iter()
                    .map(|c| c.app().as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ResolutionError::Ambiguous {
                    intent_type: intent.intent_type.clone(),
                    qualifier: intent.qualifier.clone(),
                    count,
                    providers,
                }
                .into());
            },
        };
        check_params(&capability, intent)?;
        Ok(capability)
    }

    fn read_state(&self) -> CapabilityResult<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|e| CapabilityError::StorageError(e.to_string()))
    }

    fn write_state(&self) -> CapabilityResult<std::sync::RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|e| CapabilityError::StorageError(e.to_string()))
    }
}

/// An application may issue intents for its own capabilities and for those
/// covered by its intentions.
fn is_qualified(state: &RegistryState, info: &ApplicationInfo, intent: &Intent) -> bool {
    info.intentions.iter().any(|i| i.covers(intent))
        || state.capabilities.iter().any(|c| {
            c.app() == &info.symbolic_name
                && c.capability_type == intent.intent_type
                && c.qualifier == intent.qualifier
        })
}

/// Check the intent's params against the capability's declared params.
///
/// # Errors
///
/// Returns [`ResolutionError::MissingParams`] or
/// [`ResolutionError::UnexpectedParams`], with names sorted.
pub(crate) fn check_params(capability: &Capability, intent: &Intent) -> Result<(), ResolutionError> {
    let mut missing: Vec<String> = capability
        .params
        .iter()
        .filter(|p| p.required && !intent.params.contains_key(&p.name))
        .map(|p| p.name.clone())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(ResolutionError::MissingParams {
            capability_id: capability.id().to_string(),
            names: missing,
        });
    }

    let declared: HashSet<&str> = capability.params.iter().map(|p| p.name.as_str()).collect();
    let mut unexpected: Vec<String> = intent
        .params
        .keys()
        .filter(|name| !declared.contains(name.as_str()))
        .cloned()
        .collect();
    if !unexpected.is_empty() {
        unexpected.sort();
        return Err(ResolutionError::UnexpectedParams {
            capability_id: capability.id().to_string(),
            names: unexpected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{BuiltinCapabilityProvider, StableIdAssigner};
    use crate::manifest::Manifest;
    use crate::validate;
    use serde_json::json;
    use trestle_core::{ParamDescriptor, Qualifier, SurfaceKind, stable_capability_id};

    const HOST: &str = "workbench-host";

    fn name(app: &str) -> AppSymbolicName {
        AppSymbolicName::new(app)
    }

    fn registry() -> CapabilityRegistry {
        let registry = CapabilityRegistry::new(name(HOST));
        validate::register_all(&registry);
        registry
    }

    fn contact_qualifier() -> Qualifier {
        Qualifier::new().with("component", "contact")
    }

    fn contact_popup() -> Capability {
        Capability::new("popup")
            .with_qualifier(contact_qualifier())
            .with_property("path", "contact/:id")
            .with_param(ParamDescriptor::required("id"))
    }

    fn popup_intent() -> Intent {
        Intent::for_surface(SurfaceKind::Popup, contact_qualifier()).with_param("id", 5)
    }

    fn register(registry: &CapabilityRegistry, app: &str, manifest: Manifest) -> RegistrationReport {
        registry
            .register_application(Application::new(app, format!("https://{app}.example"), manifest))
            .unwrap()
    }

    fn client_manifest() -> Manifest {
        Manifest::new().with_intention(Intention::new("popup", QualifierPattern::any()))
    }

    #[test]
    fn test_register_assigns_app_and_id() {
        let registry = registry();
        let report = register(&registry, "contacts", Manifest::new().with_capability(contact_popup()));

        assert_eq!(report.registered.len(), 1);
        let capability = &report.registered[0];
        assert_eq!(capability.app(), &name("contacts"));
        assert!(!capability.id().is_empty());
        assert_eq!(registry.capability(capability.id()).as_ref(), Some(capability));
    }

    #[test]
    fn test_invalid_capability_rejected_others_kept() {
        let registry = registry();
        let invalid = Capability::new("popup").with_property("path", "x");
        let report = register(
            &registry,
            "contacts",
            Manifest::new().with_capability(invalid).with_capability(contact_popup()),
        );

        assert_eq!(report.registered.len(), 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].surface, "Popup");
        assert_eq!(registry.lookup(&CapabilityQuery::of_type("popup")).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_application_rejected() {
        let registry = registry();
        register(&registry, "contacts", Manifest::new());
        let err = registry
            .register_application(Application::new("contacts", "x", Manifest::new()))
            .unwrap_err();
        assert_eq!(err, CapabilityError::DuplicateApplication("contacts".into()));
    }

    #[test]
    fn test_concurrent_duplicate_registration_has_one_winner() {
        let registry = registry();
        let barrier = std::sync::Barrier::new(8);

        let winners: Vec<String> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|n| {
                    let registry = &registry;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        let base_url = format!("https://contacts-{n}.example");
                        barrier.wait();
                        registry
                            .register_application(Application::new(
                                "contacts",
                                base_url.as_str(),
                                Manifest::new().with_capability(contact_popup()),
                            ))
                            .ok()
                            .map(|_| base_url)
                    })
                })
                .collect();
            workers
                .into_iter()
                .filter_map(|worker| worker.join().unwrap())
                .collect()
        });

        assert_eq!(winners.len(), 1);
        let info = registry.application(&name("contacts")).unwrap();
        assert_eq!(info.base_url, winners[0]);
        assert_eq!(registry.lookup(&CapabilityQuery::of_type("popup")).unwrap().len(), 1);
    }

    #[test]
    fn test_stable_ids_overwrite_on_reregistration() {
        let registry = registry();
        registry.register_capability_interceptor(Arc::new(StableIdAssigner::for_surfaces()));
        let manifest = Manifest::new()
            .with_capability(contact_popup())
            .with_capability(contact_popup());
        let report = register(&registry, "contacts", manifest);

        assert_eq!(report.registered.len(), 2);
        let expected = stable_capability_id(&contact_popup().declared_by(name("contacts")));
        assert_eq!(report.registered[0].id(), expected);
        assert_eq!(registry.lookup(&CapabilityQuery::by_id(expected)).unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_public_capability_of_other_app() {
        let registry = registry();
        register(&registry, "contacts", Manifest::new().with_capability(contact_popup().public()));
        register(&registry, "mail", client_manifest());

        let capability = registry.resolve_one(&popup_intent(), &name("mail")).unwrap();
        assert_eq!(capability.app(), &name("contacts"));
    }

    #[test]
    fn test_private_capability_invisible_to_others() {
        let registry = registry();
        register(&registry, "contacts", Manifest::new().with_capability(contact_popup()));
        register(&registry, "mail", client_manifest());

        let err = registry.resolve_one(&popup_intent(), &name("mail")).unwrap_err();
        assert!(matches!(
            err,
            CapabilityError::Resolution(ResolutionError::NoCapability { .. })
        ));
        // Own private capability resolves without an intention.
        assert!(registry.resolve_one(&popup_intent(), &name("contacts")).is_ok());
    }

    #[test]
    fn test_scope_check_disabled_sees_private() {
        let registry = registry();
        register(&registry, "contacts", Manifest::new().with_capability(contact_popup()));
        registry
            .register_application(
                Application::new("devtools", "https://devtools.example", client_manifest())
                    .without_scope_check(),
            )
            .unwrap();

        assert!(registry.resolve_one(&popup_intent(), &name("devtools")).is_ok());
    }

    #[test]
    fn test_missing_intention_not_qualified() {
        let registry = registry();
        register(&registry, "contacts", Manifest::new().with_capability(contact_popup().public()));
        register(&registry, "mail", Manifest::new());

        let err = registry.resolve(&popup_intent(), &name("mail")).unwrap_err();
        assert!(matches!(
            err,
            CapabilityError::Resolution(ResolutionError::NotQualified { .. })
        ));

        registry
            .register_application(
                Application::new("legacy", "https://legacy.example", Manifest::new())
                    .without_intention_check(),
            )
            .unwrap();
        assert!(registry.resolve_one(&popup_intent(), &name("legacy")).is_ok());
    }

    #[test]
    fn test_qualifier_must_match_exactly() {
        let registry = registry();
        register(&registry, "contacts", Manifest::new().with_capability(contact_popup().public()));
        register(&registry, "mail", client_manifest());

        let intent = Intent::for_surface(
            SurfaceKind::Popup,
            contact_qualifier().with("extra", "1"),
        );
        assert!(registry.resolve(&intent, &name("mail")).unwrap().is_empty());
    }

    #[test]
    fn test_ambiguous_resolution() {
        let registry = registry();
        register(&registry, "a", Manifest::new().with_capability(contact_popup().public()));
        register(&registry, "b", Manifest::new().with_capability(contact_popup().public()));
        register(&registry, "mail", client_manifest());

        let err = registry.resolve_one(&popup_intent(), &name("mail")).unwrap_err();
        match err {
            CapabilityError::Resolution(ResolutionError::Ambiguous { count, providers, .. }) => {
                assert_eq!(count, 2);
                assert_eq!(providers, "a, b");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_param_checks() {
        let registry = registry();
        register(&registry, "contacts", Manifest::new().with_capability(contact_popup().public()));
        register(&registry, "mail", client_manifest());

        let missing = Intent::for_surface(SurfaceKind::Popup, contact_qualifier());
        assert!(matches!(
            registry.resolve_one(&missing, &name("mail")).unwrap_err(),
            CapabilityError::Resolution(ResolutionError::MissingParams { names, .. })
                if names == vec!["id".to_string()]
        ));

        let unexpected = popup_intent().with_param("zzz", json!(true));
        assert!(matches!(
            registry.resolve_one(&unexpected, &name("mail")).unwrap_err(),
            CapabilityError::Resolution(ResolutionError::UnexpectedParams { names, .. })
                if names == vec!["zzz".to_string()]
        ));
    }

    #[test]
    fn test_host_manifest_interceptors_only_apply_to_host() {
        let registry = registry();
        registry.register_host_manifest_interceptor(Arc::new(BuiltinCapabilityProvider));
        register(&registry, "contacts", Manifest::new());
        assert!(registry.lookup(&CapabilityQuery::of_type("messagebox")).unwrap().is_empty());

        let report = register(&registry, HOST, Manifest::new());
        assert_eq!(report.registered.len(), 2);
        assert!(report.rejected.is_empty());

        let intent = Intent::for_surface(SurfaceKind::MessageBox, Qualifier::new())
            .with_param("message", "hi");
        assert!(registry.resolve_one(&intent, &name(HOST)).is_ok());
    }

    #[test]
    fn test_unknown_requester() {
        let registry = registry();
        assert_eq!(
            registry.resolve(&popup_intent(), &name("nobody")).unwrap_err(),
            CapabilityError::UnknownApplication("nobody".into())
        );
    }

    #[test]
    fn test_lookup_by_pattern_and_app() {
        let registry = registry();
        register(&registry, "contacts", Manifest::new().with_capability(contact_popup()));
        let query = CapabilityQuery::of_type("popup")
            .with_qualifier(QualifierPattern::from_entries([("component", "*")]))
            .declared_by(name("contacts"));
        assert_eq!(registry.lookup(&query).unwrap().len(), 1);
        assert!(
            registry
                .lookup(&query.declared_by(name("other")))
                .unwrap()
                .is_empty()
        );
    }
}
