//! Capability and manifest interceptors.
//!
//! Interceptors form an explicit ordered list. Each capability passes through
//! every interceptor in registration order; an interceptor returns the
//! (possibly rewritten) capability to hand it on, or a [`DefinitionError`]
//! to reject it. Validators are registered before enrichers so enrichers only
//! ever see valid capabilities.

use std::sync::Arc;
use tracing::trace;
use trestle_core::{AppSymbolicName, Capability, DefinitionError};

use crate::manifest::Manifest;

/// Information about the registration in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationContext {
    /// The workbench host application.
    pub host_app: AppSymbolicName,
}

impl RegistrationContext {
    /// Whether the capability was declared by the host application.
    #[must_use]
    pub fn is_host(&self, capability: &Capability) -> bool {
        capability.app() == &self.host_app
    }
}

/// Interceptor run for every capability at registration.
pub trait CapabilityInterceptor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Validate or rewrite a capability.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] to reject the capability.
    fn intercept(
        &self,
        capability: Capability,
        context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError>;
}

/// Interceptor run on the host application's manifest before registration.
///
/// Used to inject built-in capabilities and intentions.
pub trait ManifestInterceptor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Rewrite the host manifest.
    fn intercept(&self, manifest: &mut Manifest);
}

/// Ordered list of capability interceptors.
#[derive(Clone, Default)]
pub struct CapabilityInterceptorChain {
    interceptors: Vec<Arc<dyn CapabilityInterceptor>>,
}

impl std::fmt::Debug for CapabilityInterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.interceptors.iter().map(|i| i.name()))
            .finish()
    }
}

impl CapabilityInterceptorChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor. Interceptors run in the order they are appended.
    pub fn push(&mut self, interceptor: Arc<dyn CapabilityInterceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Number of interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Interceptor names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.interceptors.iter().map(|i| i.name().to_string()).collect()
    }

    /// Run a capability through every interceptor.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] raised.
    pub fn run(
        &self,
        capability: Capability,
        context: &RegistrationContext,
    ) -> Result<Capability, DefinitionError> {
        self.interceptors
            .iter()
            .try_fold(capability, |capability, interceptor| {
                trace!(
                    interceptor = interceptor.name(),
                    capability_type = %capability.capability_type,
                    "Intercepting capability"
                );
                interceptor.intercept(capability, context)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl CapabilityInterceptor for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn intercept(
            &self,
            capability: Capability,
            _context: &RegistrationContext,
        ) -> Result<Capability, DefinitionError> {
            self.log.lock().unwrap().push(self.name);
            Ok(capability.with_property(self.name, true))
        }
    }

    struct Rejecting;

    impl CapabilityInterceptor for Rejecting {
        fn name(&self) -> &str {
            "rejecting"
        }

        fn intercept(
            &self,
            capability: Capability,
            _context: &RegistrationContext,
        ) -> Result<Capability, DefinitionError> {
            Err(DefinitionError::new(
                "Test",
                capability.app().clone(),
                capability.qualifier,
                "rejected",
            ))
        }
    }

    fn context() -> RegistrationContext {
        RegistrationContext {
            host_app: AppSymbolicName::new("host"),
        }
    }

    #[test]
    fn test_chain_runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = CapabilityInterceptorChain::new();
        for name in ["first", "second", "third"] {
            chain.push(Arc::new(Recording {
                name,
                log: Arc::clone(&log),
            }));
        }

        let capability = chain.run(Capability::new("view"), &context()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        assert!(capability.property("second").is_some());
        assert_eq!(chain.names(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_chain_stops_at_first_rejection() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = CapabilityInterceptorChain::new();
        chain.push(Arc::new(Rejecting));
        chain.push(Arc::new(Recording {
            name: "after",
            log: Arc::clone(&log),
        }));

        assert!(chain.run(Capability::new("view"), &context()).is_err());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_is_host() {
        let ctx = context();
        assert!(ctx.is_host(&Capability::new("view").declared_by(AppSymbolicName::new("host"))));
        assert!(!ctx.is_host(&Capability::new("view").declared_by(AppSymbolicName::new("app"))));
    }
}
