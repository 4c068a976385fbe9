//! Prelude module - commonly used types for convenient import.
//!
//! Use `use trestle_capabilities::prelude::*;` to import all essential types.

// Registry
pub use crate::{
    Application, ApplicationInfo, CapabilityQuery, CapabilityRegistry, Manifest,
    RegistrationReport,
};

// Interceptors
pub use crate::{
    CapabilityInterceptor, CapabilityInterceptorChain, ManifestInterceptor, RegistrationContext,
};

// Errors
pub use crate::{CapabilityError, CapabilityResult};
