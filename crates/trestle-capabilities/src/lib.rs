//! Trestle Capabilities - Capability registration and resolution.
//!
//! This crate provides:
//! - The capability registry: applications, their capabilities and intentions
//! - An ordered chain of capability interceptors run at registration
//! - One validator per workbench surface
//! - Enrichers: stable ids, built-in host capabilities, desktop pinning
//! - Intent resolution with visibility, intention and parameter checks
//!
//! # Registration pipeline
//!
//! ```text
//! manifest ──► host manifest interceptors (host only)
//!          ──► capability interceptors, in registration order
//!              (validators first, then enrichers)
//!          ──► registry
//! ```
//!
//! # Example
//!
//! ```rust
//! use trestle_capabilities::{Application, CapabilityRegistry, Manifest, validate};
//! use trestle_core::{AppSymbolicName, Capability, Intent, Qualifier, SurfaceKind};
//!
//! let registry = CapabilityRegistry::new(AppSymbolicName::new("host"));
//! validate::register_all(&registry);
//!
//! let manifest = Manifest::new().with_capability(
//!     Capability::new("dialog")
//!         .with_qualifier(Qualifier::new().with("component", "contact"))
//!         .with_property("path", "contact")
//!         .with_property("size", serde_json::json!({"width": "400px", "height": "300px"})),
//! );
//! let report = registry
//!     .register_application(Application::new("contacts", "https://contacts.example", manifest))
//!     .unwrap();
//! assert!(report.rejected.is_empty());
//!
//! let intent = Intent::for_surface(
//!     SurfaceKind::Dialog,
//!     Qualifier::new().with("component", "contact"),
//! );
//! let capability = registry.resolve_one(&intent, &AppSymbolicName::new("contacts")).unwrap();
//! assert_eq!(capability.path(), Some("contact"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod enrich;
pub mod validate;

mod error;
mod interceptor;
mod manifest;
mod registry;

pub use error::{CapabilityError, CapabilityResult};
pub use interceptor::{
    CapabilityInterceptor, CapabilityInterceptorChain, ManifestInterceptor, RegistrationContext,
};
pub use manifest::{Application, Manifest};
pub use registry::{ApplicationInfo, CapabilityQuery, CapabilityRegistry, RegistrationReport};
