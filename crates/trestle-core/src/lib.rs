//! Trestle Core - Foundation types for the Trestle workbench.
//!
//! This crate provides:
//! - The capability/intent data model shared by every other crate
//! - Typed qualifier matching (exact, wildcard value, optional value, wildcard key)
//! - The named-parameter substitutor used by every surface container
//! - The stable identity hasher that assigns reload-stable capability ids
//! - The error taxonomy (definition, resolution, navigation, transport teardown)
//!
//! # Example
//!
//! ```rust
//! use trestle_core::{AppSymbolicName, Capability, Qualifier, SurfaceKind, stable_capability_id};
//!
//! let app = AppSymbolicName::new("contacts");
//! let capability = Capability::new(SurfaceKind::Dialog.type_name())
//!     .with_qualifier(Qualifier::new().with("component", "contact"))
//!     .with_property("path", "contact/:id")
//!     .declared_by(app.clone());
//!
//! let id = stable_capability_id(&capability);
//! assert_eq!(id, stable_capability_id(&capability));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod identity;
pub mod qualifier;
pub mod substitute;
pub mod types;

pub use error::{
    DefinitionError, NavigationError, ResolutionError, TransportTeardownError, WorkbenchError,
    WorkbenchResult,
};
pub use identity::{stable_capability_id, stable_id};
pub use qualifier::{Qualifier, QualifierPattern, ValuePattern};
pub use substitute::{substitute, substitute_opt};
pub use types::{
    AppSymbolicName, Capability, CapabilityMetadata, Intent, Intention, ParamDescriptor, Params,
    SurfaceKind,
};
