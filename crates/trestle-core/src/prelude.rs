//! Prelude module - commonly used types for convenient import.
//!
//! Use `use trestle_core::prelude::*;` to import all essential types.

// Data model
pub use crate::{
    AppSymbolicName, Capability, CapabilityMetadata, Intent, Intention, ParamDescriptor, Params,
    SurfaceKind,
};

// Qualifiers
pub use crate::{Qualifier, QualifierPattern, ValuePattern};

// Utilities
pub use crate::{stable_capability_id, stable_id, substitute, substitute_opt};

// Errors
pub use crate::{
    DefinitionError, NavigationError, ResolutionError, TransportTeardownError, WorkbenchError,
    WorkbenchResult,
};
