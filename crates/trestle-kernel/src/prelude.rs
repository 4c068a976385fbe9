//! Prelude module - commonly used types for convenient import.
//!
//! Use `use trestle_kernel::prelude::*;` to import all essential types.

// Boot
pub use crate::{Workbench, WorkbenchBuilder, WorkbenchShell};

// Startup
pub use crate::{FnInitializer, Initializer, StartupOrchestrator, StartupPhase};

// Open entry points
pub use crate::{NotificationOptions, OpenOptions, SurfaceContent, WorkbenchServices};

// Errors
pub use crate::{KernelError, KernelResult};
