#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]

//! Trestle Kernel - startup orchestration and boot wiring.
//!
//! The kernel assembles the workbench: it creates the message bus, the
//! capability registry and the host route table, installs the interceptor
//! chains through startup initializers, registers the host and the
//! configured applications, and finally starts the intent broker.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trestle_kernel::{Workbench, WorkbenchShell};
//!
//! # async fn boot(shell: Arc<dyn WorkbenchShell>) -> trestle_kernel::KernelResult<()> {
//! let config = trestle_config::Config::load_default()?;
//! trestle_kernel::init_logging(&config)?;
//!
//! let workbench = Workbench::builder(shell).with_config(config).start().await?;
//! let answer = workbench
//!     .services()
//!     .open_message_box("Discard changes?", Default::default())
//!     .await;
//! println!("{answer:?}");
//! workbench.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod prelude;

/// Configuration to domain type conversion.
pub mod bridge;
/// Built-in startup initializers.
pub mod initializers;

mod error;
mod services;
mod startup;
mod workbench;

pub use error::{KernelError, KernelResult};
pub use services::{NotificationOptions, OpenOptions, SurfaceContent, WorkbenchServices};
pub use startup::{FnInitializer, Initializer, StartupOrchestrator, StartupPhase};
pub use trestle_surfaces::WorkbenchShell;
pub use workbench::{Workbench, WorkbenchBuilder};

/// Install the global `tracing` subscriber described by `[logging]`.
///
/// # Errors
///
/// Returns [`KernelError::Telemetry`] if the filter is invalid or a
/// subscriber is already installed.
pub fn init_logging(config: &trestle_config::Config) -> KernelResult<()> {
    trestle_telemetry::setup_logging(&bridge::log_config(&config.logging))?;
    Ok(())
}
