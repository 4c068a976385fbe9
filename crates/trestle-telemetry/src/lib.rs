//! Trestle Telemetry - Logging and request context for the Trestle workbench.
//!
//! This crate provides:
//! - [`LogConfig`] and [`setup_logging`]: `tracing` subscriber setup with
//!   pretty, compact, JSON and full formats to stdout, stderr or rolling files
//! - [`RequestContext`]: correlation ids and spans for intents and sessions
//!
//! # Example
//!
//! ```rust,no_run
//! use trestle_telemetry::{LogConfig, LogFormat, RequestContext, setup_logging};
//!
//! # fn main() -> Result<(), trestle_telemetry::TelemetryError> {
//! setup_logging(
//!     &LogConfig::new("info")
//!         .with_format(LogFormat::Compact)
//!         .with_directive("trestle_surfaces=debug"),
//! )?;
//!
//! let ctx = RequestContext::new("intent-broker").with_app("mail");
//! let _guard = ctx.span().entered();
//! tracing::info!("Dispatching intent");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::RequestContext;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
