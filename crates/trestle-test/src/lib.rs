//! Trestle Test - Shared test utilities for the workbench.
//!
//! This crate provides a recording [`MockShell`] and fixtures that can be
//! used across trestle crates as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! trestle-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_dialog_opens() {
//!     let shell = MockShell::new();
//!     // ... open a dialog through a launcher built on `shell` ...
//!     let handles = shell.wait_for_presented(1).await;
//!     handles[0].close(Some("ok".into()));
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

/// Install a test-friendly `tracing` subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
