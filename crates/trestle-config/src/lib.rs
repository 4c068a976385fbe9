#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Workbench configuration for Trestle.
//!
//! A single [`Config`] describes the host application, the applications
//! registered at boot, startup timeouts, notification durations, desktop
//! pinning, logging and the message bus.
//!
//! # Usage
//!
//! ```rust,no_run
//! use trestle_config::Config;
//!
//! let config = Config::load(Some(std::path::Path::new("trestle.toml"))).unwrap();
//! println!("Host application: {}", config.workbench.host_app);
//! ```
//!
//! # Precedence
//!
//! From highest to lowest priority:
//!
//! 1. `TRESTLE_LOG_LEVEL` and `TRESTLE_HOST_APP`
//! 2. The config file, when present
//! 3. Embedded defaults (`defaults.toml` compiled into the binary)
//!
//! This crate does not depend on other trestle crates. Manifest entries and
//! pin rules are converted to domain types when the workbench boots.

/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// Load configuration from defaults, an optional file and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is malformed or the final
    /// configuration fails validation.
    pub fn load(path: Option<&std::path::Path>) -> ConfigResult<Self> {
        loader::load(path)
    }

    /// Load configuration from the default user config location.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_default() -> ConfigResult<Self> {
        loader::load(loader::default_path().as_deref())
    }
}
