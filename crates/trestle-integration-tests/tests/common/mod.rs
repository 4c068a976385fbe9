//! Shared harness for integration tests.

use std::sync::Arc;

use trestle_capabilities::{Application, Manifest};
use trestle_config::Config;
use trestle_kernel::{Workbench, WorkbenchServices};
use trestle_test::{MockShell, init_test_logging};

/// A booted workbench presenting through a [`MockShell`].
#[allow(dead_code)]
pub struct WorkbenchHarness {
    /// The running workbench.
    pub workbench: Workbench,
    /// The shell surfaces are presented through.
    pub shell: MockShell,
}

#[allow(dead_code)]
impl WorkbenchHarness {
    /// Boot with default configuration and the given applications.
    pub async fn start(applications: Vec<Application>) -> Self {
        Self::start_with(MockShell::new(), Config::default(), Manifest::new(), applications).await
    }

    /// Boot with full control over shell, config and host manifest.
    pub async fn start_with(
        shell: MockShell,
        config: Config,
        host_manifest: Manifest,
        applications: Vec<Application>,
    ) -> Self {
        init_test_logging();
        let builder = applications.into_iter().fold(
            Workbench::builder(Arc::new(shell.clone()))
                .with_config(config)
                .with_host_manifest(host_manifest),
            trestle_kernel::WorkbenchBuilder::with_application,
        );
        let workbench = builder.start().await.unwrap();
        Self { workbench, shell }
    }

    /// Open entry points acting as the host.
    pub fn services(&self) -> WorkbenchServices {
        self.workbench.services()
    }

    /// Stop the workbench.
    pub async fn shutdown(self) {
        self.workbench.shutdown().await;
    }
}
