//! Startup orchestration.
//!
//! Initializers are registered against one of two phases. All
//! [`StartupPhase::PreStartup`] initializers complete, including their own
//! asynchronous work, before any [`StartupPhase::PostStartup`] initializer
//! starts. Initializers of the same phase run concurrently and in no
//! particular order.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::error::{KernelError, KernelResult};

/// Phase an initializer runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StartupPhase {
    /// Runs before the platform starts.
    PreStartup,
    /// Runs after every pre-startup initializer has completed.
    #[default]
    PostStartup,
}

impl StartupPhase {
    /// Phases in execution order.
    pub const ALL: [Self; 2] = [Self::PreStartup, Self::PostStartup];
}

impl fmt::Display for StartupPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreStartup => write!(f, "pre-startup"),
            Self::PostStartup => write!(f, "post-startup"),
        }
    }
}

/// Work performed once while the workbench boots.
#[async_trait]
pub trait Initializer: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Run the initializer.
    async fn initialize(&self) -> KernelResult<()>;
}

/// Initializer backed by a closure returning a future.
pub struct FnInitializer<F> {
    name: String,
    f: F,
}

impl<F> FnInitializer<F> {
    /// Wrap a closure.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnInitializer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInitializer")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> Initializer for FnInitializer<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = KernelResult<()>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&self) -> KernelResult<()> {
        (self.f)().await
    }
}

struct Registered {
    phase: StartupPhase,
    initializer: Arc<dyn Initializer>,
}

/// Runs initializers phase by phase.
#[derive(Default)]
pub struct StartupOrchestrator {
    initializers: Vec<Registered>,
    timeout: Option<Duration>,
}

impl fmt::Debug for StartupOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartupOrchestrator")
            .field("pre_startup", &self.names(StartupPhase::PreStartup))
            .field("post_startup", &self.names(StartupPhase::PostStartup))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StartupOrchestrator {
    /// Create an orchestrator without a phase timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail a phase that does not complete within `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register an initializer in the default phase, [`StartupPhase::PostStartup`].
    pub fn register(&mut self, initializer: Arc<dyn Initializer>) {
        self.register_in(StartupPhase::default(), initializer);
    }

    /// Register an initializer in `phase`.
    pub fn register_in(&mut self, phase: StartupPhase, initializer: Arc<dyn Initializer>) {
        debug!(initializer = initializer.name(), %phase, "Registered initializer");
        self.initializers.push(Registered { phase, initializer });
    }

    /// Register a closure in `phase`.
    pub fn register_fn<F, Fut>(&mut self, phase: StartupPhase, name: impl Into<String>, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = KernelResult<()>> + Send + 'static,
    {
        self.register_in(phase, Arc::new(FnInitializer::new(name, f)));
    }

    /// Names of the initializers registered in `phase`.
    #[must_use]
    pub fn names(&self, phase: StartupPhase) -> Vec<String> {
        self.initializers
            .iter()
            .filter(|r| r.phase == phase)
            .map(|r| r.initializer.name().to_string())
            .collect()
    }

    /// Run every phase in order.
    ///
    /// # Errors
    ///
    /// Returns the first initializer failure, or [`KernelError::StartupTimeout`]
    /// if a phase exceeds the timeout. Later phases do not run.
    pub async fn run(&self) -> KernelResult<()> {
        for phase in StartupPhase::ALL {
            self.run_phase(phase).await?;
        }
        Ok(())
    }

    async fn run_phase(&self, phase: StartupPhase) -> KernelResult<()> {
        let pending: Vec<_> = self
            .initializers
            .iter()
            .filter(|r| r.phase == phase)
            .map(|r| {
                let initializer = Arc::clone(&r.initializer);
                async move {
                    debug!(initializer = initializer.name(), %phase, "Running initializer");
                    initializer.initialize().await.inspect_err(|e| {
                        error!(
                            initializer = initializer.name(),
                            %phase,
                            error = %e,
                            "Initializer failed"
                        );
                    })
                }
            })
            .collect();

        if pending.is_empty() {
            return Ok(());
        }

        let count = pending.len();
        let started = Instant::now();
        let all = futures::future::try_join_all(pending);
        let outcome = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, all).await.map_err(|_| {
                KernelError::StartupTimeout {
                    phase,
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }
            })?,
            None => all.await,
        };
        outcome?;

        info!(
            %phase,
            count,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Startup phase complete"
        );
        Ok(())
    }
}
