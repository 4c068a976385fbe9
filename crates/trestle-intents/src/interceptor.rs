//! Intent interceptors.
//!
//! Interceptors form an explicit ordered list. Each interceptor either
//! swallows the intent (returns without calling [`Next::handle`]) or hands
//! it on. The last [`Next`] invokes the chain's terminal, which forwards the
//! intent to the providing application.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::trace;

use crate::error::IntentResult;
use crate::message::IntentMessage;

/// Interceptor run for every dispatched intent.
#[async_trait]
pub trait IntentInterceptor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Handle the intent or pass it to `next`.
    ///
    /// Must not block until a surface closes: long-running work is spawned.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent cannot be handled.
    async fn intercept(&self, message: IntentMessage, next: Next<'_>) -> IntentResult<()>;
}

/// Final step of an interceptor chain.
pub type Terminal = dyn Fn(IntentMessage) -> IntentResult<()> + Send + Sync;

/// The rest of an interceptor chain.
pub struct Next<'a> {
    remaining: &'a [Arc<dyn IntentInterceptor>],
    terminal: &'a Terminal,
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.remaining.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Next<'a> {
    /// Start of a chain.
    #[must_use]
    pub fn new(interceptors: &'a [Arc<dyn IntentInterceptor>], terminal: &'a Terminal) -> Self {
        Self {
            remaining: interceptors,
            terminal,
        }
    }

    /// Hand the intent to the next interceptor, or to the terminal.
    ///
    /// # Errors
    ///
    /// Returns the error of the interceptor or terminal that handled it.
    pub async fn handle(self, message: IntentMessage) -> IntentResult<()> {
        match self.remaining.split_first() {
            Some((interceptor, rest)) => {
                trace!(
                    interceptor = interceptor.name(),
                    intent_type = %message.intent.intent_type,
                    "Intercepting intent"
                );
                let next = Next {
                    remaining: rest,
                    terminal: self.terminal,
                };
                interceptor.intercept(message, next).await
            },
            None => (self.terminal)(message),
        }
    }
}
