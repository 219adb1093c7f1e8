//! # Executor capability and the built-in executor set.
//!
//! An [`Execute`] implementation knows how to run one or more task kinds: it
//! receives the task's input payload and a [`CancellationToken`], and either
//! returns an output payload or a [`TaskError`]. Executors never touch task
//! status or timestamps — that is the manager's job.
//!
//! Built-ins: `echo`, `sleep`, `error`, `math`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::ExecutorRegistry;
use crate::error::TaskError;
use crate::tasks::Payload;

mod echo;
mod fail;
mod math;
mod sleep;

pub use echo::EchoExecutor;
pub use fail::ErrorExecutor;
pub use math::MathExecutor;
pub use sleep::SleepExecutor;

/// # Polymorphic task execution capability.
///
/// Implementations should check the token at suspension points and return
/// [`TaskError::Cancelled`] promptly when it fires; quick executors may
/// ignore it.
#[async_trait]
pub trait Execute: Send + Sync + 'static {
    /// Returns the task kind names this executor serves.
    fn kinds(&self) -> Vec<&'static str>;

    /// Runs one attempt against the given input.
    async fn execute(&self, input: &Payload, ctx: CancellationToken)
        -> Result<Payload, TaskError>;
}

/// Registers the default executor set (`echo`, `sleep`, `error`, `math`)
/// under every kind each executor reports.
pub async fn register_defaults(registry: &ExecutorRegistry) {
    let executors: Vec<Arc<dyn Execute>> = vec![
        Arc::new(EchoExecutor),
        Arc::new(SleepExecutor),
        Arc::new(ErrorExecutor),
        Arc::new(MathExecutor),
    ];

    for executor in executors {
        for kind in executor.kinds() {
            registry.register(kind, executor.clone()).await;
        }
    }
}
