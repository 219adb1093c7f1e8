//! # Executor registry: task-kind name → executor.
//!
//! Read-heavy lookup table guarded by a [`tokio::sync::RwLock`]: concurrent
//! resolutions never block each other, registration is exclusive.
//!
//! ## Rules
//! - `register` is last-write-wins; re-registering a kind replaces the
//!   previous executor silently.
//! - `resolve` hands out a cloned `Arc`, so lookups never hold the lock
//!   across an execution.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::TaskError;
use crate::executors::Execute;

/// Mapping from task-kind name to the executor serving it.
#[derive(Default)]
pub struct ExecutorRegistry {
    executors: RwLock<HashMap<String, Arc<dyn Execute>>>,
}

impl ExecutorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            executors: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces the executor for `kind`.
    pub async fn register(&self, kind: impl Into<String>, executor: Arc<dyn Execute>) {
        let mut executors = self.executors.write().await;
        executors.insert(kind.into(), executor);
    }

    /// Returns the executor registered for `kind`.
    pub async fn resolve(&self, kind: &str) -> Result<Arc<dyn Execute>, TaskError> {
        let executors = self.executors.read().await;
        executors
            .get(kind)
            .cloned()
            .ok_or_else(|| TaskError::KindNotFound {
                kind: kind.to_string(),
            })
    }

    /// Returns the sorted list of registered kind names.
    pub async fn kinds(&self) -> Vec<String> {
        let executors = self.executors.read().await;
        let mut kinds: Vec<String> = executors.keys().cloned().collect();
        kinds.sort_unstable();
        kinds
    }
}
