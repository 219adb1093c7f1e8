//! # Task manager: storage, admission, execution, events.
//!
//! The manager owns the in-memory task store and a counting semaphore that
//! bounds simultaneous executions across the whole service. Every admitted
//! run goes through the same sequence:
//!
//! ```text
//! claim pending→running ──► publish task.started
//!         │
//!         ├─► resolve executor ── fail → failed + task.failed
//!         │
//!         ├─► invoke executor (cancellation/timeout aware)
//!         │       ├─ Ok  ──► completed + task.completed
//!         │       └─ Err ──► failed + task.failed
//! ```
//!
//! ## Rules
//! - The pending→running claim is a compare-and-swap under the task's write
//!   lock: of two concurrent execution attempts exactly one runs, the loser
//!   gets `AlreadyRunning`/`AlreadyFinished`.
//! - Terminal transitions are CAS too: the first wins, later ones are no-ops
//!   and publish nothing. `cancel` never interrupts an in-flight executor;
//!   it only claims the terminal state first.
//! - Cancellation is observed at safe points: the synchronous admission wait
//!   and inside cancellation-aware executors.
//! - Event publishing is best-effort: failures are logged, never propagated.
//! - Tasks are never evicted; the store grows for the life of the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, Semaphore};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::ExecutorRegistry;
use crate::error::TaskError;
use crate::events::{Event, EventKind, Publish};
use crate::tasks::{Payload, Task, TaskStatus};

type TaskHandle = Arc<RwLock<Task>>;

/// Orchestrates task creation, bounded execution, cancellation, and event
/// emission.
pub struct TaskManager {
    registry: Arc<ExecutorRegistry>,
    publisher: Arc<dyn Publish>,
    tasks: RwLock<HashMap<String, TaskHandle>>,
    semaphore: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl TaskManager {
    /// Creates a manager with the given admission bound.
    ///
    /// `max_concurrent` is clamped to a minimum of 1.
    pub fn new(
        registry: Arc<ExecutorRegistry>,
        publisher: Arc<dyn Publish>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            registry,
            publisher,
            tasks: RwLock::new(HashMap::new()),
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout: None,
        }
    }

    /// Applies a per-run execution timeout. `Duration::ZERO` disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (timeout > Duration::ZERO).then_some(timeout);
        self
    }

    /// Creates a task in `pending` state.
    ///
    /// Fails with [`TaskError::KindNotFound`] when no executor serves `kind`;
    /// the store is left untouched in that case.
    pub async fn create_task(
        &self,
        kind: &str,
        input: Payload,
        is_async: bool,
    ) -> Result<Task, TaskError> {
        self.registry.resolve(kind).await?;

        let task = Task::new(kind, input, is_async);
        let snapshot = task.clone();
        {
            let mut tasks = self.tasks.write().await;
            tasks.insert(task.id.clone(), Arc::new(RwLock::new(task)));
        }

        self.emit(
            Event::new(EventKind::TaskCreated)
                .with_task_id(&snapshot.id)
                .with_data("task_type", kind)
                .with_data("is_async", is_async),
        )
        .await;

        Ok(snapshot)
    }

    /// Returns a point-in-time snapshot of one task.
    pub async fn get_task(&self, id: &str) -> Result<Task, TaskError> {
        let handle = self.handle(id).await?;
        let task = handle.read().await;
        Ok(task.clone())
    }

    /// Returns a point-in-time snapshot of every stored task, in no
    /// particular order.
    pub async fn list_tasks(&self) -> Vec<Task> {
        let handles: Vec<TaskHandle> = {
            let tasks = self.tasks.read().await;
            tasks.values().cloned().collect()
        };

        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in handles {
            snapshots.push(handle.read().await.clone());
        }
        snapshots
    }

    /// Executes a task synchronously: waits for an admission slot (the wait
    /// aborts with [`TaskError::Cancelled`] if `ctx` fires first), then runs
    /// the execution sequence to completion before returning.
    pub async fn execute(&self, id: &str, ctx: &CancellationToken) -> Result<(), TaskError> {
        let handle = self.handle(id).await?;
        Self::ensure_not_finished(&handle).await?;

        let permit_future = self.semaphore.clone().acquire_owned();
        tokio::pin!(permit_future);

        let _permit = tokio::select! {
            res = &mut permit_future => res.map_err(|_| TaskError::Cancelled)?,
            _ = ctx.cancelled() => return Err(TaskError::Cancelled),
        };

        // Child token: a timeout-triggered cancel must not touch the caller's.
        self.run(handle, ctx.child_token()).await
    }

    /// Schedules a detached execution and returns immediately.
    ///
    /// Existence and terminal checks happen synchronously; the admission
    /// wait, if the pool is saturated, happens on the spawned path. The run
    /// uses its own token, deliberately decoupled from the caller's lifetime,
    /// and its outcome is observable only through the task's fields.
    pub async fn execute_detached(self: Arc<Self>, id: &str) -> Result<(), TaskError> {
        let handle = self.handle(id).await?;
        Self::ensure_not_finished(&handle).await?;

        let manager = self;
        tokio::spawn(async move {
            let permit = match manager.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_closed) => return,
            };
            let _permit = permit;

            if let Err(e) = manager.run(handle, CancellationToken::new()).await {
                debug!(error = %e, label = e.as_label(), "detached run finished with error");
            }
        });

        Ok(())
    }

    /// Transitions a task to `cancelled` without signalling an in-flight
    /// executor. If the run is mid-flight its later terminal CAS loses and
    /// becomes a no-op.
    pub async fn cancel(&self, id: &str) -> Result<(), TaskError> {
        let handle = self.handle(id).await?;

        let event = {
            let mut task = handle.write().await;
            if !task.cancel() {
                return Err(TaskError::AlreadyFinished {
                    id: id.to_string(),
                });
            }
            let mut event = Event::new(EventKind::TaskCancelled).with_task_id(&task.id);
            if let Some(ms) = task.duration_ms {
                event = event.with_duration_ms(ms);
            }
            event
        };

        self.emit(event).await;
        Ok(())
    }

    // ---------------------------
    // Execution sequence
    // ---------------------------

    /// Runs one admitted execution attempt against the task.
    async fn run(&self, handle: TaskHandle, ctx: CancellationToken) -> Result<(), TaskError> {
        let (id, kind, input) = {
            let mut task = handle.write().await;
            if !task.start() {
                let id = task.id.clone();
                return Err(if task.status == TaskStatus::Running {
                    TaskError::AlreadyRunning { id }
                } else {
                    TaskError::AlreadyFinished { id }
                });
            }
            (task.id.clone(), task.kind.clone(), task.input.clone())
        };

        self.emit(Event::new(EventKind::TaskStarted).with_task_id(&id))
            .await;

        let executor = match self.registry.resolve(&kind).await {
            Ok(executor) => executor,
            Err(e) => return self.finish_failed(&handle, &id, e).await,
        };

        let result = match self.timeout {
            Some(limit) => match time::timeout(limit, executor.execute(&input, ctx.clone())).await
            {
                Ok(result) => result,
                Err(_elapsed) => {
                    ctx.cancel();
                    Err(TaskError::ExecutionFailed {
                        message: format!("execution timed out after {limit:?}"),
                    })
                }
            },
            None => executor.execute(&input, ctx).await,
        };

        match result {
            Ok(output) => {
                let event = {
                    let mut task = handle.write().await;
                    if !task.complete(output) {
                        // Lost the terminal CAS (cancelled mid-run); nothing to publish.
                        return Ok(());
                    }
                    let mut event = Event::new(EventKind::TaskCompleted).with_task_id(&id);
                    if let Some(ms) = task.duration_ms {
                        event = event.with_duration_ms(ms);
                    }
                    if let Some(output) = &task.output {
                        event = event.with_result(output);
                    }
                    event
                };
                self.emit(event).await;
                Ok(())
            }
            Err(e) => self.finish_failed(&handle, &id, e).await,
        }
    }

    /// Applies the failed CAS, publishes `task.failed` when it wins, and
    /// propagates the error to the caller either way.
    async fn finish_failed(
        &self,
        handle: &TaskHandle,
        id: &str,
        error: TaskError,
    ) -> Result<(), TaskError> {
        let event = {
            let mut task = handle.write().await;
            if !task.fail(error.to_string()) {
                None
            } else {
                let mut event = Event::new(EventKind::TaskFailed)
                    .with_task_id(id)
                    .with_error(&error.to_string());
                if let Some(ms) = task.duration_ms {
                    event = event.with_duration_ms(ms);
                }
                Some(event)
            }
        };

        if let Some(event) = event {
            self.emit(event).await;
        }
        Err(error)
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    async fn handle(&self, id: &str) -> Result<TaskHandle, TaskError> {
        let tasks = self.tasks.read().await;
        tasks
            .get(id)
            .cloned()
            .ok_or_else(|| TaskError::TaskNotFound { id: id.to_string() })
    }

    async fn ensure_not_finished(handle: &TaskHandle) -> Result<(), TaskError> {
        let task = handle.read().await;
        if task.is_finished() {
            return Err(TaskError::AlreadyFinished {
                id: task.id.clone(),
            });
        }
        Ok(())
    }

    /// Best-effort event delivery: publish failures are logged, not raised.
    async fn emit(&self, event: Event) {
        if let Err(e) = self.publisher.publish(&event).await {
            warn!(kind = event.kind.as_str(), error = %e, "failed to publish event");
        }
    }
}
