//! Error types used by the task runner core and its boundaries.
//!
//! This module defines three error enums:
//!
//! - [`TaskError`] — errors raised by the manager, registry, and executors.
//! - [`EventError`] — errors raised by event publishers (never fatal to the
//!   operation that triggered the publish).
//! - [`ConfigError`] — errors raised while loading or interpreting the
//!   configuration file.
//!
//! [`TaskError`] provides `as_label` for stable snake_case labels in
//! logs/metrics and `is_not_found` / `is_conflict` helpers for HTTP mapping.

use thiserror::Error;

/// # Errors produced by task operations.
///
/// Covers lookup failures, lifecycle conflicts, executor-level input
/// validation, and cancellation observed at a suspension point.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// No task exists with the given id.
    #[error("task not found: {id}")]
    TaskNotFound {
        /// The task id that failed to resolve.
        id: String,
    },

    /// No executor is registered for the given task kind.
    #[error("no executor registered for task kind: {kind}")]
    KindNotFound {
        /// The task kind that failed to resolve.
        kind: String,
    },

    /// Operation attempted on a task that already reached a terminal state.
    #[error("task {id} is already finished")]
    AlreadyFinished {
        /// The terminal task's id.
        id: String,
    },

    /// A second execution attempt lost the pending→running claim.
    #[error("task {id} is already running")]
    AlreadyRunning {
        /// The running task's id.
        id: String,
    },

    /// Executor-level input validation failure.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was missing or of the wrong type.
        reason: String,
    },

    /// Math executor: division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Math executor: operation name outside the supported set.
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation {
        /// The rejected operation name.
        operation: String,
    },

    /// Cancellation observed while waiting for admission or inside an executor.
    #[error("cancelled")]
    Cancelled,

    /// Executor failed with a domain error message.
    #[error("{message}")]
    ExecutionFailed {
        /// Human-readable failure description; becomes the task's `error` field.
        message: String,
    },
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskd::TaskError;
    ///
    /// let err = TaskError::DivisionByZero;
    /// assert_eq!(err.as_label(), "division_by_zero");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::TaskNotFound { .. } => "task_not_found",
            TaskError::KindNotFound { .. } => "kind_not_found",
            TaskError::AlreadyFinished { .. } => "already_finished",
            TaskError::AlreadyRunning { .. } => "already_running",
            TaskError::InvalidInput { .. } => "invalid_input",
            TaskError::DivisionByZero => "division_by_zero",
            TaskError::UnsupportedOperation { .. } => "unsupported_operation",
            TaskError::Cancelled => "cancelled",
            TaskError::ExecutionFailed { .. } => "execution_failed",
        }
    }

    /// True for lookup failures (unknown task id or task kind).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TaskError::TaskNotFound { .. } | TaskError::KindNotFound { .. }
        )
    }

    /// True for lifecycle conflicts (terminal task, lost running claim).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            TaskError::AlreadyFinished { .. } | TaskError::AlreadyRunning { .. }
        )
    }
}

/// # Errors produced by event publishers.
///
/// Always non-fatal to the core operation that triggered them: the manager
/// logs them and carries on.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EventError {
    /// Transport failure while publishing a single event.
    #[error("failed to publish event: {reason}")]
    Publish {
        /// Transport-level detail.
        reason: String,
    },

    /// Failure while closing the publisher during shutdown.
    #[error("failed to close publisher: {reason}")]
    Close {
        /// Transport-level detail.
        reason: String,
    },
}

/// # Errors produced while loading configuration.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid YAML for the expected schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// `events.publisher` names a publisher this build does not know.
    #[error("unsupported event publisher: {name}")]
    UnsupportedPublisher {
        /// The rejected publisher name.
        name: String,
    },

    /// A known publisher was selected with an unusable configuration.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong with the selected configuration.
        reason: String,
    },
}
