//! # Task entity and its state machine.
//!
//! A [`Task`] is the state-bearing record for one execution request. Its
//! status moves `pending → running → {completed | failed | cancelled}` and
//! never leaves a terminal state.
//!
//! ## Rules
//! - Transition methods are compare-and-swap style: they fire only from the
//!   correct predecessor state and return whether they applied. The first
//!   terminal transition wins; later attempts are no-ops.
//! - `output` and `error` are mutually exclusive.
//! - `duration_ms` is set at the terminal transition when the task had
//!   started, and is never negative (clamped at zero).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Dynamic key/value payload used for task input and output.
///
/// Values are `serde_json::Value`, so executors can pattern-match on
/// strings, numbers, booleans, nested maps, and sequences.
pub type Payload = Map<String, Value>;

/// Lifecycle status of a [`Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Created, not yet admitted for execution.
    Pending,
    /// Claimed by exactly one execution sequence.
    Running,
    /// Terminal: executor succeeded, `output` is set.
    Completed,
    /// Terminal: executor or resolution failed, `error` is set.
    Failed,
    /// Terminal: cancelled before or during execution.
    Cancelled,
}

impl TaskStatus {
    /// True for `completed`, `failed`, and `cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    /// Returns the wire representation (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

/// One task: identity, payloads, status, and lifecycle timestamps.
///
/// Serialized with snake_case field names; optional fields are omitted when
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Globally unique id, assigned at creation.
    pub id: String,
    /// Task kind name; must resolve to a registered executor at creation.
    #[serde(rename = "type")]
    pub kind: String,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Caller-supplied input, immutable after creation.
    pub input: Payload,
    /// Executor output; present only on successful completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Payload>,
    /// Failure description; present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set at construction.
    pub created_at: DateTime<Utc>,
    /// Set on the transition to `running`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Set on the transition to any terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Elapsed milliseconds between `started_at` and `completed_at`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Caller-declared hint recorded at creation; advisory only.
    pub is_async: bool,
}

impl Task {
    /// Creates a new task in `pending` state with a fresh UUID.
    pub fn new(kind: impl Into<String>, input: Payload, is_async: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: kind.into(),
            status: TaskStatus::Pending,
            input,
            output: None,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            duration_ms: None,
            is_async,
        }
    }

    /// True once the task reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Claims the task for execution: `pending → running`.
    ///
    /// Returns `false` if the task is not pending (claim lost or already
    /// terminal); the caller must not execute in that case.
    pub fn start(&mut self) -> bool {
        if self.status != TaskStatus::Pending {
            return false;
        }
        self.status = TaskStatus::Running;
        self.started_at = Some(Utc::now());
        true
    }

    /// Terminal transition `running → completed`, attaching the output.
    ///
    /// Returns `false` if the task is not running; the output is dropped.
    pub fn complete(&mut self, output: Payload) -> bool {
        if self.status != TaskStatus::Running {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.output = Some(output);
        self.finish();
        true
    }

    /// Terminal transition `running → failed`, recording the error.
    ///
    /// Returns `false` if the task is not running.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if self.status != TaskStatus::Running {
            return false;
        }
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.finish();
        true
    }

    /// Terminal transition `pending|running → cancelled`.
    ///
    /// Returns `false` if the task is already terminal. A task cancelled
    /// before it ever started has no `duration_ms`.
    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Cancelled;
        self.finish();
        true
    }

    /// Stamps `completed_at` and computes `duration_ms` when started.
    fn finish(&mut self) {
        let now = Utc::now();
        self.completed_at = Some(now);
        if let Some(started) = self.started_at {
            self.duration_ms = Some((now - started).num_milliseconds().max(0) as u64);
        }
    }
}
