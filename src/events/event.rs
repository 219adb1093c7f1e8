//! # Lifecycle events emitted at task state transitions.
//!
//! The [`EventKind`] enum classifies the five lifecycle transitions; the
//! [`Event`] struct carries identity, timestamp, a source tag, and an
//! arbitrary key/value data payload built with `with_*` methods.
//!
//! ## Example
//! ```rust
//! use taskd::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task_id("a1b2")
//!     .with_error("boom")
//!     .with_duration_ms(12);
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.kind.as_str(), "task.failed");
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::tasks::Payload;

/// Source tag attached to every event this service emits.
pub const EVENT_SOURCE: &str = "taskd";

/// Classification of lifecycle events.
///
/// Serializes to the dotted wire names (`task.created`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    /// Task stored in `pending` state.
    ///
    /// Data: `task_id`, `task_type`, `is_async`.
    #[serde(rename = "task.created")]
    TaskCreated,

    /// Task claimed the pending→running transition.
    ///
    /// Data: `task_id`.
    #[serde(rename = "task.started")]
    TaskStarted,

    /// Task reached `completed`.
    ///
    /// Data: `task_id`, `duration_ms`, `result`.
    #[serde(rename = "task.completed")]
    TaskCompleted,

    /// Task reached `failed`.
    ///
    /// Data: `task_id`, `duration_ms`, `error`.
    #[serde(rename = "task.failed")]
    TaskFailed,

    /// Task reached `cancelled`.
    ///
    /// Data: `task_id`.
    #[serde(rename = "task.cancelled")]
    TaskCancelled,
}

impl EventKind {
    /// Returns the dotted wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TaskCreated => "task.created",
            EventKind::TaskStarted => "task.started",
            EventKind::TaskCompleted => "task.completed",
            EventKind::TaskFailed => "task.failed",
            EventKind::TaskCancelled => "task.cancelled",
        }
    }
}

/// One immutable lifecycle event, delivered to the configured sink.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Globally unique event id.
    pub id: String,
    /// Event classification (wire name under `type`).
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Wall-clock emission timestamp.
    pub timestamp: DateTime<Utc>,
    /// Which service emitted the event.
    pub source: &'static str,
    /// Arbitrary key/value payload; at minimum carries `task_id`.
    pub data: Payload,
}

impl Event {
    /// Creates a new event of the given kind with a fresh id and timestamp.
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            timestamp: Utc::now(),
            source: EVENT_SOURCE,
            data: Payload::new(),
        }
    }

    /// Attaches an arbitrary data entry.
    #[inline]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attaches the task id.
    #[inline]
    pub fn with_task_id(self, task_id: &str) -> Self {
        self.with_data("task_id", task_id)
    }

    /// Attaches a failure description.
    #[inline]
    pub fn with_error(self, error: &str) -> Self {
        self.with_data("error", error)
    }

    /// Attaches the run duration in milliseconds.
    #[inline]
    pub fn with_duration_ms(self, ms: u64) -> Self {
        self.with_data("duration_ms", ms)
    }

    /// Attaches the completed task's output under `result`.
    #[inline]
    pub fn with_result(self, output: &Payload) -> Self {
        self.with_data("result", Value::Object(output.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_populates_data() {
        let mut out = Payload::new();
        out.insert("result".into(), json!(4));

        let ev = Event::new(EventKind::TaskCompleted)
            .with_task_id("t-1")
            .with_duration_ms(150)
            .with_result(&out);

        assert_eq!(ev.data["task_id"], json!("t-1"));
        assert_eq!(ev.data["duration_ms"], json!(150));
        assert_eq!(ev.data["result"]["result"], json!(4));
        assert_eq!(ev.source, EVENT_SOURCE);
        assert!(!ev.id.is_empty());
    }

    #[test]
    fn serializes_with_dotted_type_names() {
        let ev = Event::new(EventKind::TaskCreated).with_task_id("t-2");
        let value = serde_json::to_value(&ev).unwrap();
        assert_eq!(value["type"], json!("task.created"));
        assert_eq!(value["source"], json!("taskd"));
        assert_eq!(value["data"]["task_id"], json!("t-2"));
    }

    #[test]
    fn kind_wire_names_match_serde() {
        for kind in [
            EventKind::TaskCreated,
            EventKind::TaskStarted,
            EventKind::TaskCompleted,
            EventKind::TaskFailed,
            EventKind::TaskCancelled,
        ] {
            let as_json = serde_json::to_value(kind).unwrap();
            assert_eq!(as_json, json!(kind.as_str()));
        }
    }
}
