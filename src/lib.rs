//! # taskd
//!
//! **taskd** is an HTTP-exposed task runner: clients submit named task
//! invocations, the service executes them inline or in the background under
//! a bounded concurrency budget, tracks lifecycle status, and emits
//! lifecycle events to a pluggable sink.
//!
//! ## Architecture
//! ```text
//!   HTTP (axum) ──► TaskManager ──► ExecutorRegistry ──► Execute impls
//!                       │                                 (echo, sleep,
//!                       │                                  error, math)
//!                       ├─ task store (in-memory, ephemeral)
//!                       ├─ admission semaphore (max_concurrent)
//!                       └─ lifecycle events ──► Publish sink (noop | kafka)
//! ```
//!
//! ### Lifecycle
//! ```text
//! create ──► pending ──► running ──► completed | failed | cancelled
//!
//! execute (sync):   wait for slot (cancellable) → claim pending→running
//!                   → run executor → terminal CAS → events
//! execute (async):  checks up front, then the same sequence detached from
//!                   the caller, with its own lifetime
//! cancel:           claims the terminal state; never interrupts a running
//!                   executor — a late executor result loses the CAS
//! ```
//!
//! ## Features
//! | Area          | Description                                      | Key types                                 |
//! |---------------|--------------------------------------------------|-------------------------------------------|
//! | **Tasks**     | State machine with CAS transitions.              | [`Task`], [`TaskStatus`]                  |
//! | **Executors** | Pluggable per-kind execution capability.         | [`Execute`], [`ExecutorRegistry`]         |
//! | **Manager**   | Storage, admission, execution, cancellation.     | [`TaskManager`]                           |
//! | **Events**    | Lifecycle events to a pluggable sink.            | [`Event`], [`EventKind`], [`Publish`]     |
//! | **Config**    | YAML file: server, events, task limits.          | [`Config`]                                |
//! | **Errors**    | Typed errors for the core and its boundaries.    | [`TaskError`], [`EventError`]             |
//!
//! ## Optional features
//! - `kafka`: Kafka event publishing via `rdkafka`.

mod config;
mod core;
mod error;
mod events;
mod executors;
mod http;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{ExecutorRegistry, TaskManager};
pub use config::{Config, EventsConfig, KafkaConfig, ServerConfig, TasksConfig};
pub use error::{ConfigError, EventError, TaskError};
pub use events::{from_config as publisher_from_config, Event, EventKind, NoopPublisher, Publish};
pub use executors::{
    register_defaults, EchoExecutor, ErrorExecutor, Execute, MathExecutor, SleepExecutor,
};
pub use http::{router, serve, AppState};
pub use tasks::{Payload, Task, TaskStatus};

#[cfg(feature = "kafka")]
pub use events::KafkaPublisher;
