//! Lifecycle events and the pluggable event sink.

mod event;
mod publisher;

#[cfg(feature = "kafka")]
mod kafka;

pub use event::{Event, EventKind, EVENT_SOURCE};
pub use publisher::{from_config, NoopPublisher, Publish};

#[cfg(feature = "kafka")]
pub use kafka::KafkaPublisher;
