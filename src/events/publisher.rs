//! # Event sink capability and the built-in no-op publisher.
//!
//! [`Publish`] is the boundary contract the manager emits lifecycle events
//! through. Publishers own their transport; the core never retries or
//! buffers — a failed publish is logged by the caller and dropped.
//!
//! ## Rules
//! - `publish` must not block indefinitely; transports should apply their own
//!   timeouts.
//! - `close` is called once during shutdown, after the HTTP server drains.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::EventsConfig;
use crate::error::{ConfigError, EventError};
use crate::events::Event;

/// Event sink: publish one event, close on shutdown.
#[async_trait]
pub trait Publish: Send + Sync + 'static {
    /// Delivers one event to the sink.
    async fn publish(&self, event: &Event) -> Result<(), EventError>;

    /// Releases transport resources. Default: nothing to release.
    async fn close(&self) -> Result<(), EventError> {
        Ok(())
    }
}

/// No-op publisher: logs each event at debug level and drops it.
#[derive(Debug, Default)]
pub struct NoopPublisher;

impl NoopPublisher {
    /// Constructs a new [`NoopPublisher`].
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Publish for NoopPublisher {
    async fn publish(&self, event: &Event) -> Result<(), EventError> {
        let payload = serde_json::to_string(event).map_err(|e| EventError::Publish {
            reason: format!("failed to serialize event: {e}"),
        })?;
        debug!(kind = event.kind.as_str(), event = %payload, "event published (noop)");
        Ok(())
    }
}

/// Builds the publisher selected by `events.publisher`.
///
/// Supported names: `noop` (or empty), and `kafka` when the crate is built
/// with the `kafka` feature.
pub fn from_config(cfg: &EventsConfig) -> Result<Arc<dyn Publish>, ConfigError> {
    match cfg.publisher.as_str() {
        "noop" | "" => Ok(Arc::new(NoopPublisher::new())),
        #[cfg(feature = "kafka")]
        "kafka" => Ok(Arc::new(super::kafka::KafkaPublisher::new(&cfg.kafka)?)),
        #[cfg(not(feature = "kafka"))]
        "kafka" => Err(ConfigError::Invalid {
            reason: "event publisher `kafka` requires building with the `kafka` feature".into(),
        }),
        other => Err(ConfigError::UnsupportedPublisher { name: other.into() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KafkaConfig;
    use crate::events::EventKind;

    fn events_config(publisher: &str) -> EventsConfig {
        EventsConfig {
            publisher: publisher.into(),
            kafka: KafkaConfig::default(),
        }
    }

    #[tokio::test]
    async fn noop_publisher_accepts_events() {
        let publisher = NoopPublisher::new();
        let ev = Event::new(EventKind::TaskCreated).with_task_id("t-1");
        publisher.publish(&ev).await.unwrap();
        publisher.close().await.unwrap();
    }

    #[test]
    fn selects_noop_by_default() {
        assert!(from_config(&events_config("noop")).is_ok());
        assert!(from_config(&events_config("")).is_ok());
    }

    #[test]
    fn rejects_unknown_publisher() {
        let err = from_config(&events_config("rabbitmq")).err().unwrap();
        assert!(matches!(
            err,
            ConfigError::UnsupportedPublisher { ref name } if name == "rabbitmq"
        ));
    }

    #[cfg(not(feature = "kafka"))]
    #[test]
    fn kafka_requires_feature() {
        let err = from_config(&events_config("kafka")).err().unwrap();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
