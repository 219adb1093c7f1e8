//! Kafka event publisher (feature `kafka`).
//!
//! Events are serialized to JSON and produced to a single topic with the
//! event id as the message key.

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::debug;

use crate::config::KafkaConfig;
use crate::error::{ConfigError, EventError};
use crate::events::{Event, Publish};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes lifecycle events to a Kafka topic.
pub struct KafkaPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaPublisher {
    /// Creates a producer for the configured brokers and topic.
    pub fn new(cfg: &KafkaConfig) -> Result<Self, ConfigError> {
        if cfg.brokers.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "kafka brokers not configured".into(),
            });
        }
        if cfg.topic.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "kafka topic not configured".into(),
            });
        }

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", cfg.brokers.join(","))
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| ConfigError::Invalid {
                reason: format!("failed to create kafka producer: {e}"),
            })?;

        Ok(Self {
            producer,
            topic: cfg.topic.clone(),
        })
    }
}

#[async_trait]
impl Publish for KafkaPublisher {
    async fn publish(&self, event: &Event) -> Result<(), EventError> {
        let payload = serde_json::to_string(event).map_err(|e| EventError::Publish {
            reason: format!("failed to serialize event: {e}"),
        })?;

        let record = FutureRecord::to(&self.topic).key(&event.id).payload(&payload);

        self.producer
            .send(record, Timeout::After(DELIVERY_TIMEOUT))
            .await
            .map_err(|(e, _msg)| EventError::Publish {
                reason: format!("failed to write message to kafka: {e}"),
            })?;

        debug!(event_id = %event.id, topic = %self.topic, "event published to kafka");
        Ok(())
    }

    async fn close(&self) -> Result<(), EventError> {
        self.producer
            .flush(Timeout::After(DELIVERY_TIMEOUT))
            .map_err(|e| EventError::Close {
                reason: format!("failed to flush kafka producer: {e}"),
            })
    }
}
