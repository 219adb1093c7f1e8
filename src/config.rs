//! # YAML application configuration.
//!
//! [`Config`] carries the three sections the service needs at construction
//! time: HTTP bind address, event publisher selection, and task execution
//! limits. Unset fields fall back to defaults; zero sentinels for the task
//! limits are normalized to their defaults the same way absent values are.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PUBLISHER: &str = "noop";
const DEFAULT_MAX_CONCURRENT: usize = 10;
const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server section.
    pub server: ServerConfig,
    /// Event publisher section.
    pub events: EventsConfig,
    /// Task execution section.
    pub tasks: TasksConfig,
}

/// HTTP bind address.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Event sink selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// `noop` or `kafka`.
    pub publisher: String,
    /// Kafka transport settings, used only when `publisher = kafka`.
    pub kafka: KafkaConfig,
}

/// Kafka transport settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub topic: String,
}

/// Task execution limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Maximum simultaneously executing tasks.
    pub max_concurrent: usize,
    /// Per-run execution timeout in seconds; `0` disables.
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            publisher: DEFAULT_PUBLISHER.to_string(),
            kafka: KafkaConfig::default(),
        }
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl TasksConfig {
    /// Per-run timeout as an `Option` (`0` → no timeout).
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

impl Config {
    /// Reads and parses the YAML file at `path`, then normalizes sentinels.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.normalize();
        Ok(config)
    }

    /// The `host:port` string the HTTP server binds to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Empty strings and zero limits behave like absent fields.
    fn normalize(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = DEFAULT_HOST.to_string();
        }
        if self.server.port == 0 {
            self.server.port = DEFAULT_PORT;
        }
        if self.events.publisher.is_empty() {
            self.events.publisher = DEFAULT_PUBLISHER.to_string();
        }
        if self.tasks.max_concurrent == 0 {
            self.tasks.max_concurrent = DEFAULT_MAX_CONCURRENT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_full_config() {
        let file = write_config(
            r#"
server:
  host: 0.0.0.0
  port: 9090
events:
  publisher: kafka
  kafka:
    brokers:
      - localhost:9092
    topic: task-events
tasks:
  max_concurrent: 4
  timeout_seconds: 60
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.address(), "0.0.0.0:9090");
        assert_eq!(config.events.publisher, "kafka");
        assert_eq!(config.events.kafka.brokers, vec!["localhost:9092"]);
        assert_eq!(config.events.kafka.topic, "task-events");
        assert_eq!(config.tasks.max_concurrent, 4);
        assert_eq!(config.tasks.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn empty_config_gets_defaults() {
        let file = write_config("{}");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.address(), "localhost:8080");
        assert_eq!(config.events.publisher, "noop");
        assert_eq!(config.tasks.max_concurrent, 10);
        assert_eq!(config.tasks.timeout_seconds, 300);
    }

    #[test]
    fn zero_sentinels_are_normalized() {
        let file = write_config(
            r#"
server:
  port: 0
tasks:
  max_concurrent: 0
  timeout_seconds: 0
"#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.tasks.max_concurrent, 10);
        assert_eq!(config.tasks.timeout(), None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let file = write_config("server: [not, a, mapping]");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
