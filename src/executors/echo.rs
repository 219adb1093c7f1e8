//! Echo executor: copies the input back as output.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::Execute;
use crate::error::TaskError;
use crate::tasks::Payload;

/// Echoes the entire input under `output.echo`.
///
/// Sleeps ~100ms first to model non-trivial work; timing-sensitive tests
/// rely on this delay.
pub struct EchoExecutor;

const WORK_DELAY: Duration = Duration::from_millis(100);

#[async_trait]
impl Execute for EchoExecutor {
    fn kinds(&self) -> Vec<&'static str> {
        vec!["echo"]
    }

    async fn execute(
        &self,
        input: &Payload,
        _ctx: CancellationToken,
    ) -> Result<Payload, TaskError> {
        tokio::time::sleep(WORK_DELAY).await;

        let mut output = Payload::new();
        output.insert("echo".into(), Value::Object(input.clone()));
        output.insert("message".into(), "Task executed successfully".into());
        Ok(output)
    }
}
