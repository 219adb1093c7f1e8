//! Error executor: always fails, useful for exercising the failure path.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::Execute;
use crate::error::TaskError;
use crate::tasks::Payload;

const DEFAULT_MESSAGE: &str = "Task failed as requested";

/// Fails with `input.message`, or a fixed phrase when absent or non-string.
pub struct ErrorExecutor;

#[async_trait]
impl Execute for ErrorExecutor {
    fn kinds(&self) -> Vec<&'static str> {
        vec!["error"]
    }

    async fn execute(
        &self,
        input: &Payload,
        _ctx: CancellationToken,
    ) -> Result<Payload, TaskError> {
        let message = input
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_MESSAGE);

        Err(TaskError::ExecutionFailed {
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn fails_with_custom_message() {
        let mut input = Payload::new();
        input.insert("message".into(), json!("deliberate"));

        let err = ErrorExecutor
            .execute(&input, CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "deliberate");
    }

    #[tokio::test]
    async fn falls_back_to_default_message() {
        let err = ErrorExecutor
            .execute(&Payload::new(), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_MESSAGE);

        let mut input = Payload::new();
        input.insert("message".into(), json!(7));
        let err = ErrorExecutor
            .execute(&input, CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_MESSAGE);
    }
}
