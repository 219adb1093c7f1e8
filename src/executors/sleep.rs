//! Sleep executor: a cancellable timed wait.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::Execute;
use crate::error::TaskError;
use crate::tasks::Payload;

/// Sleeps for `input.duration` seconds (fractional allowed).
///
/// The wait races against the cancellation token: if the token fires first,
/// the executor returns [`TaskError::Cancelled`] instead of finishing the
/// sleep.
pub struct SleepExecutor;

#[async_trait]
impl Execute for SleepExecutor {
    fn kinds(&self) -> Vec<&'static str> {
        vec!["sleep"]
    }

    async fn execute(&self, input: &Payload, ctx: CancellationToken) -> Result<Payload, TaskError> {
        let seconds = input
            .get("duration")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| TaskError::InvalidInput {
                reason: "duration must be a number".into(),
            })?;

        let wait = Duration::from_secs_f64(seconds.max(0.0));
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = ctx.cancelled() => return Err(TaskError::Cancelled),
        }

        let mut output = Payload::new();
        output.insert("slept_for_seconds".into(), seconds.into());
        output.insert("message".into(), "Sleep completed successfully".into());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;

    fn sleep_input(duration: serde_json::Value) -> Payload {
        let mut input = Payload::new();
        input.insert("duration".into(), duration);
        input
    }

    #[tokio::test]
    async fn sleeps_for_fractional_seconds() {
        let started = Instant::now();
        let output = SleepExecutor
            .execute(&sleep_input(json!(0.05)), CancellationToken::new())
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(45));
        assert_eq!(output["slept_for_seconds"], json!(0.05));
        assert_eq!(output["message"], json!("Sleep completed successfully"));
    }

    #[tokio::test]
    async fn missing_duration_is_invalid_input() {
        let err = SleepExecutor
            .execute(&Payload::new(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn non_numeric_duration_is_invalid_input() {
        let err = SleepExecutor
            .execute(&sleep_input(json!("long")), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn cancellation_interrupts_the_wait() {
        let token = CancellationToken::new();
        let child = token.clone();
        let handle = tokio::spawn(async move {
            SleepExecutor.execute(&sleep_input(json!(30)), child).await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        let started = Instant::now();
        token.cancel();

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, TaskError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
