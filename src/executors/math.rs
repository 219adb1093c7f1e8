//! Math executor: basic arithmetic over two operands.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::Execute;
use crate::error::TaskError;
use crate::tasks::Payload;

/// Computes `a <operation> b` for `add`, `subtract`, `multiply`, `divide`.
///
/// `divide` guards the zero divisor; unknown operations are rejected.
pub struct MathExecutor;

impl MathExecutor {
    fn number(input: &Payload, key: &str) -> Result<f64, TaskError> {
        input
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| TaskError::InvalidInput {
                reason: format!("{key} must be a number"),
            })
    }
}

#[async_trait]
impl Execute for MathExecutor {
    fn kinds(&self) -> Vec<&'static str> {
        vec!["math"]
    }

    async fn execute(
        &self,
        input: &Payload,
        _ctx: CancellationToken,
    ) -> Result<Payload, TaskError> {
        let operation = input
            .get("operation")
            .and_then(|v| v.as_str())
            .ok_or_else(|| TaskError::InvalidInput {
                reason: "operation must be a string".into(),
            })?;

        let a = Self::number(input, "a")?;
        let b = Self::number(input, "b")?;

        let result = match operation {
            "add" => a + b,
            "subtract" => a - b,
            "multiply" => a * b,
            "divide" => {
                if b == 0.0 {
                    return Err(TaskError::DivisionByZero);
                }
                a / b
            }
            other => {
                return Err(TaskError::UnsupportedOperation {
                    operation: other.to_string(),
                })
            }
        };

        let mut output = Payload::new();
        output.insert("operation".into(), operation.into());
        output.insert("a".into(), a.into());
        output.insert("b".into(), b.into());
        output.insert("result".into(), result.into());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn run(operation: &str, a: f64, b: f64) -> Result<Payload, TaskError> {
        let mut input = Payload::new();
        input.insert("operation".into(), operation.into());
        input.insert("a".into(), a.into());
        input.insert("b".into(), b.into());
        MathExecutor.execute(&input, CancellationToken::new()).await
    }

    #[tokio::test]
    async fn supports_the_four_operations() {
        assert_eq!(run("add", 2.0, 3.0).await.unwrap()["result"], json!(5.0));
        assert_eq!(
            run("subtract", 10.0, 4.0).await.unwrap()["result"],
            json!(6.0)
        );
        assert_eq!(
            run("multiply", 3.0, 4.0).await.unwrap()["result"],
            json!(12.0)
        );
        assert_eq!(run("divide", 10.0, 4.0).await.unwrap()["result"], json!(2.5));
    }

    #[tokio::test]
    async fn output_carries_operation_and_operands() {
        let output = run("add", 1.0, 2.0).await.unwrap();
        assert_eq!(output["operation"], json!("add"));
        assert_eq!(output["a"], json!(1.0));
        assert_eq!(output["b"], json!(2.0));
    }

    #[tokio::test]
    async fn division_by_zero_is_guarded() {
        let err = run("divide", 10.0, 0.0).await.unwrap_err();
        assert!(matches!(err, TaskError::DivisionByZero));
        assert_eq!(err.to_string(), "division by zero");
    }

    #[tokio::test]
    async fn unsupported_operation_is_rejected() {
        let err = run("modulo", 10.0, 3.0).await.unwrap_err();
        assert!(matches!(err, TaskError::UnsupportedOperation { .. }));
    }

    #[tokio::test]
    async fn missing_or_mistyped_operands_are_invalid() {
        let mut input = Payload::new();
        input.insert("operation".into(), json!("add"));
        input.insert("a".into(), json!("one"));
        input.insert("b".into(), json!(2));
        let err = MathExecutor
            .execute(&input, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput { .. }));

        let err = MathExecutor
            .execute(&Payload::new(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput { .. }));
    }
}
