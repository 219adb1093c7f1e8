//! Request/response DTOs and the API error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::tasks::{Payload, Task};

/// Body of `POST /api/v1/tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    /// Task kind name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Caller-supplied input payload; defaults to empty.
    #[serde(default)]
    pub input: Payload,
    /// Advisory async hint recorded on the task.
    #[serde(default, rename = "async")]
    pub is_async: bool,
}

/// Response wrapper carrying one task snapshot.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

/// Response of `GET /api/v1/tasks`.
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub total: usize,
}

/// Response of `GET /api/v1/task-types`.
#[derive(Debug, Serialize)]
pub struct TaskTypesResponse {
    pub task_types: Vec<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// [`TaskError`] carried across the HTTP boundary.
///
/// Lookup failures map to 404, lifecycle conflicts to 409, a cancelled
/// admission wait to 408. Executor-level failures normally surface as the
/// task's `failed` state rather than as an API error.
#[derive(Debug)]
pub struct ApiError(pub TaskError);

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            e if e.is_conflict() => StatusCode::CONFLICT,
            TaskError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            TaskError::InvalidInput { .. }
            | TaskError::DivisionByZero
            | TaskError::UnsupportedOperation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_request_accepts_minimal_body() {
        let req: TaskRequest = serde_json::from_value(json!({"type": "echo"})).unwrap();
        assert_eq!(req.kind, "echo");
        assert!(req.input.is_empty());
        assert!(!req.is_async);
    }

    #[test]
    fn task_request_reads_wire_names() {
        let req: TaskRequest = serde_json::from_value(json!({
            "type": "sleep",
            "input": {"duration": 1.5},
            "async": true
        }))
        .unwrap();
        assert_eq!(req.kind, "sleep");
        assert_eq!(req.input["duration"], json!(1.5));
        assert!(req.is_async);
    }

    #[test]
    fn api_error_status_mapping() {
        let cases = [
            (
                TaskError::TaskNotFound { id: "x".into() },
                StatusCode::NOT_FOUND,
            ),
            (
                TaskError::KindNotFound { kind: "x".into() },
                StatusCode::NOT_FOUND,
            ),
            (
                TaskError::AlreadyFinished { id: "x".into() },
                StatusCode::CONFLICT,
            ),
            (TaskError::Cancelled, StatusCode::REQUEST_TIMEOUT),
            (
                TaskError::ExecutionFailed {
                    message: "boom".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
