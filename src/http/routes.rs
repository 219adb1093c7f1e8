//! HTTP routes: thin adapters between the wire and the task manager.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;

use crate::core::{ExecutorRegistry, TaskManager};
use crate::http::models::{
    ApiError, HealthResponse, TaskListResponse, TaskRequest, TaskResponse, TaskTypesResponse,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<TaskManager>,
    pub registry: Arc<ExecutorRegistry>,
}

impl AppState {
    /// Bundles the core components the handlers need.
    pub fn new(manager: Arc<TaskManager>, registry: Arc<ExecutorRegistry>) -> Self {
        Self { manager, registry }
    }
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/tasks", post(create_task).get(list_tasks))
        .route("/api/v1/tasks/:id", get(get_task).delete(cancel_task))
        .route("/api/v1/tasks/:id/execute", post(execute_task))
        .route("/api/v1/tasks/:id/execute-async", post(execute_task_async))
        .route("/api/v1/task-types", get(task_types))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "taskd",
    })
}

async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let task = state
        .manager
        .create_task(&req.kind, req.input, req.is_async)
        .await?;
    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

async fn list_tasks(State(state): State<AppState>) -> Json<TaskListResponse> {
    let tasks = state.manager.list_tasks().await;
    let total = tasks.len();
    Json(TaskListResponse { tasks, total })
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.manager.get_task(&id).await?;
    Ok(Json(TaskResponse { task }))
}

/// Runs the task to completion before responding.
///
/// An executor failure is not an API error: the response carries the task in
/// its `failed` state. Only lookup, lifecycle, and admission-wait errors map
/// to error status codes.
async fn execute_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let ctx = CancellationToken::new();
    if let Err(e) = state.manager.execute(&id, &ctx).await {
        if e.is_not_found() || e.is_conflict() || matches!(e, crate::error::TaskError::Cancelled)
        {
            return Err(e.into());
        }
    }

    let task = state.manager.get_task(&id).await?;
    Ok(Json(TaskResponse { task }))
}

async fn execute_task_async(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    state.manager.clone().execute_detached(&id).await?;
    let task = state.manager.get_task(&id).await?;
    Ok((StatusCode::ACCEPTED, Json(TaskResponse { task })))
}

async fn cancel_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    state.manager.cancel(&id).await?;
    let task = state.manager.get_task(&id).await?;
    Ok(Json(TaskResponse { task }))
}

async fn task_types(State(state): State<AppState>) -> Json<TaskTypesResponse> {
    Json(TaskTypesResponse {
        task_types: state.registry.kinds().await,
    })
}
