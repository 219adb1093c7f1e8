//! HTTP surface: routes, DTOs, and server lifecycle.

mod models;
mod routes;
mod server;

pub use models::{ApiError, TaskListResponse, TaskRequest, TaskResponse, TaskTypesResponse};
pub use routes::{router, AppState};
pub use server::serve;
