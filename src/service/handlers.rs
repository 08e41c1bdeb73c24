use super::coordinator::Coordinator;
use super::protocol::*;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, http::StatusCode};
use std::sync::Arc;

/// Builds the HTTP router around a coordinator.
pub fn router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route(ENDPOINT_STATUS, get(handle_status))
        .route(ENDPOINT_TASK, get(handle_get_task))
        .route(ENDPOINT_RESULT, post(handle_submit_result))
        .layer(Extension(coordinator))
}

pub async fn handle_get_task(
    Extension(coordinator): Extension<Arc<Coordinator>>,
) -> (StatusCode, Json<TaskResponse>) {
    let task = coordinator.assign_task();
    tracing::debug!("Assigned pages {:?}", task.pages);
    (StatusCode::OK, Json(task))
}

/// Queues a result. Body parse failures are rejected by the `Json` extractor before this runs.
pub async fn handle_submit_result(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    Json(req): Json<SubmitResultRequest>,
) -> Response {
    let page = req.page;
    match coordinator.submit(req).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            let status = if e.is_client_error() {
                tracing::warn!(page, "Rejected result: {}", e);
                StatusCode::BAD_REQUEST
            } else {
                tracing::error!(page, "Failed to queue result: {}", e);
                StatusCode::SERVICE_UNAVAILABLE
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn handle_status(
    Extension(coordinator): Extension<Arc<Coordinator>>,
) -> (StatusCode, Json<StatusResponse>) {
    (StatusCode::OK, Json(coordinator.status()))
}
