use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ComplaintId, TaskDifficulty, WorkerId};
use super::notify::NotificationDispatcher;
use super::service::{AssignmentRequest, DispatchService, RecommendationFilter};
use super::store::EntityStore;
use super::DispatchError;

impl DispatchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::WorkerNotFound(_) | DispatchError::ComplaintNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DispatchError::NotAssignable { .. } => StatusCode::CONFLICT,
            DispatchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DispatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// HTTP surface for the dispatch operations.
pub fn dispatch_router<S, N>(service: Arc<DispatchService<S, N>>) -> Router
where
    S: EntityStore + 'static,
    N: NotificationDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/workers/recommend", get(recommend_handler::<S, N>))
        .route(
            "/api/v1/complaints/:complaint_id/assign",
            post(assign_handler::<S, N>),
        )
        .route(
            "/api/v1/complaints/:complaint_id",
            get(complaint_status_handler::<S, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignTaskBody {
    pub(crate) worker_id: String,
    #[serde(default)]
    pub(crate) task_difficulty: Option<TaskDifficulty>,
}

pub(crate) async fn recommend_handler<S, N>(
    State(service): State<Arc<DispatchService<S, N>>>,
    Query(filter): Query<RecommendationFilter>,
) -> Response
where
    S: EntityStore + 'static,
    N: NotificationDispatcher + 'static,
{
    match service.recommend(filter) {
        Ok(ranked) => (StatusCode::OK, axum::Json(ranked)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn assign_handler<S, N>(
    State(service): State<Arc<DispatchService<S, N>>>,
    Path(complaint_id): Path<u64>,
    axum::Json(body): axum::Json<AssignTaskBody>,
) -> Response
where
    S: EntityStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let request = AssignmentRequest {
        worker_id: WorkerId(body.worker_id),
        complaint_id: ComplaintId(complaint_id),
        task_difficulty: body.task_difficulty,
    };

    match service.assign(request) {
        Ok(receipt) => {
            let payload = json!({
                "success": true,
                "worker_id": receipt.worker_id,
                "complaint_id": receipt.complaint_id,
                "new_task_count": receipt.new_task_count,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complaint_status_handler<S, N>(
    State(service): State<Arc<DispatchService<S, N>>>,
    Path(complaint_id): Path<u64>,
) -> Response
where
    S: EntityStore + 'static,
    N: NotificationDispatcher + 'static,
{
    match service.complaint(ComplaintId(complaint_id)) {
        Ok(complaint) => (StatusCode::OK, axum::Json(complaint.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DispatchError) -> Response {
    let status = err.status_code();
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
