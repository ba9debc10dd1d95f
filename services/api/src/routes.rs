use crate::infra::{AppState, NewComplaint};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;
use waste_ops::dispatch::{
    dispatch_router, DispatchService, EntityStore, Leaderboard, NotificationDispatcher,
    NotificationEvent, NotificationKind, RecommendedWorker, ScoringWeights,
};
use waste_ops::error::AppError;

pub(crate) fn api_router<S, N>(service: Arc<DispatchService<S, N>>, state: AppState) -> axum::Router
where
    S: EntityStore + 'static,
    N: NotificationDispatcher + 'static,
{
    dispatch_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/complaints",
            axum::routing::post(file_complaint_endpoint),
        )
        .route(
            "/api/v1/workers/leaderboard",
            axum::routing::post(leaderboard_endpoint),
        )
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileComplaintRequest {
    pub(crate) description: String,
    pub(crate) citizen_id: String,
    pub(crate) locality: String,
    #[serde(default)]
    pub(crate) image: Option<String>,
}

pub(crate) async fn file_complaint_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<FileComplaintRequest>,
) -> impl IntoResponse {
    if payload.description.trim().is_empty() || payload.citizen_id.trim().is_empty() {
        let body = json!({ "error": "description and citizen_id are required" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }

    let complaint = state.store.file_complaint(NewComplaint {
        description: payload.description,
        citizen_id: payload.citizen_id,
        locality: payload.locality,
        image: payload.image,
    });

    let mut details = BTreeMap::new();
    details.insert("complaint_id".to_string(), complaint.id.to_string());
    details.insert("locality".to_string(), complaint.locality.clone());
    let event = NotificationEvent {
        kind: NotificationKind::ComplaintFiled,
        recipient: complaint.citizen_id.to_string(),
        details,
    };
    if let Err(err) = state.notifier.notify(event) {
        tracing::warn!(%err, complaint = %complaint.id, "complaint notification failed");
    }

    (StatusCode::CREATED, Json(complaint)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardRequest {
    /// Inline CSV export of the worker table.
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn leaderboard_endpoint(
    Json(payload): Json<LeaderboardRequest>,
) -> Result<Json<Vec<RecommendedWorker>>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let board = Leaderboard::from_reader(reader, &ScoringWeights::default())?;

    let mut entries = board.into_entries();
    if let Some(limit) = payload.limit {
        entries.truncate(limit);
    }
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{sample_workers, InMemoryEntityStore};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use waste_ops::dispatch::TracingDispatcher;

    fn test_state() -> AppState {
        let handle = PrometheusBuilder::new()
            .build_recorder()
            .handle();
        let store = InMemoryEntityStore::default();
        for worker in sample_workers() {
            store.seed_worker(worker);
        }
        AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(handle),
            store,
            notifier: Arc::new(TracingDispatcher),
        }
    }

    #[tokio::test]
    async fn health_and_readiness_respond_through_the_router() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let state = test_state();
        let service = Arc::new(DispatchService::new(
            Arc::new(state.store.clone()),
            state.notifier.clone(),
        ));
        let app = api_router(service, state);

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("router handles /health");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("router handles /ready");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn filing_a_complaint_returns_created_with_pending_status() {
        let state = test_state();
        let request = FileComplaintRequest {
            description: "Overflowing bins near the flower market".to_string(),
            citizen_id: "cit-55".to_string(),
            locality: "MG Road".to_string(),
            image: None,
        };

        let response =
            file_complaint_endpoint(Extension(state.clone()), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("body is json");
        assert_eq!(payload["status"], "PENDING");
        assert!(payload.get("worker").is_none());
    }

    #[tokio::test]
    async fn filing_a_blank_complaint_is_rejected() {
        let state = test_state();
        let request = FileComplaintRequest {
            description: "   ".to_string(),
            citizen_id: "cit-55".to_string(),
            locality: "MG Road".to_string(),
            image: None,
        };

        let response =
            file_complaint_endpoint(Extension(state), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn leaderboard_endpoint_ranks_and_truncates() {
        let request = LeaderboardRequest {
            csv: "worker_id,name,locality,worker_type,assigned_tasks,completed_tasks,avg_difficulty,locality_rating,citizen_rating\n\
                  w-1,Asha,MG Road,SWEEPER,30,10,4.0,2.0,2.0\n\
                  w-2,Binod,MG Road,SWEEPER,10,9,4.0,4.5,4.8\n"
                .to_string(),
            limit: Some(1),
        };

        let Json(entries) = leaderboard_endpoint(Json(request))
            .await
            .expect("leaderboard builds");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_str(), "w-2");
    }

    #[tokio::test]
    async fn leaderboard_endpoint_rejects_malformed_csv() {
        let request = LeaderboardRequest {
            csv: "worker_id,worker_type,assigned_tasks\nw-1,GARDENER,3\n".to_string(),
            limit: None,
        };

        let result = leaderboard_endpoint(Json(request)).await;
        assert!(result.is_err());
    }
}
