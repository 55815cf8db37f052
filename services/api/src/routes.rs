use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;
use skillbridge::error::AppError;
use skillbridge::workflows::catalog::catalog_router;
use skillbridge::workflows::jobs::{jobs_router, JobMatchScorer};
use skillbridge::workflows::learning::{
    compute, learning_router, CourseProgressInput, CourseProgressResult, LearningRepository,
    LearningService, NotificationPublisher, ProgressRequest,
};
use std::sync::Arc;

pub(crate) fn with_platform_routes<R, N>(
    learning: Arc<LearningService<R, N>>,
    scorer: Arc<JobMatchScorer>,
) -> Router
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    learning_router(learning)
        .merge(jobs_router(scorer))
        .merge(catalog_router())
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/progress/compute", post(progress_endpoint))
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

/// Stateless progress calculation for callers that keep their own records.
pub(crate) async fn progress_endpoint(
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<CourseProgressResult>, AppError> {
    let input = CourseProgressInput::try_from(payload)?;
    Ok(Json(compute(input)))
}
