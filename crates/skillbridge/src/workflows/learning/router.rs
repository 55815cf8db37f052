use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{CourseId, LessonId, Principal, QuizId, QuizSubmission};
use super::quiz::QuizAttemptRequest;
use super::repository::{LearningRepository, NotificationPublisher, RepositoryError};
use super::service::{LearningService, LearningServiceError};

/// Header carrying the authenticated learner id, set by the upstream gateway.
pub const LEARNER_HEADER: &str = "x-learner-id";

/// Router builder exposing the enrollment, lesson and quiz endpoints.
pub fn learning_router<R, N>(service: Arc<LearningService<R, N>>) -> Router
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/learning/courses/:course_id/enroll",
            post(enroll_handler::<R, N>),
        )
        .route(
            "/api/v1/learning/courses/:course_id/drop",
            post(drop_handler::<R, N>),
        )
        .route(
            "/api/v1/learning/courses/:course_id/lessons/:lesson_id/complete",
            post(complete_lesson_handler::<R, N>),
        )
        .route(
            "/api/v1/learning/courses/:course_id/quizzes/:quiz_id/attempts",
            post(quiz_attempt_handler::<R, N>),
        )
        .route(
            "/api/v1/learning/courses/:course_id/progress",
            get(progress_handler::<R, N>),
        )
        .route("/api/v1/learning/standing", get(standing_handler::<R, N>))
        .with_state(service)
}

pub(crate) fn principal_from(headers: &HeaderMap) -> Option<Principal> {
    headers
        .get(LEARNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Principal::learner)
}

fn unauthorized() -> Response {
    let payload = json!({ "error": format!("missing {LEARNER_HEADER} header") });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn error_response(err: LearningServiceError) -> Response {
    let status = match &err {
        LearningServiceError::UnknownCourse(_)
        | LearningServiceError::UnknownLesson { .. }
        | LearningServiceError::UnknownQuiz { .. }
        | LearningServiceError::NotEnrolled { .. }
        | LearningServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LearningServiceError::AlreadyEnrolled(_)
        | LearningServiceError::EnrollmentInactive(_)
        | LearningServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LearningServiceError::Repository(RepositoryError::Unavailable(_))
        | LearningServiceError::Notification(_) => {
            error!(error = %err, "learning request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) async fn enroll_handler<R, N>(
    State(service): State<Arc<LearningService<R, N>>>,
    headers: HeaderMap,
    Path(course_id): Path<String>,
) -> Response
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(principal) = principal_from(&headers) else {
        return unauthorized();
    };

    match service.enroll(&principal, &CourseId(course_id)) {
        Ok(record) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn drop_handler<R, N>(
    State(service): State<Arc<LearningService<R, N>>>,
    headers: HeaderMap,
    Path(course_id): Path<String>,
) -> Response
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(principal) = principal_from(&headers) else {
        return unauthorized();
    };

    match service.drop_course(&principal, &CourseId(course_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_lesson_handler<R, N>(
    State(service): State<Arc<LearningService<R, N>>>,
    headers: HeaderMap,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Response
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(principal) = principal_from(&headers) else {
        return unauthorized();
    };

    match service.complete_lesson(&principal, &CourseId(course_id), &LessonId(lesson_id)) {
        Ok(update) => (StatusCode::OK, Json(update)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn quiz_attempt_handler<R, N>(
    State(service): State<Arc<LearningService<R, N>>>,
    headers: HeaderMap,
    Path((course_id, quiz_id)): Path<(String, String)>,
    body: Bytes,
) -> Response
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(principal) = principal_from(&headers) else {
        return unauthorized();
    };

    // Parsed by hand so anonymous callers get 401 before any body errors.
    let request: QuizAttemptRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let payload = json!({ "error": format!("invalid quiz attempt body: {err}") });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };
    let submission = match QuizSubmission::try_from(request) {
        Ok(submission) => submission,
        Err(err) => return err.into_response(),
    };

    match service.submit_quiz(
        &principal,
        &CourseId(course_id),
        &QuizId(quiz_id),
        submission,
    ) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn progress_handler<R, N>(
    State(service): State<Arc<LearningService<R, N>>>,
    headers: HeaderMap,
    Path(course_id): Path<String>,
) -> Response
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(principal) = principal_from(&headers) else {
        return unauthorized();
    };

    match service.progress(&principal, &CourseId(course_id)) {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn standing_handler<R, N>(
    State(service): State<Arc<LearningService<R, N>>>,
    headers: HeaderMap,
) -> Response
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(principal) = principal_from(&headers) else {
        return unauthorized();
    };

    match service.standing(&principal) {
        Ok(standing) => (StatusCode::OK, Json(standing)).into_response(),
        Err(err) => error_response(err),
    }
}
