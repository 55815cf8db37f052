use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use super::domain::{CandidateProfile, JobId, JobPosting};
use super::listing::RankedCandidate;
use super::matching::{JobMatchScorer, MatchInput};
use super::request::{CandidateListRequest, MatchRequest};

/// Router builder exposing pairwise scoring and candidate ranking.
pub fn jobs_router(scorer: Arc<JobMatchScorer>) -> Router {
    Router::new()
        .route("/api/v1/jobs/match", post(match_handler))
        .route("/api/v1/jobs/candidates", post(candidates_handler))
        .with_state(scorer)
}

#[derive(Debug, Serialize)]
pub struct CandidateListing {
    pub job_id: JobId,
    pub candidates: Vec<RankedCandidate>,
    /// Candidates left out by the eligibility gate.
    pub excluded: usize,
}

pub(crate) async fn match_handler(
    State(scorer): State<Arc<JobMatchScorer>>,
    Json(request): Json<MatchRequest>,
) -> Response {
    match MatchInput::try_from(request) {
        Ok(input) => (StatusCode::OK, Json(scorer.score(&input))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn candidates_handler(
    State(scorer): State<Arc<JobMatchScorer>>,
    Json(request): Json<CandidateListRequest>,
) -> Response {
    let (job, candidates): (JobPosting, Vec<CandidateProfile>) = match request.try_into() {
        Ok(parsed) => parsed,
        Err(err) => return err.into_response(),
    };

    let ranked = scorer.rank_candidates(&job, &candidates);
    let excluded = candidates.len() - ranked.len();
    info!(
        job = %job.job_id.0,
        pool = candidates.len(),
        eligible = ranked.len(),
        "candidate listing built"
    );

    let listing = CandidateListing {
        job_id: job.job_id,
        candidates: ranked,
        excluded,
    };
    (StatusCode::OK, Json(listing)).into_response()
}
