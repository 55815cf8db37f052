use std::collections::BTreeSet;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::jobs::domain::{CandidateId, CandidateProfile, JobId, JobPosting};
use crate::workflows::jobs::matching::{JobMatchScorer, MatchInput, MatchingConfig};

pub(super) fn skills(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub(super) fn scorer() -> JobMatchScorer {
    JobMatchScorer::new(MatchingConfig::default())
}

pub(super) fn input(job: &[&str], candidate: &[&str], points: u32, certificates: u32) -> MatchInput {
    MatchInput {
        job_skills: skills(job),
        candidate_skills: skills(candidate),
        candidate_points: points,
        candidate_certificate_count: certificates,
    }
}

pub(super) fn job(id: &str, required: &[&str]) -> JobPosting {
    JobPosting {
        job_id: JobId(id.to_string()),
        title: format!("{id} role"),
        required_skills: skills(required),
    }
}

pub(super) fn candidate(id: &str, held: &[&str], points: u32, certificates: u32) -> CandidateProfile {
    CandidateProfile {
        candidate_id: CandidateId(id.to_string()),
        skills: skills(held),
        points,
        certificates,
    }
}

/// Pool against a `{PHP, Laravel}` posting: two gate failures, one strong
/// candidate and three tied at 33.
pub(super) fn php_pool() -> Vec<CandidateProfile> {
    vec![
        candidate("c-tie-b", &["Laravel"], 60, 0),
        candidate("c-go", &["Go"], 100, 0),
        candidate("c-full", &["PHP", "Laravel"], 300, 2),
        candidate("c-low", &["PHP"], 10, 0),
        candidate("c-php", &["PHP"], 60, 0),
        candidate("c-tie-a", &["Laravel"], 60, 0),
    ]
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
