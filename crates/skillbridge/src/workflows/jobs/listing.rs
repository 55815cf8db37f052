//! Candidate and job listings built on the pairwise scorer.
//!
//! Every pair is scored independently, ineligible pairs are dropped, and the
//! rest are ordered by score with identifiers breaking ties so repeated calls
//! produce the same order.

use std::cmp::Ordering;

use serde::Serialize;

use super::domain::{CandidateId, CandidateProfile, JobId, JobPosting};
use super::matching::{JobMatchScorer, MatchInput, MatchResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate_id: CandidateId,
    pub result: MatchResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedJob {
    pub job_id: JobId,
    pub title: String,
    pub result: MatchResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobBoardEntry {
    pub job_id: JobId,
    pub title: String,
    pub candidates: Vec<RankedCandidate>,
}

impl JobMatchScorer {
    /// Eligible candidates for `job`, best first.
    pub fn rank_candidates(
        &self,
        job: &JobPosting,
        candidates: &[CandidateProfile],
    ) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .filter_map(|candidate| {
                let result = self.score(&MatchInput::between(job, candidate));
                result.eligibility.is_eligible().then(|| RankedCandidate {
                    candidate_id: candidate.candidate_id.clone(),
                    result,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            by_value_desc(&a.result, &b.result).then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });
        ranked
    }

    /// Jobs the candidate is eligible for, best first.
    pub fn recommend_jobs(
        &self,
        candidate: &CandidateProfile,
        jobs: &[JobPosting],
    ) -> Vec<RecommendedJob> {
        let mut recommended: Vec<RecommendedJob> = jobs
            .iter()
            .filter_map(|job| {
                let result = self.score(&MatchInput::between(job, candidate));
                result.eligibility.is_eligible().then(|| RecommendedJob {
                    job_id: job.job_id.clone(),
                    title: job.title.clone(),
                    result,
                })
            })
            .collect();

        recommended
            .sort_by(|a, b| by_value_desc(&a.result, &b.result).then_with(|| a.job_id.cmp(&b.job_id)));
        recommended
    }

    /// Ranked candidates for every job, in job id order.
    pub fn match_board(
        &self,
        jobs: &[JobPosting],
        candidates: &[CandidateProfile],
    ) -> Vec<JobBoardEntry> {
        let mut board: Vec<JobBoardEntry> = jobs
            .iter()
            .map(|job| JobBoardEntry {
                job_id: job.job_id.clone(),
                title: job.title.clone(),
                candidates: self.rank_candidates(job, candidates),
            })
            .collect();

        board.sort_by(|a, b| a.job_id.cmp(&b.job_id));
        board
    }
}

fn by_value_desc(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.value.total_cmp(&a.value)
}
