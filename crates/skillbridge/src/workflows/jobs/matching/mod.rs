mod config;
mod policy;
mod rules;

pub use config::{LabelThresholds, MatchWeights, MatchingConfig, DEFAULT_WEIGHTS};
pub use policy::{Eligibility, MatchStatus};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{CandidateProfile, JobPosting};
use policy::decide_eligibility;

/// Facts compared for one job/candidate pair. Skill names are compared
/// case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchInput {
    pub job_skills: BTreeSet<String>,
    pub candidate_skills: BTreeSet<String>,
    pub candidate_points: u32,
    pub candidate_certificate_count: u32,
}

impl MatchInput {
    pub fn between(job: &JobPosting, candidate: &CandidateProfile) -> Self {
        Self {
            job_skills: job.required_skills.clone(),
            candidate_skills: candidate.skills.clone(),
            candidate_points: candidate.points,
            candidate_certificate_count: candidate.certificates,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    Skills,
    Points,
    Certificates,
}

/// Share of the final score contributed by one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchComponent {
    pub factor: MatchFactor,
    /// Factor value on 0..=1 before weighting.
    pub fraction: f64,
    /// Points on the 0–100 scale after weighting.
    pub contribution: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub status: MatchStatus,
    pub value: f64,
    pub eligibility: Eligibility,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub components: Vec<MatchComponent>,
}

/// Stateless scorer that applies the matching rubric to a pair.
#[derive(Debug, Clone, Default)]
pub struct JobMatchScorer {
    config: MatchingConfig,
}

impl JobMatchScorer {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn score(&self, input: &MatchInput) -> MatchResult {
        let (components, value, signals) = rules::score_input(input, &self.config);
        let eligibility = decide_eligibility(input.candidate_points, &self.config, &signals);

        MatchResult {
            status: MatchStatus::from_value(value, &self.config.labels),
            value,
            eligibility,
            matched_skills: signals.matched_skills,
            missing_skills: signals.missing_skills,
            components,
        }
    }
}
