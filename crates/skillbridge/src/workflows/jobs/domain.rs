use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::workflows::learning::LearnerStanding;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Candidates are learners; the id is shared with the learning side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Job posting reduced to what matching needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_id: JobId,
    pub title: String,
    pub required_skills: BTreeSet<String>,
}

/// Candidate facts assembled from skills, points and certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: CandidateId,
    pub skills: BTreeSet<String>,
    pub points: u32,
    pub certificates: u32,
}

impl CandidateProfile {
    /// Profile for a learner whose points and certificates come from the
    /// learning side.
    pub fn from_standing(standing: &LearnerStanding, skills: BTreeSet<String>) -> Self {
        Self {
            candidate_id: CandidateId(standing.learner_id.0.clone()),
            skills,
            points: standing.points,
            certificates: standing.certificates,
        }
    }
}
