use std::collections::BTreeSet;

use serde::Deserialize;

use super::domain::{CandidateId, CandidateProfile, JobId, JobPosting};
use super::matching::MatchInput;
use crate::validation::{ValidationError, Validator};

/// Untrusted single-pair payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatchRequest {
    pub job_skills: Vec<String>,
    pub candidate_skills: Vec<String>,
    pub candidate_points: i64,
    pub candidate_certificate_count: i64,
}

impl TryFrom<MatchRequest> for MatchInput {
    type Error = ValidationError;

    fn try_from(request: MatchRequest) -> Result<Self, Self::Error> {
        let mut validator = Validator::new();
        let input = MatchInput {
            job_skills: skill_set(&mut validator, "job_skills", request.job_skills),
            candidate_skills: skill_set(&mut validator, "candidate_skills", request.candidate_skills),
            candidate_points: validator.count("candidate_points", request.candidate_points),
            candidate_certificate_count: validator.count(
                "candidate_certificate_count",
                request.candidate_certificate_count,
            ),
        };
        validator.finish(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobRequest {
    pub job_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateRequest {
    pub candidate_id: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub certificates: i64,
}

/// Untrusted listing payload: one job and the pool to rank against it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateListRequest {
    pub job: JobRequest,
    #[serde(default)]
    pub candidates: Vec<CandidateRequest>,
}

impl TryFrom<CandidateListRequest> for (JobPosting, Vec<CandidateProfile>) {
    type Error = ValidationError;

    fn try_from(request: CandidateListRequest) -> Result<Self, Self::Error> {
        let mut validator = Validator::new();

        validator.name("job.job_id", &request.job.job_id);
        let job = JobPosting {
            job_id: JobId(request.job.job_id.trim().to_string()),
            title: request.job.title,
            required_skills: skill_set(
                &mut validator,
                "job.required_skills",
                request.job.required_skills,
            ),
        };

        let mut seen = BTreeSet::new();
        let candidates = request
            .candidates
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| {
                let prefix = format!("candidates[{index}]");
                let candidate_id = candidate.candidate_id.trim().to_string();
                validator.name(&format!("{prefix}.candidate_id"), &candidate_id);
                if !candidate_id.is_empty() && !seen.insert(candidate_id.clone()) {
                    validator.reject(format!("{prefix}.candidate_id"), "has already been taken");
                }
                CandidateProfile {
                    candidate_id: CandidateId(candidate_id),
                    skills: skill_set(&mut validator, &format!("{prefix}.skills"), candidate.skills),
                    points: validator.count(&format!("{prefix}.points"), candidate.points),
                    certificates: validator
                        .count(&format!("{prefix}.certificates"), candidate.certificates),
                }
            })
            .collect();

        validator.finish((job, candidates))
    }
}

/// Skill names are trimmed but otherwise kept as given; matching is
/// case-sensitive.
fn skill_set(validator: &mut Validator, field: &str, skills: Vec<String>) -> BTreeSet<String> {
    skills
        .into_iter()
        .enumerate()
        .filter_map(|(index, skill)| {
            let trimmed = skill.trim();
            validator.name(&format!("{field}[{index}]"), trimmed);
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_request_rejects_negative_counts() {
        let err = MatchInput::try_from(MatchRequest {
            job_skills: vec!["PHP".into()],
            candidate_skills: vec!["PHP".into()],
            candidate_points: -1,
            candidate_certificate_count: -3,
        })
        .expect_err("negative counts rejected");

        assert!(err.reason_for("candidate_points").is_some());
        assert!(err.reason_for("candidate_certificate_count").is_some());
    }

    #[test]
    fn match_request_keeps_skill_case() {
        let input = MatchInput::try_from(MatchRequest {
            job_skills: vec![" PHP ".into(), "php".into()],
            candidate_skills: vec![],
            candidate_points: 0,
            candidate_certificate_count: 0,
        })
        .expect("valid request");

        assert_eq!(input.job_skills.len(), 2);
        assert!(input.job_skills.contains("PHP"));
    }

    #[test]
    fn blank_skill_names_are_rejected() {
        let err = MatchInput::try_from(MatchRequest {
            job_skills: vec!["Go".into(), "  ".into()],
            ..MatchRequest::default()
        })
        .expect_err("blank skill rejected");

        assert_eq!(err.reason_for("job_skills[1]"), Some("is required"));
    }

    #[test]
    fn candidate_list_flags_duplicate_ids() {
        let request = CandidateListRequest {
            job: JobRequest {
                job_id: "job-1".into(),
                title: "Backend".into(),
                required_skills: vec!["Rust".into()],
            },
            candidates: vec![
                CandidateRequest {
                    candidate_id: "c-1".into(),
                    skills: vec!["Rust".into()],
                    points: 80,
                    certificates: 1,
                },
                CandidateRequest {
                    candidate_id: "c-1".into(),
                    skills: vec![],
                    points: 10,
                    certificates: 0,
                },
            ],
        };

        let err = <(JobPosting, Vec<CandidateProfile>)>::try_from(request)
            .expect_err("duplicate rejected");
        assert_eq!(
            err.reason_for("candidates[1].candidate_id"),
            Some("has already been taken")
        );
    }
}
