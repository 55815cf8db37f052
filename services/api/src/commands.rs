use clap::Args;
use skillbridge::config::AppConfig;
use skillbridge::error::AppError;
use skillbridge::workflows::catalog::unique_slug;
use skillbridge::workflows::jobs::{
    CandidateImporter, JobId, JobMatchScorer, JobPosting, MatchingConfig, RankedCandidate,
};
use skillbridge::workflows::learning::{
    compute, CourseProgressInput, CourseProgressResult, ProgressRequest,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ProgressArgs {
    /// Lessons in the course
    #[arg(long, default_value_t = 0)]
    pub(crate) total_lessons: i64,
    /// Lessons the learner has completed
    #[arg(long, default_value_t = 0)]
    pub(crate) completed_lessons: i64,
    /// Quizzes in the course
    #[arg(long, default_value_t = 0)]
    pub(crate) total_quizzes: i64,
    /// Quizzes the learner has passed
    #[arg(long, default_value_t = 0)]
    pub(crate) passed_quizzes: i64,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Comma-separated skills required by the job (case-sensitive)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) job_skills: Vec<String>,
    /// CSV export with candidate_id,skills,points,certificates columns
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Identifier printed in the listing header
    #[arg(long, default_value = "cli-job")]
    pub(crate) job_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct SlugArgs {
    /// Category or skill name to slugify
    pub(crate) name: String,
    /// Comma-separated slugs already in use
    #[arg(long, value_delimiter = ',')]
    pub(crate) taken: Vec<String>,
}

pub(crate) fn run_progress(args: ProgressArgs) -> Result<(), AppError> {
    let input = CourseProgressInput::try_from(ProgressRequest {
        total_lessons: args.total_lessons,
        completed_lessons: args.completed_lessons,
        total_quizzes: args.total_quizzes,
        passed_quizzes: args.passed_quizzes,
    })?;

    render_progress(&compute(input));
    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let scorer = JobMatchScorer::new(MatchingConfig::from(&config.engine));

    let job = JobPosting {
        job_id: JobId(args.job_id),
        title: String::new(),
        required_skills: args
            .job_skills
            .iter()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>(),
    };
    let candidates = CandidateImporter::from_path(&args.candidates)?;
    let ranked = scorer.rank_candidates(&job, &candidates);

    println!(
        "Job {} ({} required skills): {} of {} candidates eligible",
        job.job_id.0,
        job.required_skills.len(),
        ranked.len(),
        candidates.len()
    );
    for (position, entry) in ranked.iter().enumerate() {
        println!("{}", format_ranked(position + 1, entry));
    }

    Ok(())
}

pub(crate) fn run_slug(args: SlugArgs) -> Result<(), AppError> {
    println!("{}", unique_slug(&args.name, &args.taken));
    Ok(())
}

pub(crate) fn render_progress(result: &CourseProgressResult) {
    println!("Progress: {:.2}%", result.progress_percent);
    println!(
        "- lessons {}/{} | quizzes passed {}/{}",
        result.lessons.completed, result.lessons.total, result.quizzes.passed, result.quizzes.total
    );
}

pub(crate) fn format_ranked(position: usize, entry: &RankedCandidate) -> String {
    let missing = if entry.result.missing_skills.is_empty() {
        "none".to_string()
    } else {
        entry.result.missing_skills.join(", ")
    };
    format!(
        "{:>2}. {} | {:.2} {} | missing: {}",
        position,
        entry.candidate_id.0,
        entry.result.value,
        entry.result.status.label(),
        missing
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillbridge::workflows::jobs::{CandidateId, CandidateProfile};

    #[test]
    fn progress_rejects_negative_counts() {
        let err = run_progress(ProgressArgs {
            total_lessons: 3,
            completed_lessons: -1,
            ..ProgressArgs::default()
        })
        .expect_err("negative rejected");

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn ranked_lines_show_label_and_gaps() {
        let scorer = JobMatchScorer::default();
        let job = JobPosting {
            job_id: JobId("job-1".into()),
            title: String::new(),
            required_skills: ["PHP".to_string(), "Laravel".to_string()].into(),
        };
        let candidates = vec![CandidateProfile {
            candidate_id: CandidateId("c-1".into()),
            skills: ["PHP".to_string()].into(),
            points: 60,
            certificates: 0,
        }];

        let ranked = scorer.rank_candidates(&job, &candidates);
        let line = format_ranked(1, &ranked[0]);

        assert_eq!(line, " 1. c-1 | 33.00 No Match | missing: Laravel");
    }

    #[test]
    fn missing_candidate_file_is_an_import_error() {
        let err = CandidateImporter::from_path("/nonexistent/candidates.csv")
            .map_err(AppError::from)
            .expect_err("file missing");
        assert!(matches!(err, AppError::Import(_)));
    }
}
