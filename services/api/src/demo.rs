use crate::commands::{format_ranked, render_progress};
use crate::infra::{seeded_catalog, InMemoryLearningRepository, InMemoryNotificationPublisher};
use clap::Args;
use skillbridge::config::EngineConfig;
use skillbridge::error::AppError;
use skillbridge::workflows::jobs::{
    CandidateId, CandidateProfile, JobId, JobMatchScorer, JobPosting, MatchingConfig,
};
use skillbridge::workflows::learning::{
    CourseId, LearningService, LessonId, Principal, QuizId, QuizSubmission, RewardPolicy,
};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Learner id used for the walkthrough.
    #[arg(long, default_value = "demo-learner")]
    pub(crate) learner: String,
    /// Skip the job matching portion of the demo.
    #[arg(long)]
    pub(crate) skip_matching: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        learner,
        skip_matching,
    } = args;
    let engine = EngineConfig::default();

    println!("SkillBridge engine demo");
    let repository = Arc::new(InMemoryLearningRepository::with_catalog(seeded_catalog()));
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = LearningService::new(
        repository,
        notifications.clone(),
        RewardPolicy::from(&engine),
    );

    let principal = Principal::learner(learner.as_str());
    let course = CourseId("web-development-basics".to_string());

    if let Err(err) = service.enroll(&principal, &course) {
        println!("  Enrollment rejected: {}", err);
        return Ok(());
    }
    println!("- {} enrolled in {}", learner, course.0);

    for lesson in ["html-structure", "css-layout", "php-syntax"] {
        match service.complete_lesson(&principal, &course, &LessonId(lesson.to_string())) {
            Ok(update) => println!(
                "  lesson {:<16} -> {:.2}%",
                lesson, update.progress.progress_percent
            ),
            Err(err) => {
                println!("  Lesson update failed: {}", err);
                return Ok(());
            }
        }
    }

    let attempts = [
        ("markup-check", 3, 10),
        ("markup-check", 9, 10),
        ("php-check", 7, 8),
    ];
    for (quiz, correct_answers, total_questions) in attempts {
        let submission = QuizSubmission {
            correct_answers,
            total_questions,
        };
        match service.submit_quiz(&principal, &course, &QuizId(quiz.to_string()), submission) {
            Ok(outcome) => println!(
                "  quiz {:<13} score {:>3} (best {:>3}) +{} points -> {:.2}%",
                quiz,
                outcome.grade.score,
                outcome.best_score,
                outcome.update.points_awarded,
                outcome.update.progress.progress_percent
            ),
            Err(err) => {
                println!("  Quiz attempt failed: {}", err);
                return Ok(());
            }
        }
    }

    match service.complete_lesson(&principal, &course, &LessonId("laravel-routing".to_string())) {
        Ok(update) => {
            render_progress(&update.progress);
            if update.certificate_issued {
                println!(
                    "  Course completed: certificate issued, +{} points",
                    update.points_awarded
                );
            }
        }
        Err(err) => {
            println!("  Lesson update failed: {}", err);
            return Ok(());
        }
    }

    for notice in notifications.events() {
        println!(
            "  Notice: template={} -> {}",
            notice.template, notice.learner_id.0
        );
    }

    let standing = match service.standing(&principal) {
        Ok(standing) => standing,
        Err(err) => {
            println!("  Standing unavailable: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Standing: {} points, {} certificate(s)",
        standing.points, standing.certificates
    );

    if skip_matching {
        return Ok(());
    }

    println!("\nJob matching demo");
    let scorer = JobMatchScorer::new(MatchingConfig::from(&engine));
    let learner_profile = CandidateProfile::from_standing(
        &standing,
        skills(&["CSS", "HTML", "Laravel", "PHP"]),
    );
    let mut pool = demo_candidates();
    pool.push(learner_profile.clone());
    let jobs = demo_jobs();

    for entry in scorer.match_board(&jobs, &pool) {
        println!(
            "- {} ({}): {} eligible",
            entry.title,
            entry.job_id.0,
            entry.candidates.len()
        );
        for (position, ranked) in entry.candidates.iter().enumerate() {
            println!("  {}", format_ranked(position + 1, ranked));
        }
    }

    let recommended = scorer.recommend_jobs(&learner_profile, &jobs);
    println!("Recommended for {}:", learner);
    if recommended.is_empty() {
        println!("  none yet; keep earning points");
    }
    for job in recommended {
        println!(
            "  - {} | {:.2} {}",
            job.title,
            job.result.value,
            job.result.status.label()
        );
    }

    Ok(())
}

fn skills(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn demo_jobs() -> Vec<JobPosting> {
    vec![
        JobPosting {
            job_id: JobId("job-laravel".to_string()),
            title: "Laravel developer".to_string(),
            required_skills: skills(&["Laravel", "MySQL", "PHP"]),
        },
        JobPosting {
            job_id: JobId("job-frontend".to_string()),
            title: "Frontend contractor".to_string(),
            required_skills: skills(&["CSS", "HTML", "JavaScript"]),
        },
        JobPosting {
            job_id: JobId("job-data".to_string()),
            title: "Reporting analyst".to_string(),
            required_skills: skills(&["Excel", "SQL"]),
        },
    ]
}

fn demo_candidates() -> Vec<CandidateProfile> {
    let candidate = |id: &str, held: &[&str], points: u32, certificates: u32| CandidateProfile {
        candidate_id: CandidateId(id.to_string()),
        skills: skills(held),
        points,
        certificates,
    };

    vec![
        candidate("amara", &["Laravel", "MySQL", "PHP"], 480, 4),
        candidate("bruno", &["JavaScript", "CSS"], 140, 1),
        candidate("chen", &["SQL", "Excel", "Python"], 35, 2),
        candidate("dana", &["PHP"], 75, 0),
    ]
}
