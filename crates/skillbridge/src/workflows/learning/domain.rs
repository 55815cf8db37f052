use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for learners (also the candidate id on the jobs side).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LearnerId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LessonId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuizId(pub String);

/// Authenticated caller, handed to every operation that acts on behalf of a learner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub learner_id: LearnerId,
}

impl Principal {
    pub fn learner(id: impl Into<String>) -> Self {
        Self {
            learner_id: LearnerId(id.into()),
        }
    }
}

/// Course structure as published by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub course_id: CourseId,
    pub title: String,
    pub modules: Vec<ModuleOutline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutline {
    pub module_id: String,
    pub title: String,
    pub lessons: Vec<LessonId>,
    pub quizzes: Vec<QuizId>,
}

impl CourseOutline {
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|module| module.lessons.len()).sum()
    }

    pub fn total_quizzes(&self) -> usize {
        self.modules.iter().map(|module| module.quizzes.len()).sum()
    }

    pub fn has_lesson(&self, lesson: &LessonId) -> bool {
        self.modules
            .iter()
            .any(|module| module.lessons.contains(lesson))
    }

    pub fn has_quiz(&self, quiz: &QuizId) -> bool {
        self.modules.iter().any(|module| module.quizzes.contains(quiz))
    }
}

/// Lifecycle of a learner's registration in a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Dropped => "dropped",
        }
    }
}

/// Stored enrollment facts. `progress_percent` is derived and rewritten by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub status: EnrollmentStatus,
    pub completed_lessons: BTreeSet<LessonId>,
    /// Best score per quiz on a 0–100 scale.
    pub quiz_scores: BTreeMap<QuizId, u8>,
    pub progress_percent: f64,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl EnrollmentRecord {
    pub fn new(learner_id: LearnerId, course_id: CourseId, enrolled_at: DateTime<Utc>) -> Self {
        Self {
            learner_id,
            course_id,
            status: EnrollmentStatus::Active,
            completed_lessons: BTreeSet::new(),
            quiz_scores: BTreeMap::new(),
            progress_percent: 0.0,
            enrolled_at,
            completed_at: None,
        }
    }
}

/// Raw answer tally for one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub correct_answers: u32,
    pub total_questions: u32,
}

/// Gamification totals that feed the jobs side of the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerStanding {
    pub learner_id: LearnerId,
    pub points: u32,
    pub certificates: u32,
}

/// Proof of course completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub issued_at: DateTime<Utc>,
}
