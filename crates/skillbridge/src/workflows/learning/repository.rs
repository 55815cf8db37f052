use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    Certificate, CourseId, CourseOutline, EnrollmentRecord, LearnerId, LearnerStanding,
};

/// Storage abstraction so the learning service can be exercised in isolation.
pub trait LearningRepository: Send + Sync {
    fn course(&self, id: &CourseId) -> Result<Option<CourseOutline>, RepositoryError>;
    fn enrollment(
        &self,
        learner: &LearnerId,
        course: &CourseId,
    ) -> Result<Option<EnrollmentRecord>, RepositoryError>;
    fn insert_enrollment(
        &self,
        record: EnrollmentRecord,
    ) -> Result<EnrollmentRecord, RepositoryError>;
    fn update_enrollment(&self, record: EnrollmentRecord) -> Result<(), RepositoryError>;
    /// Credit points to a learner, returning the new balance.
    fn add_points(&self, learner: &LearnerId, points: u32) -> Result<u32, RepositoryError>;
    /// Store a certificate. A second one for the same learner and course is a
    /// [`RepositoryError::Conflict`].
    fn issue_certificate(&self, certificate: Certificate) -> Result<(), RepositoryError>;
    fn standing(&self, learner: &LearnerId) -> Result<LearnerStanding, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (mail, push, in-app feed adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: LearningNotice) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningNotice {
    pub template: String,
    pub learner_id: LearnerId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of an enrollment for API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentView {
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub status: &'static str,
    pub progress_percent: f64,
    pub completed_lessons: usize,
    pub quizzes_attempted: usize,
}

impl EnrollmentRecord {
    pub fn view(&self) -> EnrollmentView {
        EnrollmentView {
            learner_id: self.learner_id.clone(),
            course_id: self.course_id.clone(),
            status: self.status.label(),
            progress_percent: self.progress_percent,
            completed_lessons: self.completed_lessons.len(),
            quizzes_attempted: self.quiz_scores.len(),
        }
    }
}
