//! Course delivery: enrollments, lesson completion, quiz attempts and the
//! progress percentage stored on every enrollment.

pub mod domain;
pub mod progress;
pub mod quiz;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Certificate, CourseId, CourseOutline, EnrollmentRecord, EnrollmentStatus, LearnerId,
    LearnerStanding, LessonId, ModuleOutline, Principal, QuizId, QuizSubmission,
};
pub use progress::{compute, CourseProgressInput, CourseProgressResult, ProgressRequest};
pub use quiz::{grade, QuizAttemptRequest, QuizGrade, PASS_THRESHOLD};
pub use repository::{
    EnrollmentView, LearningNotice, LearningRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
pub use router::{learning_router, LEARNER_HEADER};
pub use service::{LearningService, LearningServiceError, ProgressUpdate, QuizOutcome, RewardPolicy};
