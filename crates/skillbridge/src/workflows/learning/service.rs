use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    Certificate, CourseId, CourseOutline, EnrollmentRecord, EnrollmentStatus, LearnerId,
    LearnerStanding, LessonId, Principal, QuizId, QuizSubmission,
};
use super::progress::{compute, CourseProgressInput, CourseProgressResult};
use super::quiz::{grade, points_for_attempt, QuizGrade};
use super::repository::{
    EnrollmentView, LearningNotice, LearningRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
use crate::config::EngineConfig;

/// Points granted by the learning flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardPolicy {
    pub quiz_pass_points: u32,
    pub course_completion_points: u32,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        RewardPolicy::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for RewardPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            quiz_pass_points: config.quiz_pass_points,
            course_completion_points: config.course_completion_points,
        }
    }
}

/// Result of any operation that may move a learner's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub enrollment: EnrollmentView,
    pub progress: CourseProgressResult,
    pub points_awarded: u32,
    pub certificate_issued: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizOutcome {
    pub grade: QuizGrade,
    pub best_score: u8,
    pub update: ProgressUpdate,
}

type EnrollmentKey = (LearnerId, CourseId);

/// Service composing the repository, notification hook and progress calculator.
///
/// Every write for one (learner, course) pair runs under that pair's lock, so
/// concurrent requests cannot lose lessons or pay first-pass points twice.
pub struct LearningService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
    policy: RewardPolicy,
    locks: Mutex<HashMap<EnrollmentKey, Arc<Mutex<()>>>>,
}

impl<R, N> LearningService<R, N>
where
    R: LearningRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>, policy: RewardPolicy) -> Self {
        Self {
            repository,
            notifications,
            policy,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Register the principal in a course, reactivating a dropped enrollment.
    pub fn enroll(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> Result<EnrollmentRecord, LearningServiceError> {
        self.outline(course_id)?;
        let lock = self.enrollment_lock(principal, course_id)?;
        let _guard = lock.lock().map_err(|_| lock_poisoned())?;

        match self.repository.enrollment(&principal.learner_id, course_id)? {
            Some(mut record) if record.status == EnrollmentStatus::Dropped => {
                record.status = if record.completed_at.is_some() {
                    EnrollmentStatus::Completed
                } else {
                    EnrollmentStatus::Active
                };
                self.repository.update_enrollment(record.clone())?;
                info!(learner = %principal.learner_id.0, course = %course_id.0, "enrollment reactivated");
                Ok(record)
            }
            Some(_) => Err(LearningServiceError::AlreadyEnrolled(course_id.0.clone())),
            None => {
                let record = EnrollmentRecord::new(
                    principal.learner_id.clone(),
                    course_id.clone(),
                    Utc::now(),
                );
                let stored = self.repository.insert_enrollment(record)?;
                info!(learner = %principal.learner_id.0, course = %course_id.0, "learner enrolled");
                Ok(stored)
            }
        }
    }

    /// Mark a lesson as viewed. Repeating the call is harmless.
    pub fn complete_lesson(
        &self,
        principal: &Principal,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<ProgressUpdate, LearningServiceError> {
        let outline = self.outline(course_id)?;
        if !outline.has_lesson(lesson_id) {
            return Err(LearningServiceError::UnknownLesson {
                course: course_id.0.clone(),
                lesson: lesson_id.0.clone(),
            });
        }

        let lock = self.enrollment_lock(principal, course_id)?;
        let _guard = lock.lock().map_err(|_| lock_poisoned())?;
        let mut record = self.active_enrollment(principal, course_id)?;
        record.completed_lessons.insert(lesson_id.clone());

        self.refresh(&outline, record, 0)
    }

    /// Grade a quiz attempt, keep the best score and award first-pass points.
    pub fn submit_quiz(
        &self,
        principal: &Principal,
        course_id: &CourseId,
        quiz_id: &QuizId,
        submission: QuizSubmission,
    ) -> Result<QuizOutcome, LearningServiceError> {
        let outline = self.outline(course_id)?;
        if !outline.has_quiz(quiz_id) {
            return Err(LearningServiceError::UnknownQuiz {
                course: course_id.0.clone(),
                quiz: quiz_id.0.clone(),
            });
        }

        let lock = self.enrollment_lock(principal, course_id)?;
        let _guard = lock.lock().map_err(|_| lock_poisoned())?;
        let mut record = self.active_enrollment(principal, course_id)?;
        let grade = grade(submission);
        let previous_best = record.quiz_scores.get(quiz_id).copied();
        let quiz_points = points_for_attempt(previous_best, grade, self.policy.quiz_pass_points);

        let best_score = previous_best.map_or(grade.score, |best| best.max(grade.score));
        record.quiz_scores.insert(quiz_id.clone(), best_score);
        debug!(
            learner = %principal.learner_id.0,
            quiz = %quiz_id.0,
            score = grade.score,
            passed = grade.passed,
            "quiz attempt graded"
        );

        let update = self.refresh(&outline, record, quiz_points)?;
        Ok(QuizOutcome {
            grade,
            best_score,
            update,
        })
    }

    /// Withdraw from a course. Recorded progress is kept.
    pub fn drop_course(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> Result<EnrollmentRecord, LearningServiceError> {
        let lock = self.enrollment_lock(principal, course_id)?;
        let _guard = lock.lock().map_err(|_| lock_poisoned())?;
        let mut record = self.active_enrollment(principal, course_id)?;
        record.status = EnrollmentStatus::Dropped;
        self.repository.update_enrollment(record.clone())?;
        Ok(record)
    }

    /// Recompute progress from the stored facts without changing them.
    pub fn progress(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> Result<CourseProgressResult, LearningServiceError> {
        let outline = self.outline(course_id)?;
        let record = self.enrollment(principal, course_id)?;
        Ok(compute(CourseProgressInput::from_enrollment(
            &outline, &record,
        )))
    }

    pub fn standing(&self, principal: &Principal) -> Result<LearnerStanding, LearningServiceError> {
        Ok(self.repository.standing(&principal.learner_id)?)
    }

    fn enrollment_lock(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> Result<Arc<Mutex<()>>, LearningServiceError> {
        let mut locks = self.locks.lock().map_err(|_| lock_poisoned())?;
        let lock = locks
            .entry((principal.learner_id.clone(), course_id.clone()))
            .or_default();
        Ok(Arc::clone(lock))
    }

    fn outline(&self, course_id: &CourseId) -> Result<CourseOutline, LearningServiceError> {
        self.repository
            .course(course_id)?
            .ok_or_else(|| LearningServiceError::UnknownCourse(course_id.0.clone()))
    }

    fn enrollment(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> Result<EnrollmentRecord, LearningServiceError> {
        self.repository
            .enrollment(&principal.learner_id, course_id)?
            .ok_or_else(|| LearningServiceError::NotEnrolled {
                learner: principal.learner_id.0.clone(),
                course: course_id.0.clone(),
            })
    }

    fn active_enrollment(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> Result<EnrollmentRecord, LearningServiceError> {
        let record = self.enrollment(principal, course_id)?;
        if record.status == EnrollmentStatus::Dropped {
            return Err(LearningServiceError::EnrollmentInactive(course_id.0.clone()));
        }
        Ok(record)
    }

    /// Persist recomputed progress, then pay quiz points and settle a
    /// first-time course completion.
    ///
    /// Facts are saved before anything is paid. Completion is stamped only
    /// after the certificate and points went through, so a failed settlement
    /// is picked up again by the next write on the enrollment.
    fn refresh(
        &self,
        outline: &CourseOutline,
        mut record: EnrollmentRecord,
        quiz_points: u32,
    ) -> Result<ProgressUpdate, LearningServiceError> {
        let progress = compute(CourseProgressInput::from_enrollment(outline, &record));
        if progress.progress_percent > 100.0 {
            warn!(
                learner = %record.learner_id.0,
                course = %record.course_id.0,
                progress = progress.progress_percent,
                "progress exceeds 100 percent"
            );
        }
        record.progress_percent = progress.progress_percent;
        self.repository.update_enrollment(record.clone())?;

        let mut points_awarded = 0;
        if quiz_points > 0 {
            self.repository.add_points(&record.learner_id, quiz_points)?;
            points_awarded += quiz_points;
        }

        let newly_completed = progress.is_complete() && record.completed_at.is_none();
        if newly_completed {
            points_awarded += self.settle_completion(&mut record)?;
        }

        Ok(ProgressUpdate {
            enrollment: record.view(),
            progress,
            points_awarded,
            certificate_issued: newly_completed,
        })
    }

    fn settle_completion(
        &self,
        record: &mut EnrollmentRecord,
    ) -> Result<u32, LearningServiceError> {
        let issued_at = Utc::now();
        match self.repository.issue_certificate(Certificate {
            learner_id: record.learner_id.clone(),
            course_id: record.course_id.clone(),
            issued_at,
        }) {
            Ok(()) => {}
            // Issued by an earlier attempt whose settlement failed later on.
            Err(RepositoryError::Conflict) => debug!(
                learner = %record.learner_id.0,
                course = %record.course_id.0,
                "certificate already on file"
            ),
            Err(err) => return Err(err.into()),
        }

        let points = self.policy.course_completion_points;
        if points > 0 {
            self.repository.add_points(&record.learner_id, points)?;
        }

        record.status = EnrollmentStatus::Completed;
        record.completed_at = Some(issued_at);
        self.repository.update_enrollment(record.clone())?;

        let mut details = BTreeMap::new();
        details.insert("course_id".to_string(), record.course_id.0.clone());
        details.insert("issued_at".to_string(), issued_at.to_rfc3339());
        self.notifications.publish(LearningNotice {
            template: "course_completed".to_string(),
            learner_id: record.learner_id.clone(),
            details,
        })?;

        info!(learner = %record.learner_id.0, course = %record.course_id.0, "course completed");
        Ok(points)
    }
}

fn lock_poisoned() -> LearningServiceError {
    LearningServiceError::Repository(RepositoryError::Unavailable(
        "enrollment lock poisoned".to_string(),
    ))
}

/// Error raised by the learning service.
#[derive(Debug, thiserror::Error)]
pub enum LearningServiceError {
    #[error("course {0} not found")]
    UnknownCourse(String),
    #[error("lesson {lesson} is not part of course {course}")]
    UnknownLesson { course: String, lesson: String },
    #[error("quiz {quiz} is not part of course {course}")]
    UnknownQuiz { course: String, quiz: String },
    #[error("learner {learner} is not enrolled in course {course}")]
    NotEnrolled { learner: String, course: String },
    #[error("learner is already enrolled in course {0}")]
    AlreadyEnrolled(String),
    #[error("enrollment in course {0} has been dropped")]
    EnrollmentInactive(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
