use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::learning::domain::{
    Certificate, CourseId, CourseOutline, EnrollmentRecord, LearnerId, LearnerStanding, LessonId,
    ModuleOutline, Principal, QuizId, QuizSubmission,
};
use crate::workflows::learning::repository::{
    LearningNotice, LearningRepository, NotificationError, NotificationPublisher, RepositoryError,
};
use crate::workflows::learning::service::{LearningService, RewardPolicy};

pub(super) fn course_id() -> CourseId {
    CourseId("rust-101".to_string())
}

pub(super) fn lesson(id: &str) -> LessonId {
    LessonId(id.to_string())
}

pub(super) fn quiz(id: &str) -> QuizId {
    QuizId(id.to_string())
}

pub(super) fn learner() -> Principal {
    Principal::learner("learner-7")
}

/// Three lessons and two quizzes spread over two modules.
pub(super) fn outline() -> CourseOutline {
    CourseOutline {
        course_id: course_id(),
        title: "Rust Foundations".to_string(),
        modules: vec![
            ModuleOutline {
                module_id: "m1".to_string(),
                title: "Ownership".to_string(),
                lessons: vec![lesson("l1"), lesson("l2")],
                quizzes: vec![quiz("q1")],
            },
            ModuleOutline {
                module_id: "m2".to_string(),
                title: "Traits".to_string(),
                lessons: vec![lesson("l3")],
                quizzes: vec![quiz("q2")],
            },
        ],
    }
}

pub(super) fn answers(correct_answers: u32, total_questions: u32) -> QuizSubmission {
    QuizSubmission {
        correct_answers,
        total_questions,
    }
}

pub(super) fn policy() -> RewardPolicy {
    RewardPolicy {
        quiz_pass_points: 10,
        course_completion_points: 50,
    }
}

pub(super) fn build_service() -> (
    LearningService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::with_course(outline()));
    let notifications = Arc::new(MemoryNotifications::default());
    let service = LearningService::new(repository.clone(), notifications.clone(), policy());
    (service, repository, notifications)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    courses: Mutex<HashMap<CourseId, CourseOutline>>,
    enrollments: Mutex<HashMap<(LearnerId, CourseId), EnrollmentRecord>>,
    points: Mutex<HashMap<LearnerId, u32>>,
    pub(super) certificates: Mutex<Vec<Certificate>>,
}

impl MemoryRepository {
    pub(super) fn with_course(outline: CourseOutline) -> Self {
        let repository = Self::default();
        repository
            .courses
            .lock()
            .expect("course mutex poisoned")
            .insert(outline.course_id.clone(), outline);
        repository
    }

    pub(super) fn stored(&self, learner: &LearnerId, course: &CourseId) -> EnrollmentRecord {
        self.enrollments
            .lock()
            .expect("enrollment mutex poisoned")
            .get(&(learner.clone(), course.clone()))
            .cloned()
            .expect("enrollment stored")
    }
}

impl LearningRepository for MemoryRepository {
    fn course(&self, id: &CourseId) -> Result<Option<CourseOutline>, RepositoryError> {
        Ok(self.courses.lock().expect("course mutex poisoned").get(id).cloned())
    }

    fn enrollment(
        &self,
        learner: &LearnerId,
        course: &CourseId,
    ) -> Result<Option<EnrollmentRecord>, RepositoryError> {
        let guard = self.enrollments.lock().expect("enrollment mutex poisoned");
        Ok(guard.get(&(learner.clone(), course.clone())).cloned())
    }

    fn insert_enrollment(
        &self,
        record: EnrollmentRecord,
    ) -> Result<EnrollmentRecord, RepositoryError> {
        let mut guard = self.enrollments.lock().expect("enrollment mutex poisoned");
        let key = (record.learner_id.clone(), record.course_id.clone());
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn update_enrollment(&self, record: EnrollmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.enrollments.lock().expect("enrollment mutex poisoned");
        guard.insert((record.learner_id.clone(), record.course_id.clone()), record);
        Ok(())
    }

    fn add_points(&self, learner: &LearnerId, points: u32) -> Result<u32, RepositoryError> {
        let mut guard = self.points.lock().expect("points mutex poisoned");
        let balance = guard.entry(learner.clone()).or_insert(0);
        *balance = balance.saturating_add(points);
        Ok(*balance)
    }

    fn issue_certificate(&self, certificate: Certificate) -> Result<(), RepositoryError> {
        let mut guard = self.certificates.lock().expect("certificate mutex poisoned");
        if guard.iter().any(|held| {
            held.learner_id == certificate.learner_id && held.course_id == certificate.course_id
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(certificate);
        Ok(())
    }

    fn standing(&self, learner: &LearnerId) -> Result<LearnerStanding, RepositoryError> {
        let points = self
            .points
            .lock()
            .expect("points mutex poisoned")
            .get(learner)
            .copied()
            .unwrap_or(0);
        let certificates = self
            .certificates
            .lock()
            .expect("certificate mutex poisoned")
            .iter()
            .filter(|certificate| &certificate.learner_id == learner)
            .count();
        let certificates = u32::try_from(certificates).unwrap_or(u32::MAX);
        Ok(LearnerStanding {
            learner_id: learner.clone(),
            points,
            certificates,
        })
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifications {
    events: Mutex<Vec<LearningNotice>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<LearningNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notice: LearningNotice) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _notice: LearningNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay offline".to_string()))
    }
}

/// Wraps [`MemoryRepository`] with slow reads and one-shot write failures.
#[derive(Default)]
pub(super) struct FlakyRepository {
    pub(super) inner: MemoryRepository,
    read_delay: Option<Duration>,
    fail_update: AtomicBool,
    fail_points: AtomicBool,
    fail_certificate: AtomicBool,
}

impl FlakyRepository {
    pub(super) fn with_course(outline: CourseOutline) -> Self {
        Self {
            inner: MemoryRepository::with_course(outline),
            ..Self::default()
        }
    }

    pub(super) fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub(super) fn fail_next_update(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }

    pub(super) fn fail_next_points(&self) {
        self.fail_points.store(true, Ordering::SeqCst);
    }

    pub(super) fn fail_next_certificate(&self) {
        self.fail_certificate.store(true, Ordering::SeqCst);
    }
}

fn tripped(flag: &AtomicBool) -> Result<(), RepositoryError> {
    if flag.swap(false, Ordering::SeqCst) {
        return Err(RepositoryError::Unavailable("write timed out".to_string()));
    }
    Ok(())
}

impl LearningRepository for FlakyRepository {
    fn course(&self, id: &CourseId) -> Result<Option<CourseOutline>, RepositoryError> {
        self.inner.course(id)
    }

    fn enrollment(
        &self,
        learner: &LearnerId,
        course: &CourseId,
    ) -> Result<Option<EnrollmentRecord>, RepositoryError> {
        let record = self.inner.enrollment(learner, course)?;
        if let Some(delay) = self.read_delay {
            thread::sleep(delay);
        }
        Ok(record)
    }

    fn insert_enrollment(
        &self,
        record: EnrollmentRecord,
    ) -> Result<EnrollmentRecord, RepositoryError> {
        self.inner.insert_enrollment(record)
    }

    fn update_enrollment(&self, record: EnrollmentRecord) -> Result<(), RepositoryError> {
        tripped(&self.fail_update)?;
        self.inner.update_enrollment(record)
    }

    fn add_points(&self, learner: &LearnerId, points: u32) -> Result<u32, RepositoryError> {
        tripped(&self.fail_points)?;
        self.inner.add_points(learner, points)
    }

    fn issue_certificate(&self, certificate: Certificate) -> Result<(), RepositoryError> {
        tripped(&self.fail_certificate)?;
        self.inner.issue_certificate(certificate)
    }

    fn standing(&self, learner: &LearnerId) -> Result<LearnerStanding, RepositoryError> {
        self.inner.standing(learner)
    }
}

pub(super) fn build_flaky_service(
    repository: FlakyRepository,
) -> (
    LearningService<FlakyRepository, MemoryNotifications>,
    Arc<FlakyRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(repository);
    let notifications = Arc::new(MemoryNotifications::default());
    let service = LearningService::new(repository.clone(), notifications.clone(), policy());
    (service, repository, notifications)
}

pub(super) struct UnavailableRepository;

impl LearningRepository for UnavailableRepository {
    fn course(&self, _id: &CourseId) -> Result<Option<CourseOutline>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn enrollment(
        &self,
        _learner: &LearnerId,
        _course: &CourseId,
    ) -> Result<Option<EnrollmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_enrollment(
        &self,
        _record: EnrollmentRecord,
    ) -> Result<EnrollmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_enrollment(&self, _record: EnrollmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn add_points(&self, _learner: &LearnerId, _points: u32) -> Result<u32, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn issue_certificate(&self, _certificate: Certificate) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn standing(&self, _learner: &LearnerId) -> Result<LearnerStanding, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
