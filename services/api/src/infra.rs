use metrics_exporter_prometheus::PrometheusHandle;
use skillbridge::workflows::learning::{
    Certificate, CourseId, CourseOutline, EnrollmentRecord, LearnerId, LearnerStanding,
    LearningNotice, LearningRepository, LessonId, ModuleOutline, NotificationError,
    NotificationPublisher, QuizId, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct LearningStore {
    courses: HashMap<CourseId, CourseOutline>,
    enrollments: HashMap<(LearnerId, CourseId), EnrollmentRecord>,
    points: HashMap<LearnerId, u32>,
    certificates: Vec<Certificate>,
}

/// Process-local learning store used by the HTTP service and the demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLearningRepository {
    store: Arc<Mutex<LearningStore>>,
}

impl InMemoryLearningRepository {
    pub(crate) fn with_catalog(courses: Vec<CourseOutline>) -> Self {
        let store = LearningStore {
            courses: courses
                .into_iter()
                .map(|outline| (outline.course_id.clone(), outline))
                .collect(),
            ..LearningStore::default()
        };
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LearningStore>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Unavailable("learning store lock poisoned".to_string()))
    }
}

impl LearningRepository for InMemoryLearningRepository {
    fn course(&self, id: &CourseId) -> Result<Option<CourseOutline>, RepositoryError> {
        Ok(self.lock()?.courses.get(id).cloned())
    }

    fn enrollment(
        &self,
        learner: &LearnerId,
        course: &CourseId,
    ) -> Result<Option<EnrollmentRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .enrollments
            .get(&(learner.clone(), course.clone()))
            .cloned())
    }

    fn insert_enrollment(
        &self,
        record: EnrollmentRecord,
    ) -> Result<EnrollmentRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let key = (record.learner_id.clone(), record.course_id.clone());
        if guard.enrollments.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.enrollments.insert(key, record.clone());
        Ok(record)
    }

    fn update_enrollment(&self, record: EnrollmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let key = (record.learner_id.clone(), record.course_id.clone());
        if guard.enrollments.contains_key(&key) {
            guard.enrollments.insert(key, record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn add_points(&self, learner: &LearnerId, points: u32) -> Result<u32, RepositoryError> {
        let mut guard = self.lock()?;
        let balance = guard.points.entry(learner.clone()).or_insert(0);
        *balance = balance.saturating_add(points);
        Ok(*balance)
    }

    fn issue_certificate(&self, certificate: Certificate) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let duplicate = guard.certificates.iter().any(|held| {
            held.learner_id == certificate.learner_id && held.course_id == certificate.course_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.certificates.push(certificate);
        Ok(())
    }

    fn standing(&self, learner: &LearnerId) -> Result<LearnerStanding, RepositoryError> {
        let guard = self.lock()?;
        let points = guard.points.get(learner).copied().unwrap_or(0);
        let held = guard
            .certificates
            .iter()
            .filter(|certificate| &certificate.learner_id == learner)
            .count();
        let certificates = u32::try_from(held).unwrap_or(u32::MAX);
        Ok(LearnerStanding {
            learner_id: learner.clone(),
            points,
            certificates,
        })
    }
}

/// Notification sink that records notices and logs them at debug level.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<LearningNotice>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notice: LearningNotice) -> Result<(), NotificationError> {
        debug!(template = %notice.template, learner = %notice.learner_id.0, "notice queued");
        self.events
            .lock()
            .map_err(|_| NotificationError::Transport("notice queue lock poisoned".to_string()))?
            .push(notice);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<LearningNotice> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

/// Starter catalog served until a real course store is wired in.
pub(crate) fn seeded_catalog() -> Vec<CourseOutline> {
    let lesson = |id: &str| LessonId(id.to_string());
    let quiz = |id: &str| QuizId(id.to_string());

    vec![
        CourseOutline {
            course_id: CourseId("web-development-basics".to_string()),
            title: "Web Development Basics".to_string(),
            modules: vec![
                ModuleOutline {
                    module_id: "html-css".to_string(),
                    title: "HTML and CSS".to_string(),
                    lessons: vec![lesson("html-structure"), lesson("css-layout")],
                    quizzes: vec![quiz("markup-check")],
                },
                ModuleOutline {
                    module_id: "php".to_string(),
                    title: "Server-side PHP".to_string(),
                    lessons: vec![lesson("php-syntax"), lesson("laravel-routing")],
                    quizzes: vec![quiz("php-check")],
                },
            ],
        },
        CourseOutline {
            course_id: CourseId("data-analysis".to_string()),
            title: "Data Analysis with SQL".to_string(),
            modules: vec![ModuleOutline {
                module_id: "sql".to_string(),
                title: "Querying".to_string(),
                lessons: vec![lesson("select-basics"), lesson("joins"), lesson("aggregates")],
                quizzes: vec![quiz("sql-check")],
            }],
        },
    ]
}
