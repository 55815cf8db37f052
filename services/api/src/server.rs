use crate::cli::ServeArgs;
use crate::infra::{
    seeded_catalog, AppState, InMemoryLearningRepository, InMemoryNotificationPublisher,
};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use skillbridge::config::AppConfig;
use skillbridge::error::AppError;
use skillbridge::telemetry;
use skillbridge::workflows::jobs::{JobMatchScorer, MatchingConfig};
use skillbridge::workflows::learning::{LearningService, RewardPolicy};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = seeded_catalog();
    let course_count = catalog.len();
    let repository = Arc::new(InMemoryLearningRepository::with_catalog(catalog));
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let learning_service = Arc::new(LearningService::new(
        repository,
        notifications,
        RewardPolicy::from(&config.engine),
    ));
    let scorer = Arc::new(JobMatchScorer::new(MatchingConfig::from(&config.engine)));

    let app = with_platform_routes(learning_service, scorer)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        courses = course_count,
        match_points_threshold = config.engine.match_points_threshold,
        "skillbridge engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
