use crate::cli::ServeArgs;
use crate::infra::{
    seed_demo_data, AppState, InMemoryContentRepository, InMemoryDonationRepository,
    InMemoryEnrollmentRepository, InMemoryTrainingRepository,
};
use crate::routes::{with_platform_routes, PlatformServices};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use hopebridge::config::AppConfig;
use hopebridge::error::AppError;
use hopebridge::moderation::donations::DonationService;
use hopebridge::moderation::enrollments::EnrollmentService;
use hopebridge::moderation::publishing::PublishingService;
use hopebridge::telemetry;
use tracing::{info, warn};

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

    let donation_repository = Arc::new(InMemoryDonationRepository::default());
    let training_repository = Arc::new(InMemoryTrainingRepository::default());
    let enrollment_repository = Arc::new(InMemoryEnrollmentRepository::default());
    let content_repository = Arc::new(InMemoryContentRepository::default());

    if config.store.seed_demo_data {
        if let Err(err) = seed_demo_data(&training_repository, &content_repository) {
            warn!(%err, "demo data seeding skipped");
        }
    }

    let services = PlatformServices {
        donations: Arc::new(DonationService::new(donation_repository)),
        enrollments: Arc::new(EnrollmentService::new(
            training_repository,
            enrollment_repository,
        )),
        publishing: Arc::new(PublishingService::new(content_repository)),
    };

    let app = with_platform_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "nonprofit platform api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
