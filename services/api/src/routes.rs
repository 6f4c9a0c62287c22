use crate::infra::{
    AppState, InMemoryContentRepository, InMemoryDonationRepository, InMemoryEnrollmentRepository,
    InMemoryTrainingRepository,
};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use hopebridge::moderation::donations::{donation_router, DonationService};
use hopebridge::moderation::enrollments::{enrollment_router, EnrollmentService};
use hopebridge::moderation::publishing::{content_router, PublishingService};

pub(crate) struct PlatformServices {
    pub(crate) donations: Arc<DonationService<InMemoryDonationRepository>>,
    pub(crate) enrollments:
        Arc<EnrollmentService<InMemoryTrainingRepository, InMemoryEnrollmentRepository>>,
    pub(crate) publishing: Arc<PublishingService<InMemoryContentRepository>>,
}

pub(crate) fn with_platform_routes(services: PlatformServices) -> axum::Router {
    donation_router(services.donations)
        .merge(enrollment_router(services.enrollments))
        .merge(content_router(services.publishing))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
