use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{Donation, DonationId, DonationSubmission, DonationView};
use super::repository::DonationRepository;
use super::service::{DonationService, DonationServiceError};
use crate::moderation::identity::CallerIdentity;
use crate::moderation::lifecycle::ListingFilter;
use crate::moderation::store::StoreError;

/// Router builder exposing donation intake and moderation endpoints.
pub fn donation_router<R>(service: Arc<DonationService<R>>) -> Router
where
    R: DonationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/donations",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/donations/export", get(export_handler::<R>))
        .route("/api/v1/donations/:donation_id", get(get_handler::<R>))
        .route(
            "/api/v1/donations/:donation_id/approve",
            post(approve_handler::<R>),
        )
        .route(
            "/api/v1/donations/:donation_id/reject",
            post(reject_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: DonationServiceError) -> Response {
    let status = match &error {
        DonationServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
        DonationServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DonationServiceError::Lifecycle(_) => StatusCode::CONFLICT,
        DonationServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        DonationServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        DonationServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        DonationServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    axum::Json(submission): axum::Json<DonationSubmission>,
) -> Response
where
    R: DonationRepository + 'static,
{
    match service.submit(submission) {
        Ok(donation) => (StatusCode::CREATED, axum::Json(donation.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    caller: CallerIdentity,
    Query(filter): Query<ListingFilter>,
) -> Response
where
    R: DonationRepository + 'static,
{
    match service.list(filter, &caller) {
        Ok(donations) => {
            let views: Vec<DonationView> = donations.iter().map(Donation::view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    caller: CallerIdentity,
) -> Response
where
    R: DonationRepository + 'static,
{
    match service.export(&caller) {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            csv,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    caller: CallerIdentity,
    Path(donation_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
{
    let id = DonationId(donation_id);
    match service.get(&id, &caller) {
        Ok(donation) => (StatusCode::OK, axum::Json(donation.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    caller: CallerIdentity,
    Path(donation_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
{
    let id = DonationId(donation_id);
    match service.approve(&id, &caller) {
        Ok(donation) => (StatusCode::OK, axum::Json(donation.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    caller: CallerIdentity,
    Path(donation_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
{
    let id = DonationId(donation_id);
    match service.reject(&id, &caller) {
        Ok(donation) => (StatusCode::OK, axum::Json(donation.view())).into_response(),
        Err(error) => error_response(error),
    }
}
