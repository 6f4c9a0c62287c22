use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Enrollment, EnrollmentId, EnrollmentRequest, EnrollmentView, TrainingDraft, TrainingFilter,
    TrainingId, TrainingUpdate,
};
use super::repository::{EnrollmentRepository, TrainingRepository};
use super::service::{EnrollmentService, EnrollmentServiceError};
use crate::moderation::identity::CallerIdentity;
use crate::moderation::lifecycle::{ListingFilter, ModerationDecision};
use crate::moderation::store::StoreError;

/// Router builder exposing the training catalog and enrollment endpoints.
pub fn enrollment_router<T, E>(service: Arc<EnrollmentService<T, E>>) -> Router
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/trainings",
            post(create_training_handler::<T, E>).get(list_trainings_handler::<T, E>),
        )
        .route(
            "/api/v1/trainings/:training_id",
            get(get_training_handler::<T, E>).patch(update_training_handler::<T, E>),
        )
        .route(
            "/api/v1/enrollments",
            post(apply_handler::<T, E>).get(list_enrollments_handler::<T, E>),
        )
        .route(
            "/api/v1/enrollments/:enrollment_id",
            get(get_enrollment_handler::<T, E>),
        )
        .route(
            "/api/v1/enrollments/:enrollment_id/status",
            post(update_status_handler::<T, E>),
        )
        .route(
            "/api/v1/enrollments/:enrollment_id/payment-confirmation",
            post(payment_confirmation_handler::<T, E>),
        )
        .with_state(service)
}

/// Body of the admin status endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateEnrollmentStatusRequest {
    pub decision: ModerationDecision,
}

/// Body posted by the settlement provider's webhook relay.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentConfirmationRequest {
    #[serde(default)]
    pub payment_intent: Option<String>,
}

fn error_response(error: EnrollmentServiceError) -> Response {
    let status = match &error {
        EnrollmentServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
        EnrollmentServiceError::InvalidTraining(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EnrollmentServiceError::InvalidEnrollment(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EnrollmentServiceError::Lifecycle(_) => StatusCode::CONFLICT,
        EnrollmentServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        EnrollmentServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        EnrollmentServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_training_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    caller: CallerIdentity,
    axum::Json(draft): axum::Json<TrainingDraft>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    match service.create_training(draft, &caller) {
        Ok(training) => (StatusCode::CREATED, axum::Json(training)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_training_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    caller: CallerIdentity,
    Path(training_id): Path<String>,
    axum::Json(update): axum::Json<TrainingUpdate>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    let id = TrainingId(training_id);
    match service.update_training(&id, update, &caller) {
        Ok(training) => (StatusCode::OK, axum::Json(training)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_training_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    Path(training_id): Path<String>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    let id = TrainingId(training_id);
    match service.get_training(&id) {
        Ok(training) => (StatusCode::OK, axum::Json(training)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_trainings_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    Query(filter): Query<TrainingFilter>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    match service.list_trainings(filter) {
        Ok(trainings) => (StatusCode::OK, axum::Json(trainings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    axum::Json(request): axum::Json<EnrollmentRequest>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    match service.apply(request) {
        Ok(enrollment) => (StatusCode::CREATED, axum::Json(enrollment.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_enrollments_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    caller: CallerIdentity,
    Query(filter): Query<ListingFilter>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    match service.list(filter, &caller) {
        Ok(enrollments) => {
            let views: Vec<EnrollmentView> =
                enrollments.iter().map(Enrollment::view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_enrollment_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    caller: CallerIdentity,
    Path(enrollment_id): Path<String>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    let id = EnrollmentId(enrollment_id);
    match service.get(&id, &caller) {
        Ok(enrollment) => (StatusCode::OK, axum::Json(enrollment.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    caller: CallerIdentity,
    Path(enrollment_id): Path<String>,
    axum::Json(request): axum::Json<UpdateEnrollmentStatusRequest>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    let id = EnrollmentId(enrollment_id);
    match service.update_status(&id, request.decision, &caller) {
        Ok(enrollment) => (StatusCode::OK, axum::Json(enrollment.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn payment_confirmation_handler<T, E>(
    State(service): State<Arc<EnrollmentService<T, E>>>,
    Path(enrollment_id): Path<String>,
    axum::Json(request): axum::Json<PaymentConfirmationRequest>,
) -> Response
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    let id = EnrollmentId(enrollment_id);
    match service.confirm_payment(&id, request.payment_intent) {
        Ok(enrollment) => (StatusCode::OK, axum::Json(enrollment.view())).into_response(),
        Err(error) => error_response(error),
    }
}
