use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{ContentDraft, ContentId, ContentItem, ContentListingFilter, ContentView};
use super::repository::ContentRepository;
use super::service::{PublishingService, PublishingServiceError};
use crate::moderation::identity::CallerIdentity;
use crate::moderation::store::StoreError;

/// Router builder exposing content authoring and visibility endpoints.
pub fn content_router<R>(service: Arc<PublishingService<R>>) -> Router
where
    R: ContentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/content",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/content/:content_id", get(get_handler::<R>))
        .route(
            "/api/v1/content/:content_id/publish-toggle",
            post(toggle_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: PublishingServiceError) -> Response {
    let status = match &error {
        PublishingServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
        PublishingServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PublishingServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        PublishingServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        PublishingServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<PublishingService<R>>>,
    caller: CallerIdentity,
    axum::Json(draft): axum::Json<ContentDraft>,
) -> Response
where
    R: ContentRepository + 'static,
{
    match service.create(draft, &caller) {
        Ok(item) => (StatusCode::CREATED, axum::Json(item.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<PublishingService<R>>>,
    caller: CallerIdentity,
    Query(filter): Query<ContentListingFilter>,
) -> Response
where
    R: ContentRepository + 'static,
{
    match service.list(filter, &caller) {
        Ok(items) => {
            let views: Vec<ContentView> = items.iter().map(ContentItem::view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<PublishingService<R>>>,
    caller: CallerIdentity,
    Path(content_id): Path<String>,
) -> Response
where
    R: ContentRepository + 'static,
{
    let id = ContentId(content_id);
    match service.get(&id, &caller) {
        Ok(item) => (StatusCode::OK, axum::Json(item.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn toggle_handler<R>(
    State(service): State<Arc<PublishingService<R>>>,
    caller: CallerIdentity,
    Path(content_id): Path<String>,
) -> Response
where
    R: ContentRepository + 'static,
{
    let id = ContentId(content_id);
    match service.toggle_publish(&id, &caller) {
        Ok(item) => (StatusCode::OK, axum::Json(item.view())).into_response(),
        Err(error) => error_response(error),
    }
}
