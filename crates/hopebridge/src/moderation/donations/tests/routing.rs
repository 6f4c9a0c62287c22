use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::moderation::donations::router::donation_router;
use crate::moderation::donations::service::DonationService;
use crate::moderation::identity::{CALLER_ID_HEADER, CALLER_ROLE_HEADER};

fn build_router() -> axum::Router {
    let (service, _) = build_service();
    donation_router(Arc::new(service))
}

fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CALLER_ID_HEADER, "ops-1")
        .header(CALLER_ROLE_HEADER, "admin")
        .body(Body::empty())
        .expect("request")
}

async fn submit_via(router: &axum::Router) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/donations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&submission()).expect("serialize submission"),
        ))
        .expect("request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json_body(response).await
}

#[tokio::test]
async fn public_submission_returns_pending_view() {
    let router = build_router();
    let payload = submit_via(&router).await;

    assert!(payload.get("donation_id").is_some());
    assert_eq!(payload.get("status").and_then(Value::as_str), Some("pending"));
    assert_eq!(payload.get("approved").and_then(Value::as_bool), Some(false));
    assert_eq!(payload.get("rejected").and_then(Value::as_bool), Some(false));
}

#[tokio::test]
async fn invalid_submission_is_unprocessable() {
    let router = build_router();
    let mut bad = submission();
    bad.amount_cents = 0;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/donations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&bad).expect("serialize")))
        .expect("request");

    let response = router.oneshot(request).await.expect("router dispatch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn approve_requires_admin_role() {
    let router = build_router();
    let payload = submit_via(&router).await;
    let id = payload
        .get("donation_id")
        .and_then(Value::as_str)
        .expect("donation id")
        .to_string();

    let member_request = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/donations/{id}/approve"))
        .header(CALLER_ID_HEADER, "user-7")
        .header(CALLER_ROLE_HEADER, "member")
        .body(Body::empty())
        .expect("request");

    let response = router
        .clone()
        .oneshot(member_request)
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .clone()
        .oneshot(admin_request(
            "POST",
            &format!("/api/v1/donations/{id}/approve"),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("approved").and_then(Value::as_bool), Some(true));
}

#[tokio::test]
async fn second_approve_conflicts() {
    let router = build_router();
    let payload = submit_via(&router).await;
    let id = payload
        .get("donation_id")
        .and_then(Value::as_str)
        .expect("donation id")
        .to_string();
    let uri = format!("/api/v1/donations/{id}/approve");

    let response = router
        .clone()
        .oneshot(admin_request("POST", &uri))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(admin_request("POST", &uri))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("finalized"));
}

#[tokio::test]
async fn get_unknown_donation_is_not_found() {
    let router = build_router();

    let response = router
        .oneshot(admin_request("GET", "/api/v1/donations/don-missing"))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_is_admin_only_and_honors_pending_filter() {
    let router = build_router();
    let payload = submit_via(&router).await;
    let id = payload
        .get("donation_id")
        .and_then(Value::as_str)
        .expect("donation id")
        .to_string();

    let anonymous_request = Request::builder()
        .method("GET")
        .uri("/api/v1/donations")
        .body(Body::empty())
        .expect("request");
    let response = router
        .clone()
        .oneshot(anonymous_request)
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .clone()
        .oneshot(admin_request(
            "POST",
            &format!("/api/v1/donations/{id}/reject"),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(admin_request(
            "GET",
            "/api/v1/donations?pending_only=true",
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let listed = payload.as_array().expect("array payload");
    assert!(listed.iter().all(|entry| {
        entry.get("status").and_then(Value::as_str) == Some("pending")
    }));
}

#[tokio::test]
async fn export_returns_csv_for_admins() {
    let router = build_router();
    submit_via(&router).await;

    let response = router
        .clone()
        .oneshot(admin_request("GET", "/api/v1/donations/export"))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/csv")
    );

    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    let text = String::from_utf8(body.to_vec()).expect("utf-8 body");
    assert!(text.starts_with("donation_id,campaign,amount"));
}
