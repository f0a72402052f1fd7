//! Requests rejected by validation before touching the database.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_offline_app, send_json};
use serde_json::json;

#[tokio::test]
async fn unknown_status_is_rejected() {
    let app = build_offline_app();
    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/tickets/1/status",
        json!({ "status": "resolved", "actor_id": 2 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_priority_is_rejected() {
    let app = build_offline_app();
    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/tickets/1/priority",
        json!({ "priority": "urgent" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_comment_is_rejected() {
    let app = build_offline_app();
    let response = send_json(
        app,
        Method::POST,
        "/api/v1/tickets/1/comments",
        json!({ "user_id": 2, "content": "   " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_profile_email_is_rejected() {
    let app = build_offline_app();
    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/users/1/notifications",
        json!({ "email": "not-an-email", "notify_email": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_gateway_url_is_rejected() {
    let app = build_offline_app();
    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/users/1/notifications",
        json!({ "gateway_url": "hooks.example.com", "notify_gateway": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_mail_port_is_rejected() {
    let app = build_offline_app();
    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/admin/settings/mail",
        json!({ "smtp_server": "smtp.example.com", "smtp_port": "99999" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_from_address_is_rejected() {
    let app = build_offline_app();
    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/admin/settings/mail",
        json!({ "smtp_port": "587", "smtp_from_email": "helpdesk" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
