use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

async fn notify(ctx: &test_support::TestContext, user_id: &str, title: &str) -> String {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/notifications",
            None,
            Some(json!({ "user_id": user_id, "title": title, "message": "body" })),
        ))
        .await
        .expect("create notification");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    body["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn mark_all_read_only_touches_callers_notifications() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let alice = test_support::insert_user(pool, "alice", "Alice").await;
    let bob = test_support::insert_user(pool, "bob", "Bob").await;

    notify(&ctx, &alice.id, "First").await;
    notify(&ctx, &alice.id, "Second").await;
    notify(&ctx, &bob.id, "For Bob").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/notifications/mark-all-read",
            Some(&alice.id),
            None,
        ))
        .await
        .expect("mark all read");
    let body = test_support::read_json(response).await;
    assert_eq!(body["count"], 2);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/notifications",
            Some(&bob.id),
            None,
        ))
        .await
        .expect("bob inbox");
    let body = test_support::read_json(response).await;
    assert_eq!(body["unread_count"], 1);
    assert_eq!(body["notifications"][0]["is_read"], false);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/notifications",
            Some(&alice.id),
            None,
        ))
        .await
        .expect("alice inbox");
    let body = test_support::read_json(response).await;
    assert_eq!(body["unread_count"], 0);
    assert_eq!(body["notifications"].as_array().expect("notifications").len(), 2);
}

#[tokio::test]
async fn mark_read_hides_other_users_notifications() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let alice = test_support::insert_user(pool, "alice", "Alice").await;
    let bob = test_support::insert_user(pool, "bob", "Bob").await;
    let notification_id = notify(&ctx, &alice.id, "Private").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/notifications/{notification_id}/read"),
            Some(&bob.id),
            None,
        ))
        .await
        .expect("bob marks");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/notifications/{notification_id}/read"),
            Some(&alice.id),
            None,
        ))
        .await
        .expect("alice marks");
    let body = test_support::read_json(response).await;
    assert_eq!(body["is_read"], true);
}

#[tokio::test]
async fn inbox_requires_actor() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/notifications", None, None))
        .await
        .expect("inbox");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Actor required");
}
