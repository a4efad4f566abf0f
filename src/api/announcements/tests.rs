use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn announcements_filter_by_class_and_archive() {
    let ctx = test_support::setup_test_context().await;
    let author = test_support::insert_user(ctx.state.db(), "principal", "Principal").await;

    let mut ids = Vec::new();
    for (title, target_class, priority) in
        [("Sports day", None, 1), ("Class 10 exam", Some("10"), 5)]
    {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/announcements",
                Some(&author.id),
                Some(json!({
                    "title": title,
                    "content": "Details",
                    "target_class": target_class,
                    "priority": priority,
                    "expires_at": "2020-01-01T00:00:00Z"
                })),
            ))
            .await
            .expect("create announcement");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
        assert_eq!(body["created_by"], author.id.as_str());
        assert_eq!(body["is_expired"], true);
        ids.push(body["id"].as_str().expect("id").to_string());
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/announcements?target_class=10",
            None,
            None,
        ))
        .await
        .expect("list announcements");
    let body = test_support::read_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .expect("announcements")
        .iter()
        .filter_map(|item| item["title"].as_str())
        .collect();
    assert!(titles.contains(&"Class 10 exam"));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/announcements/{}", ids[0]),
            None,
            Some(json!({ "title": "Sports day moved" })),
        ))
        .await
        .expect("update announcement");
    let body = test_support::read_json(response).await;
    assert_eq!(body["title"], "Sports day moved");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/announcements/{}", ids[1]),
            None,
            None,
        ))
        .await
        .expect("archive announcement");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/announcements", None, None))
        .await
        .expect("list announcements");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("announcements").len(), 1);
    assert_eq!(body[0]["title"], "Sports day moved");
}
