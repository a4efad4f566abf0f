use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn assignment_lifecycle_through_api() {
    let ctx = test_support::setup_test_context().await;
    let course = test_support::insert_course(ctx.state.db(), "CS101", "Programming").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/assignments",
            None,
            Some(json!({
                "course_id": course.id,
                "title": "  Loops  ",
                "description": "Write three loops",
                "due_date": "2020-01-01T10:00:00Z"
            })),
        ))
        .await
        .expect("create assignment");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["title"], "Loops");
    assert_eq!(created["total_marks"], 100);
    assert_eq!(created["course_name"], "Programming");
    assert_eq!(created["is_overdue"], true);
    let assignment_id = created["id"].as_str().expect("id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/assignments/{assignment_id}"),
            None,
            Some(json!({ "total_marks": 50, "due_date": "2999-01-01T00:00:00Z" })),
        ))
        .await
        .expect("update assignment");
    let updated = test_support::read_json(response).await;
    assert_eq!(updated["total_marks"], 50);
    assert_eq!(updated["is_overdue"], false);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assignments?course={}", course.id),
            None,
            None,
        ))
        .await
        .expect("list assignments");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("assignments").len(), 1);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/assignments/{assignment_id}"),
            None,
            None,
        ))
        .await
        .expect("archive assignment");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/assignments", None, None))
        .await
        .expect("list assignments");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("assignments").len(), 0);
}

#[tokio::test]
async fn assignment_rejects_non_positive_total_marks() {
    let ctx = test_support::setup_test_context().await;
    let course = test_support::insert_course(ctx.state.db(), "CS102", "Data").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/assignments",
            None,
            Some(json!({
                "course_id": course.id,
                "title": "Arrays",
                "due_date": "2030-01-01T10:00:00Z",
                "total_marks": 0
            })),
        ))
        .await
        .expect("create assignment");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["field"], "total_marks");
}
