use axum::http::{Method, StatusCode};
use serde_json::json;
use time::macros::datetime;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn submission_is_unique_per_student_and_can_be_graded() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let teacher = test_support::insert_user(pool, "teacher1", "Teacher One").await;
    let course = test_support::insert_course(pool, "ENG1", "English").await;
    let student = test_support::insert_student(pool, "Asha", 1, 75.0).await;
    let assignment =
        test_support::insert_assignment(pool, &course.id, "Essay", datetime!(2024-05-01 12:00))
            .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/submissions",
            None,
            Some(json!({
                "assignment_id": assignment.id,
                "student_id": student.id,
                "submission_text": "My essay",
                "submitted_at": "2024-05-02T09:00:00Z"
            })),
        ))
        .await
        .expect("submit");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["is_late"], true);
    assert_eq!(created["marks_obtained"], serde_json::Value::Null);
    let submission_id = created["id"].as_str().expect("id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/submissions",
            None,
            Some(json!({ "assignment_id": assignment.id, "student_id": student.id })),
        ))
        .await
        .expect("submit again");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(body["field"], "student_id");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{submission_id}/grade"),
            Some(&teacher.id),
            Some(json!({ "marks_obtained": 42.5, "feedback": "Good structure" })),
        ))
        .await
        .expect("grade");
    let status = response.status();
    let graded = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {graded}");
    assert_eq!(graded["marks_obtained"], 42.5);
    assert_eq!(graded["graded_by"], teacher.id.as_str());
    assert!(graded["graded_at"].is_string());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assignments/{}", assignment.id),
            None,
            None,
        ))
        .await
        .expect("assignment detail");
    let body = test_support::read_json(response).await;
    assert_eq!(body["submissions"].as_array().expect("submissions").len(), 1);
}

#[tokio::test]
async fn grading_rejects_negative_marks_and_unknown_actor() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/submissions/missing/grade",
            None,
            Some(json!({ "marks_obtained": -1 })),
        ))
        .await
        .expect("grade");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["field"], "marks_obtained");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/submissions/missing/grade",
            Some("nobody"),
            Some(json!({ "marks_obtained": 10 })),
        ))
        .await
        .expect("grade");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
