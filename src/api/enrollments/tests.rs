use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn enrollment_pair_is_unique_even_when_inactive() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let student = test_support::insert_student(pool, "Asha", 1, 80.0).await;
    let course = test_support::insert_course(pool, "BIO1", "Biology").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            None,
            Some(json!({ "student": student.id, "course": course.id })),
        ))
        .await
        .expect("enroll");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["student_name"], "Asha");
    assert_eq!(created["course_code"], "BIO1");
    let enrollment_id = created["id"].as_str().expect("id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/enrollments/{enrollment_id}"),
            None,
            Some(json!({ "is_active": false, "final_grade": "B", "final_marks": 81.5 })),
        ))
        .await
        .expect("update enrollment");
    let updated = test_support::read_json(response).await;
    assert_eq!(updated["is_active"], false);
    assert_eq!(updated["final_grade"], "B");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            None,
            Some(json!({ "student_id": student.id, "course_id": course.id })),
        ))
        .await
        .expect("enroll again");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(body["field"], "course_id");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/students/{}/courses", student.id),
            None,
            None,
        ))
        .await
        .expect("student courses");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("courses").len(), 0);
}

#[tokio::test]
async fn enrollment_rejects_out_of_range_final_marks() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let student = test_support::insert_student(pool, "Ravi", 2, 60.0).await;
    let course = test_support::insert_course(pool, "ART1", "Art").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            None,
            Some(json!({ "student_id": student.id, "course_id": course.id, "final_marks": 120 })),
        ))
        .await
        .expect("enroll");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["field"], "final_marks");
}

#[tokio::test]
async fn enrollment_for_unknown_student_is_404() {
    let ctx = test_support::setup_test_context().await;
    let course = test_support::insert_course(ctx.state.db(), "ART2", "Sculpture").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            None,
            Some(json!({ "student_id": "missing", "course_id": course.id })),
        ))
        .await
        .expect("enroll");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
