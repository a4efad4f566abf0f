use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;

use crate::core::time::primitive_now_utc;
use crate::db::types::AttendanceStatus;
use crate::services::actor::Actor;
use crate::services::attendance::{self, AttendanceInput};
use crate::services::enrollments::{self, EnrollmentDraft};
use crate::services::submissions::{self, SubmissionDraft};
use crate::test_support;

async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

#[tokio::test]
async fn create_course_applies_defaults_and_rejects_duplicate_code() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            None,
            Some(json!({ "code": "MATH101", "name": "Algebra" })),
        ))
        .await
        .expect("create course");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["credits"], 3);
    assert_eq!(created["enrolled_students_count"], 0);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            None,
            Some(json!({ "code": "MATH101", "name": "Geometry" })),
        ))
        .await
        .expect("duplicate course");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(body["field"], "code");
}

#[tokio::test]
async fn list_reports_active_enrollment_counts() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let course = test_support::insert_course(pool, "PHY101", "Physics").await;
    let student = test_support::insert_student(pool, "Asha", 1, 80.0).await;
    enrollments::create(
        pool,
        &Actor::anonymous(),
        EnrollmentDraft {
            student_id: student.id.clone(),
            course_id: course.id.clone(),
            ..Default::default()
        },
    )
    .await
    .expect("enroll");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/courses", None, None))
        .await
        .expect("list courses");
    let body = test_support::read_json(response).await;
    assert_eq!(body[0]["code"], "PHY101");
    assert_eq!(body[0]["enrolled_students_count"], 1);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{}/students", course.id),
            None,
            None,
        ))
        .await
        .expect("course students");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("students").len(), 1);
    assert_eq!(body[0]["name"], "Asha");
}

#[tokio::test]
async fn archive_keeps_rows_and_purge_cascades() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let actor = Actor::anonymous();
    let course = test_support::insert_course(pool, "CHEM1", "Chemistry").await;
    let student = test_support::insert_student(pool, "Ravi", 2, 72.0).await;

    enrollments::create(
        pool,
        &actor,
        EnrollmentDraft {
            student_id: student.id.clone(),
            course_id: course.id.clone(),
            ..Default::default()
        },
    )
    .await
    .expect("enroll");
    attendance::mark(
        pool,
        &actor,
        AttendanceInput {
            student_id: student.id.clone(),
            course_id: Some(course.id.clone()),
            date: test_support::date("2024-09-02"),
            status: AttendanceStatus::Present,
            remarks: None,
        },
    )
    .await
    .expect("mark attendance");
    let assignment =
        test_support::insert_assignment(pool, &course.id, "Lab report", primitive_now_utc()).await;
    submissions::create(
        pool,
        &actor,
        SubmissionDraft {
            assignment_id: assignment.id.clone(),
            student_id: student.id.clone(),
            submission_text: Some("done".to_string()),
            submission_file: None,
            submitted_at: None,
        },
    )
    .await
    .expect("submit");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/courses/{}", course.id),
            None,
            None,
        ))
        .await
        .expect("archive course");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(count_rows(pool, "courses").await, 1);
    assert_eq!(count_rows(pool, "enrollments").await, 1);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/courses", None, None))
        .await
        .expect("list courses");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("courses").len(), 0);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/courses/{}?purge=true", course.id),
            None,
            None,
        ))
        .await
        .expect("purge course");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for table in ["courses", "enrollments", "attendance", "assignments", "submissions"] {
        assert_eq!(count_rows(pool, table).await, 0, "{table} should be empty");
    }
    assert_eq!(count_rows(pool, "students").await, 1);
}

#[tokio::test]
async fn unknown_course_returns_404() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/courses/missing", None, None))
        .await
        .expect("get course");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_matches_underscore_literally() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_course(ctx.state.db(), "CS_101", "Programming").await;
    test_support::insert_course(ctx.state.db(), "ART2", "Drawing").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/courses?search=_", None, None))
        .await
        .expect("search courses");
    let body = test_support::read_json(response).await;
    let courses = body.as_array().expect("courses");
    assert_eq!(courses.len(), 1, "response: {body}");
    assert_eq!(courses[0]["code"], "CS_101");
}
