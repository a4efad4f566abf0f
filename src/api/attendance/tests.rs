use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::core::config::Settings;
use crate::db::types::AttendanceStatus;
use crate::repositories::attendance::MarkOutcome;
use crate::services::actor::Actor;
use crate::services::attendance::{self, AttendanceInput};
use crate::services::enrollments::{self, EnrollmentDraft};
use crate::test_support;

#[tokio::test]
async fn marking_same_day_without_course_overwrites_single_record() {
    let ctx = test_support::setup_test_context().await;
    let student = test_support::insert_student(ctx.state.db(), "Asha", 1, 80.0).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/attendance",
            None,
            Some(json!({ "student_id": student.id, "date": "2024-09-02", "status": "present" })),
        ))
        .await
        .expect("first mark");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["created"], true);
    assert_eq!(body["attendance"]["status_label"], "Present");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/attendance",
            None,
            Some(json!({
                "student_id": student.id,
                "date": "2024-09-02",
                "status": "A",
                "remarks": "sick"
            })),
        ))
        .await
        .expect("second mark");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["created"], false);
    assert_eq!(body["attendance"]["status"], "absent");
    assert_eq!(body["attendance"]["remarks"], "sick");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/attendance?student={}", student.id),
            None,
            None,
        ))
        .await
        .expect("list attendance");
    let body = test_support::read_json(response).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["page_size"], 20);
}

#[tokio::test]
async fn course_marking_skips_students_without_active_enrollment() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let course = test_support::insert_course(pool, "HIS1", "History").await;
    let enrolled = test_support::insert_student(pool, "Enrolled", 1, 70.0).await;
    let outsider = test_support::insert_student(pool, "Outsider", 2, 70.0).await;
    enrollments::create(
        pool,
        &Actor::anonymous(),
        EnrollmentDraft {
            student_id: enrolled.id.clone(),
            course_id: course.id.clone(),
            ..Default::default()
        },
    )
    .await
    .expect("enroll");

    let sheet = json!({
        "course_id": course.id,
        "date": "2024-09-03",
        "entries": [
            { "student_id": enrolled.id, "status": "late" },
            { "student_id": outsider.id, "status": "present" }
        ]
    });

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/attendance/mark",
            None,
            Some(sheet.clone()),
        ))
        .await
        .expect("mark course");
    let body = test_support::read_json(response).await;
    assert_eq!(body, json!({ "created": 1, "updated": 0, "skipped": 1 }));

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/attendance/mark",
            None,
            Some(sheet),
        ))
        .await
        .expect("mark course again");
    let body = test_support::read_json(response).await;
    assert_eq!(body, json!({ "created": 0, "updated": 1, "skipped": 1 }));
}

#[tokio::test]
async fn report_counts_present_records_and_export_labels_status() {
    let ctx = test_support::setup_test_context().await;
    let student = test_support::insert_student(ctx.state.db(), "Meera", 7, 90.0).await;

    for (date, status) in [("2024-09-02", "present"), ("2024-09-03", "absent")] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/attendance",
                None,
                Some(json!({ "student_id": student.id, "date": date, "status": status })),
            ))
            .await
            .expect("mark");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/attendance/report", None, None))
        .await
        .expect("report");
    let body = test_support::read_json(response).await;
    assert_eq!(body[0]["total"], 2);
    assert_eq!(body[0]["present"], 1);
    assert_eq!(body[0]["percentage"], 50.0);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/attendance?status=absent",
            None,
            None,
        ))
        .await
        .expect("filter by status");
    let body = test_support::read_json(response).await;
    assert_eq!(body["total_count"], 1);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/attendance/export/csv",
            None,
            None,
        ))
        .await
        .expect("export");
    let text = test_support::read_text(response).await;
    assert!(text.starts_with("Student,Roll Number,Course,Date,Status,Remarks"));
    assert!(text.contains("Absent"));
}

#[tokio::test]
async fn marking_unknown_student_is_404() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/attendance",
            None,
            Some(json!({ "student_id": "missing", "status": "present" })),
        ))
        .await
        .expect("mark");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_marks_for_one_key_all_succeed_on_file_database() {
    let _guard = test_support::env_lock().await;
    test_support::set_test_env();
    let path = std::env::temp_dir().join(format!("school-records-{}.db", Uuid::new_v4()));
    std::env::set_var("DATABASE_URL", format!("sqlite://{}", path.display()));
    std::env::set_var("DATABASE_MAX_CONNECTIONS", "8");

    let settings = Settings::load().expect("settings");
    std::env::remove_var("DATABASE_MAX_CONNECTIONS");
    let pool = crate::db::init_pool(&settings).await.expect("db pool");
    crate::db::run_migrations(&pool).await.expect("migrations");
    let student = test_support::insert_student(&pool, "Asha", 1, 80.0).await;

    for day in 1..=5 {
        let date = test_support::date(&format!("2024-09-{day:02}"));
        let mut writers = tokio::task::JoinSet::new();
        for writer in 0..8 {
            let pool = pool.clone();
            let student_id = student.id.clone();
            writers.spawn(async move {
                let status =
                    if writer % 2 == 0 { AttendanceStatus::Present } else { AttendanceStatus::Absent };
                attendance::mark(
                    &pool,
                    &Actor::anonymous(),
                    AttendanceInput { student_id, course_id: None, date, status, remarks: None },
                )
                .await
            });
        }

        let mut created = 0;
        while let Some(joined) = writers.join_next().await {
            let (_, outcome) = joined.expect("join writer").expect("mark attendance");
            if outcome == MarkOutcome::Created {
                created += 1;
            }
        }
        assert_eq!(created, 1, "day {day}");
    }

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
        .fetch_one(&pool)
        .await
        .expect("count attendance");
    assert_eq!(rows, 5);

    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
