use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::SqlitePool;
use time::{Date, PrimitiveDateTime};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::api;
use crate::api::guards::ACTOR_HEADER;
use crate::core::{config::Settings, state::AppState, time::primitive_now_utc};
use crate::db::models::{Assignment, Course, Student, User};
use crate::repositories;
use crate::services::actor::Actor;
use crate::services::assignments::{self, AssignmentDraft};
use crate::services::courses::{self, CourseDraft};
use crate::services::students::{self, StudentDraft};

const TEST_DATABASE_URL: &str = "sqlite::memory:";
pub(crate) const MULTIPART_BOUNDARY: &str = "school-records-test-boundary";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("SCHOOL_ENV", "test");
    std::env::set_var("SCHOOL_STRICT_CONFIG", "0");
    std::env::set_var("DATABASE_URL", TEST_DATABASE_URL);
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::set_var("MAX_IMPORT_SIZE_MB", "1");
    std::env::remove_var("STUDENT_PAGE_SIZE");
    std::env::remove_var("ATTENDANCE_PAGE_SIZE");
    std::env::remove_var("IMPORT_EXTENSIONS");
    std::env::remove_var("BOOTSTRAP_STAFF_USERNAME");
    std::env::remove_var("BOOTSTRAP_STAFF_FULL_NAME");
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let db = crate::db::init_pool(&settings).await.expect("db pool");
    crate::db::run_migrations(&db).await.expect("migrations");

    let state = AppState::new(settings, db);
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

pub(crate) async fn insert_user(pool: &SqlitePool, username: &str, full_name: &str) -> User {
    repositories::users::create(
        pool,
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            username,
            full_name,
            email: None,
            is_staff: true,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert user")
}

pub(crate) async fn insert_student(
    pool: &SqlitePool,
    name: &str,
    roll_number: i64,
    marks: f64,
) -> Student {
    students::create(
        pool,
        &Actor::anonymous(),
        StudentDraft {
            name: name.to_string(),
            roll_number,
            email: format!("student{roll_number}@example.com"),
            marks,
            ..Default::default()
        },
    )
    .await
    .expect("insert student")
}

pub(crate) async fn insert_course(pool: &SqlitePool, code: &str, name: &str) -> Course {
    courses::create(
        pool,
        &Actor::anonymous(),
        CourseDraft { code: code.to_string(), name: name.to_string(), ..Default::default() },
    )
    .await
    .expect("insert course")
}

pub(crate) async fn insert_assignment(
    pool: &SqlitePool,
    course_id: &str,
    title: &str,
    due_date: PrimitiveDateTime,
) -> Assignment {
    assignments::create(
        pool,
        &Actor::anonymous(),
        AssignmentDraft {
            course_id: course_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            due_date,
            total_marks: None,
            attachment: None,
        },
    )
    .await
    .expect("insert assignment")
    .assignment
}

pub(crate) fn date(raw: &str) -> Date {
    crate::core::time::parse_date(raw).expect("test date")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    actor_id: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor_id) = actor_id {
        builder = builder.header(ACTOR_HEADER, actor_id);
    }

    if let Some(body) = body {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        builder.body(Body::from(body.to_string())).expect("request")
    } else {
        builder.body(Body::empty()).expect("request")
    }
}

/// Single-file multipart upload under the given field name.
pub(crate) fn multipart_request(
    uri: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    contents: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

pub(crate) async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    if body.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&body).expect("json body")
}

pub(crate) async fn read_text(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
