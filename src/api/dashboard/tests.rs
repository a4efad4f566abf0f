use axum::http::Method;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn stats_on_empty_database_are_zero() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/stats", None, None))
        .await
        .expect("stats");
    let body = test_support::read_json(response).await;
    assert_eq!(body["total_students"], 0);
    assert_eq!(body["total_courses"], 0);
    assert_eq!(body["average_marks"], 0.0);
    assert_eq!(body["attendance_percentage"], 0.0);
    assert_eq!(body["grade_distribution"], serde_json::json!([]));
}

#[tokio::test]
async fn dashboard_ranks_top_performers() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    test_support::insert_student(pool, "Low", 1, 55.0).await;
    test_support::insert_student(pool, "High", 2, 97.0).await;
    test_support::insert_student(pool, "Mid", 3, 84.0).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/dashboard", None, None))
        .await
        .expect("dashboard");
    let body = test_support::read_json(response).await;
    assert_eq!(body["total_students"], 3);
    assert_eq!(body["average_marks"], 78.67);
    assert_eq!(body["top_performers"][0]["name"], "High");
    assert_eq!(body["top_performers"][1]["name"], "Mid");
    assert_eq!(body["recent_students"].as_array().expect("recent").len(), 3);
    assert_eq!(
        body["grade_distribution"],
        serde_json::json!([
            { "grade": "A", "count": 1 },
            { "grade": "B", "count": 1 },
            { "grade": "F", "count": 1 }
        ])
    );
}
