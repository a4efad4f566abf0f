use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentActor;
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::core::time::parse_date;
use crate::db::types::AttendanceStatus;
use crate::repositories::attendance::{AttendanceFilter, MarkOutcome};
use crate::schemas::attendance::{
    AttendanceCreate, AttendanceListQuery, AttendanceMarkResponse, AttendanceReportEntry,
    AttendanceResponse, CourseMarkRequest, CourseMarkResponse,
};
use crate::services::{attendance, export};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance).post(mark_attendance))
        .route("/mark", post(mark_course))
        .route("/report", get(attendance_report))
        .route("/export/csv", get(export_csv))
        .route("/:attendance_id", delete(delete_attendance))
}

async fn list_attendance(
    Query(query): Query<AttendanceListQuery>,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<AttendanceResponse>>, ApiError> {
    let filter = AttendanceFilter {
        student_id: query.student.as_deref().filter(|value| !value.is_empty()),
        course_id: query.course.as_deref().filter(|value| !value.is_empty()),
        date: query.date.as_deref().and_then(parse_date),
        status: query.status.as_deref().and_then(AttendanceStatus::parse),
    };

    let page = attendance::list(
        state.db(),
        &filter,
        query.page.as_deref(),
        state.settings().listing().attendance_page_size,
    )
    .await?;

    let items = page.records.into_iter().map(AttendanceResponse::from_db).collect();
    Ok(Json(PaginatedResponse::new(items, &page.window)))
}

/// 201 when a new record was written, 200 when an existing one was overwritten.
async fn mark_attendance(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<AttendanceCreate>,
) -> Result<(StatusCode, Json<AttendanceMarkResponse>), ApiError> {
    let (view, outcome) = attendance::mark(state.db(), &actor, payload.into_input()).await?;
    let created = outcome == MarkOutcome::Created;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status,
        Json(AttendanceMarkResponse { created, attendance: AttendanceResponse::from_db(view) }),
    ))
}

async fn mark_course(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<CourseMarkRequest>,
) -> Result<Json<CourseMarkResponse>, ApiError> {
    let (course_id, date, entries) = payload.into_parts();
    let summary = attendance::mark_course(state.db(), &actor, &course_id, date, entries).await?;
    Ok(Json(summary.into()))
}

async fn attendance_report(
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendanceReportEntry>>, ApiError> {
    let rows = attendance::report(state.db()).await?;
    Ok(Json(rows.into_iter().map(AttendanceReportEntry::from).collect()))
}

async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = export::attendance_csv(state.db()).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"attendance.csv\""),
        ],
        body,
    ))
}

async fn delete_attendance(
    Path(attendance_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    attendance::delete(state.db(), &actor, &attendance_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
