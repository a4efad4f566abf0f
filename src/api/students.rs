use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentActor;
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::db::types::{Gender, Grade};
use crate::repositories::students::{StudentFilter, StudentSort};
use crate::schemas::attendance::AttendanceResponse;
use crate::schemas::enrollment::EnrollmentResponse;
use crate::schemas::student::{
    BulkDeleteRequest, ImportResponse, StudentCreate, StudentDeleteQuery, StudentDetailResponse,
    StudentListQuery, StudentReportResponse, StudentResponse, StudentUpdate,
};
use crate::schemas::CountResponse;
use crate::services::lifecycle::Lifecycle;
use crate::services::student_import::{self, ImportError};
use crate::services::{attendance, enrollments, export, students};

const IMPORT_FIELD: &str = "csv_file";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/bulk-delete", post(bulk_delete))
        .route("/import", post(import_students).layer(DefaultBodyLimit::disable()))
        .route("/export/csv", get(export_csv))
        .route("/export/sheet", get(export_sheet))
        .route("/:student_id", get(get_student).patch(update_student).delete(delete_student))
        .route("/:student_id/attendance", get(student_attendance))
        .route("/:student_id/courses", get(student_courses))
        .route("/:student_id/report", get(student_report))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Filters that fail to parse are dropped rather than rejected.
fn filter_from_query(query: &StudentListQuery) -> StudentFilter<'_> {
    StudentFilter {
        search: non_blank(&query.search),
        grade: non_blank(&query.grade).and_then(Grade::parse),
        marks_min: non_blank(&query.marks_min).and_then(|raw| raw.parse().ok()),
        marks_max: non_blank(&query.marks_max).and_then(|raw| raw.parse().ok()),
        class_name: non_blank(&query.class_name),
        section: non_blank(&query.section),
        gender: non_blank(&query.gender).and_then(Gender::parse),
    }
}

async fn list_students(
    Query(query): Query<StudentListQuery>,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<StudentResponse>>, ApiError> {
    let filter = filter_from_query(&query);
    let sort = StudentSort::parse(query.sort.as_deref());
    let page = students::list(
        state.db(),
        &filter,
        sort,
        query.page.as_deref(),
        state.settings().listing().student_page_size,
    )
    .await?;

    let items = page.students.into_iter().map(StudentResponse::from_db).collect();
    Ok(Json(PaginatedResponse::new(items, &page.window)))
}

async fn create_student(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<StudentCreate>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let student = students::create(state.db(), &actor, payload.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(StudentResponse::from_db(student))))
}

async fn get_student(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StudentDetailResponse>, ApiError> {
    let detail = students::detail(state.db(), &student_id).await?;
    Ok(Json(StudentDetailResponse::from_detail(detail)))
}

async fn update_student(
    Path(student_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<StudentUpdate>,
) -> Result<Json<StudentResponse>, ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let student = students::update(state.db(), &actor, &student_id, payload.into_patch()).await?;
    Ok(Json(StudentResponse::from_db(student)))
}

async fn delete_student(
    Path(student_id): Path<String>,
    Query(query): Query<StudentDeleteQuery>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let target = match non_blank(&query.mode) {
        None | Some("delete") => Lifecycle::Deleted,
        Some("archive") => Lifecycle::Archived,
        Some(other) => {
            return Err(ApiError::Validation {
                field: "mode".to_string(),
                message: format!("unknown delete mode '{other}'"),
            })
        }
    };

    students::transition(state.db(), &actor, &student_id, target).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_delete(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = students::bulk_delete(state.db(), &actor, &payload.student_ids).await?;
    Ok(Json(CountResponse { count }))
}

async fn student_attendance(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let records = attendance::for_student(state.db(), &student_id).await?;
    Ok(Json(records.into_iter().map(AttendanceResponse::from_db).collect()))
}

async fn student_courses(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let enrollments = enrollments::for_student(state.db(), &student_id).await?;
    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from_db).collect()))
}

async fn student_report(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StudentReportResponse>, ApiError> {
    let (student, lines) = export::student_report(state.db(), &student_id).await?;
    Ok(Json(StudentReportResponse { student_id: student.id, title: "Student Report", lines }))
}

async fn import_students(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let settings = state.settings().import();
    let max_bytes = settings.max_upload_bytes();

    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() != Some(IMPORT_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        student_import::check_upload(&filename, content_type.as_deref(), 0, settings)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
        {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(ImportError::TooLarge { limit_mb: settings.max_upload_size_mb }.into());
            }
            bytes.extend_from_slice(&chunk);
        }
        upload = Some((filename, content_type, bytes));
    }

    let Some((filename, content_type, bytes)) = upload else {
        return Err(ApiError::Validation {
            field: IMPORT_FIELD.to_string(),
            message: "a CSV file is required".to_string(),
        });
    };
    student_import::check_upload(&filename, content_type.as_deref(), bytes.len(), settings)?;
    let text = student_import::decode(&bytes)?;

    let summary = student_import::import_students(state.db(), &actor, text).await;
    Ok(Json(ImportResponse {
        success_count: summary.success_count,
        error_count: summary.error_count,
    }))
}

async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = export::students_csv(state.db()).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"students.csv\""),
        ],
        body,
    ))
}

async fn export_sheet(State(state): State<AppState>) -> Result<Json<export::SheetTable>, ApiError> {
    Ok(Json(export::students_sheet(state.db()).await?))
}
