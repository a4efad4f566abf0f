use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentActor;
use crate::core::state::AppState;
use crate::repositories::courses::CourseFilter;
use crate::schemas::course::{
    CourseCreate, CourseDeleteQuery, CourseDetailResponse, CourseListQuery, CourseResponse,
    CourseUpdate,
};
use crate::schemas::student::StudentResponse;
use crate::services::courses;
use crate::services::lifecycle::Lifecycle;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:course_id", get(get_course).patch(update_course).delete(delete_course))
        .route("/:course_id/students", get(course_students))
}

async fn list_courses(
    Query(query): Query<CourseListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let filter = CourseFilter {
        search: query.search.as_deref().map(str::trim).filter(|value| !value.is_empty()),
        semester: query.semester.as_deref().filter(|value| !value.is_empty()),
        academic_year: query.academic_year.as_deref().filter(|value| !value.is_empty()),
    };

    let rows = courses::list(state.db(), &filter).await?;
    Ok(Json(
        rows.into_iter().map(|(course, enrolled)| CourseResponse::from_db(course, enrolled)).collect(),
    ))
}

async fn create_course(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let course = courses::create(state.db(), &actor, payload.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course, 0))))
}

async fn get_course(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let detail = courses::detail(state.db(), &course_id).await?;
    Ok(Json(CourseDetailResponse::from_detail(detail)))
}

async fn update_course(
    Path(course_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let course = courses::update(state.db(), &actor, &course_id, payload.into_patch()).await?;
    let detail = courses::detail(state.db(), &course.id).await?;
    Ok(Json(CourseResponse::from_db(detail.course, detail.enrolled_students_count)))
}

/// Archives by default; `?purge=true` removes the course and everything under it.
async fn delete_course(
    Path(course_id): Path<String>,
    Query(query): Query<CourseDeleteQuery>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let target = if query.purge { Lifecycle::Deleted } else { Lifecycle::Archived };
    courses::transition(state.db(), &actor, &course_id, target).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn course_students(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = courses::enrolled_students(state.db(), &course_id).await?;
    Ok(Json(students.into_iter().map(StudentResponse::from_db).collect()))
}

#[cfg(test)]
mod tests;
