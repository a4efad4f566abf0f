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
use crate::repositories::enrollments::EnrollmentFilter;
use crate::schemas::enrollment::{
    EnrollmentCreate, EnrollmentListQuery, EnrollmentResponse, EnrollmentUpdate,
};
use crate::services::enrollments;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(create_enrollment))
        .route(
            "/:enrollment_id",
            get(get_enrollment).patch(update_enrollment).delete(delete_enrollment),
        )
}

async fn list_enrollments(
    Query(query): Query<EnrollmentListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let filter = EnrollmentFilter {
        student_id: query.student.as_deref().filter(|value| !value.is_empty()),
        course_id: query.course.as_deref().filter(|value| !value.is_empty()),
        is_active: query.is_active,
    };
    let rows = enrollments::list(state.db(), &filter).await?;
    Ok(Json(rows.into_iter().map(EnrollmentResponse::from_db).collect()))
}

async fn create_enrollment(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentCreate>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let view = enrollments::create(state.db(), &actor, payload.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from_db(view))))
}

async fn get_enrollment(
    Path(enrollment_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let view = enrollments::get(state.db(), &enrollment_id).await?;
    Ok(Json(EnrollmentResponse::from_db(view)))
}

async fn update_enrollment(
    Path(enrollment_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentUpdate>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let view = enrollments::update(state.db(), &actor, &enrollment_id, payload.into_patch()).await?;
    Ok(Json(EnrollmentResponse::from_db(view)))
}

async fn delete_enrollment(
    Path(enrollment_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    enrollments::delete(state.db(), &actor, &enrollment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
