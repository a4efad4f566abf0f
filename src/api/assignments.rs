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
use crate::schemas::assignment::{
    AssignmentCreate, AssignmentDetailResponse, AssignmentListQuery, AssignmentResponse,
    AssignmentUpdate,
};
use crate::services::assignments;
use crate::services::lifecycle::Lifecycle;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_assignments).post(create_assignment)).route(
        "/:assignment_id",
        get(get_assignment).patch(update_assignment).delete(archive_assignment),
    )
}

async fn list_assignments(
    Query(query): Query<AssignmentListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    let course_id = query.course.as_deref().filter(|value| !value.is_empty());
    let rows = assignments::list(state.db(), course_id).await?;
    Ok(Json(rows.into_iter().map(AssignmentResponse::from_db).collect()))
}

async fn create_assignment(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let view = assignments::create(state.db(), &actor, payload.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(AssignmentResponse::from_db(view))))
}

async fn get_assignment(
    Path(assignment_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AssignmentDetailResponse>, ApiError> {
    let detail = assignments::detail(state.db(), &assignment_id).await?;
    Ok(Json(AssignmentDetailResponse::from_detail(detail)))
}

async fn update_assignment(
    Path(assignment_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentUpdate>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let view =
        assignments::update(state.db(), &actor, &assignment_id, payload.into_patch()).await?;
    Ok(Json(AssignmentResponse::from_db(view)))
}

async fn archive_assignment(
    Path(assignment_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    assignments::transition(state.db(), &actor, &assignment_id, Lifecycle::Archived).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
