use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentActor;
use crate::core::state::AppState;
use crate::repositories::submissions::SubmissionFilter;
use crate::schemas::submission::{
    SubmissionCreate, SubmissionGrade, SubmissionListQuery, SubmissionResponse,
};
use crate::services::submissions;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_submissions).post(create_submission))
        .route("/:submission_id", get(get_submission))
        .route("/:submission_id/grade", post(grade_submission))
}

async fn list_submissions(
    Query(query): Query<SubmissionListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let filter = SubmissionFilter {
        assignment_id: query.assignment.as_deref().filter(|value| !value.is_empty()),
        student_id: query.student.as_deref().filter(|value| !value.is_empty()),
    };
    let rows = submissions::list(state.db(), &filter).await?;
    Ok(Json(rows.into_iter().map(SubmissionResponse::from_db).collect()))
}

async fn create_submission(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionCreate>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let view = submissions::create(state.db(), &actor, payload.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(view))))
}

async fn get_submission(
    Path(submission_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let view = submissions::get(state.db(), &submission_id).await?;
    Ok(Json(SubmissionResponse::from_db(view)))
}

async fn grade_submission(
    Path(submission_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionGrade>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let view =
        submissions::grade(state.db(), &actor, &submission_id, payload.into_input()).await?;
    Ok(Json(SubmissionResponse::from_db(view)))
}

#[cfg(test)]
mod tests;
