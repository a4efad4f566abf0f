use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentActor;
use crate::core::state::AppState;
use crate::schemas::announcement::{
    AnnouncementCreate, AnnouncementListQuery, AnnouncementResponse, AnnouncementUpdate,
};
use crate::services::announcements;
use crate::services::lifecycle::Lifecycle;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route("/:announcement_id", patch(update_announcement).delete(archive_announcement))
}

async fn list_announcements(
    Query(query): Query<AnnouncementListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AnnouncementResponse>>, ApiError> {
    let rows = announcements::list(state.db(), query.target_class.as_deref()).await?;
    Ok(Json(rows.into_iter().map(AnnouncementResponse::from_db).collect()))
}

async fn create_announcement(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<AnnouncementCreate>,
) -> Result<(StatusCode, Json<AnnouncementResponse>), ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let announcement = announcements::create(state.db(), &actor, payload.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(AnnouncementResponse::from_db(announcement))))
}

async fn update_announcement(
    Path(announcement_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<AnnouncementUpdate>,
) -> Result<Json<AnnouncementResponse>, ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let announcement =
        announcements::update(state.db(), &actor, &announcement_id, payload.into_patch()).await?;
    Ok(Json(AnnouncementResponse::from_db(announcement)))
}

async fn archive_announcement(
    Path(announcement_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    announcements::transition(state.db(), &actor, &announcement_id, Lifecycle::Archived).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
