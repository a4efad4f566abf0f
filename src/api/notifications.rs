use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentActor, RequiredActor};
use crate::core::state::AppState;
use crate::schemas::notification::{InboxResponse, NotificationCreate, NotificationResponse};
use crate::schemas::CountResponse;
use crate::services::notifications;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inbox).post(create_notification))
        .route("/mark-all-read", post(mark_all_read))
        .route("/:notification_id/read", post(mark_read))
}

/// The caller's own notifications, newest first.
async fn inbox(
    RequiredActor(user): RequiredActor,
    State(state): State<AppState>,
) -> Result<Json<InboxResponse>, ApiError> {
    let inbox = notifications::inbox(state.db(), &user.id).await?;
    Ok(Json(InboxResponse::from_inbox(inbox)))
}

async fn create_notification(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(payload): Json<NotificationCreate>,
) -> Result<(StatusCode, Json<NotificationResponse>), ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;
    let notification = notifications::create(state.db(), &actor, payload.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(NotificationResponse::from_db(notification))))
}

async fn mark_read(
    Path(notification_id): Path<String>,
    RequiredActor(user): RequiredActor,
    State(state): State<AppState>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification = notifications::mark_read(state.db(), &user.id, &notification_id).await?;
    Ok(Json(NotificationResponse::from_db(notification)))
}

async fn mark_all_read(
    RequiredActor(user): RequiredActor,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = notifications::mark_all_read(state.db(), &user.id).await?;
    Ok(Json(CountResponse { count }))
}

#[cfg(test)]
mod tests;
