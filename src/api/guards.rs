use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::models::User;
use crate::repositories;
use crate::services::actor::Actor;

pub(crate) const ACTOR_HEADER: &str = "x-actor-id";

/// Caller identity. A request without the header acts anonymously.
pub(crate) struct CurrentActor(pub(crate) Actor);

/// Caller identity for endpoints scoped to one user's own records.
pub(crate) struct RequiredActor(pub(crate) User);

async fn resolve_user(parts: &mut Parts, state: &AppState) -> Result<Option<User>, ApiError> {
    let State(app_state) = State::<AppState>::from_request_parts(parts, state)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

    let Some(raw) = parts.headers.get(ACTOR_HEADER) else {
        return Ok(None);
    };
    let user_id = raw
        .to_str()
        .map(str::trim)
        .map_err(|_| ApiError::Unauthorized("Invalid actor header"))?;
    if user_id.is_empty() {
        return Ok(None);
    }

    let user = repositories::users::find_by_id(app_state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

    match user {
        Some(user) => Ok(Some(user)),
        None => Err(ApiError::Unauthorized("Unknown actor")),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor = match resolve_user(parts, state).await? {
            Some(user) => Actor::user(user.id),
            None => Actor::anonymous(),
        };
        Ok(CurrentActor(actor))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequiredActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await?
            .map(RequiredActor)
            .ok_or(ApiError::Unauthorized("Actor required"))
    }
}
