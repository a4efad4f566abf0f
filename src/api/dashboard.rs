use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::dashboard::{DashboardResponse, StatsResponse};
use crate::services::dashboard;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats)).route("/dashboard", get(overview))
}

async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = dashboard::stats(state.db()).await?;
    Ok(Json(StatsResponse::from_stats(stats)))
}

async fn overview(State(state): State<AppState>) -> Result<Json<DashboardResponse>, ApiError> {
    let overview = dashboard::overview(state.db()).await?;
    Ok(Json(DashboardResponse::from_overview(overview)))
}

#[cfg(test)]
mod tests;
