use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::title::ReleasedEpisode;

/// `GET /api/releases/today`
pub async fn released_today(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReleasedEpisode>>>, ApiError> {
    let episodes = state.alerts().released_today().await?;
    Ok(Json(ApiResponse::success(episodes)))
}
