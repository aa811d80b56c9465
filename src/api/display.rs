use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::require_admin;
use super::validation::{parse_direction, validate_episode_number, validate_title_id};
use super::{ApiError, ApiResponse, AppState, ClearedResponse, MessageResponse};
use crate::domain::Identity;
use crate::models::display::{DisplayEpisode, DisplaySync, DisplayTitle};

/// `PUT /api/display/{title_id}`
pub async fn upsert_display_title(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(title_id): Path<i32>,
    Json(payload): Json<DisplaySync>,
) -> Result<Json<ApiResponse<DisplayTitle>>, ApiError> {
    require_admin(&identity)?;
    let title_id = validate_title_id(title_id)?;

    let mirror = state
        .display()
        .upsert_display_title(title_id, &payload)
        .await?;
    Ok(Json(ApiResponse::success(mirror)))
}

pub async fn get_display_title(
    State(state): State<Arc<AppState>>,
    Path(title_id): Path<i32>,
) -> Result<Json<ApiResponse<DisplayTitle>>, ApiError> {
    let title_id = validate_title_id(title_id)?;
    let mirror = state.display().get_display_title(title_id).await?;
    Ok(Json(ApiResponse::success(mirror)))
}

/// `GET /api/display/{title_id}/episodes/{number}/{direction}`
///
/// `data` is `null` when there is no episode in that direction.
pub async fn adjacent_episode(
    State(state): State<Arc<AppState>>,
    Path((title_id, number, direction)): Path<(i32, i32, String)>,
) -> Result<Json<ApiResponse<Option<DisplayEpisode>>>, ApiError> {
    let title_id = validate_title_id(title_id)?;
    let number = validate_episode_number(number)?;
    let direction = parse_direction(&direction)?;

    let episode = state
        .display()
        .adjacent_episode(title_id, number, direction)
        .await?;
    Ok(Json(ApiResponse::success(episode)))
}

pub async fn rebuild_display_title(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(title_id): Path<i32>,
) -> Result<Json<ApiResponse<DisplayTitle>>, ApiError> {
    require_admin(&identity)?;
    let title_id = validate_title_id(title_id)?;

    let mirror = state.display().rebuild_from_catalog(title_id).await?;
    Ok(Json(ApiResponse::success(mirror)))
}

pub async fn remove_display_title(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(title_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_admin(&identity)?;
    let title_id = validate_title_id(title_id)?;

    state.display().remove_display_title(title_id).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Removed display entry for title {title_id}"),
    })))
}

/// `DELETE /api/display`
pub async fn clear_display_mirror(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<ClearedResponse>>, ApiError> {
    require_admin(&identity)?;

    let cleared = state.display().clear_display_mirror().await?;
    Ok(Json(ApiResponse::success(ClearedResponse { cleared })))
}
