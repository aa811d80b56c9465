use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::require_admin;
use super::validation::{validate_episode_number, validate_title_id};
use super::{
    ApiError, ApiResponse, AppState, ClearedResponse, MessageResponse, TitleCreatedResponse,
    UpdateTitleRequest, UpdateTitleResponse, ViewsResponse,
};
use crate::domain::Identity;
use crate::models::title::{NewTitle, TitleDetails, TitleSummary};

pub async fn list_titles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TitleSummary>>>, ApiError> {
    let titles = state.catalog().list_titles().await?;
    Ok(Json(ApiResponse::success(titles)))
}

pub async fn get_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TitleDetails>>, ApiError> {
    let id = validate_title_id(id)?;
    let details = state.catalog().get_title(id).await?;
    Ok(Json(ApiResponse::success(details)))
}

/// `POST /api/titles`
pub async fn create_title(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<NewTitle>,
) -> Result<(StatusCode, Json<ApiResponse<TitleCreatedResponse>>), ApiError> {
    require_admin(&identity)?;

    let id = state.catalog().insert_title(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TitleCreatedResponse {
            id: id.value(),
            message: format!(
                "Created {} with {} episodes",
                payload.title.name,
                payload.episodes.len()
            ),
        })),
    ))
}

/// `PUT /api/titles/{id}`
///
/// With a `display` section the mirror entry is synced in the same transaction.
pub async fn update_title(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTitleRequest>,
) -> Result<Json<ApiResponse<UpdateTitleResponse>>, ApiError> {
    require_admin(&identity)?;
    let id = validate_title_id(id)?;

    let response = match &payload.display {
        Some(display) => {
            let (details, mirror) = state
                .catalog()
                .update_title_with_display(id, &payload.update, display)
                .await?;
            UpdateTitleResponse {
                details,
                display: Some(mirror),
            }
        }
        None => UpdateTitleResponse {
            details: state.catalog().update_title(id, &payload.update).await?,
            display: None,
        },
    };

    Ok(Json(ApiResponse::success(response)))
}

pub async fn delete_title(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_admin(&identity)?;
    let id = validate_title_id(id)?;

    state.catalog().delete_title(id).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Deleted title {id}"),
    })))
}

pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ViewsResponse>>, ApiError> {
    let id = validate_title_id(id)?;
    let views = state.catalog().record_view(id).await?;
    Ok(Json(ApiResponse::success(ViewsResponse {
        id: id.value(),
        views,
    })))
}

/// `DELETE /api/titles/{id}/episodes/{number}/alert`
pub async fn clear_alert(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path((id, number)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<ClearedResponse>>, ApiError> {
    require_admin(&identity)?;
    let id = validate_title_id(id)?;
    let number = validate_episode_number(number)?;

    let cleared = state.alerts().clear_alert(id, number).await?;
    Ok(Json(ApiResponse::success(ClearedResponse { cleared })))
}
