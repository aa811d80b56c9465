use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_title_id;
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::domain::Identity;
use crate::models::collection::{CollectionEntryInput, CollectionEntryView};

#[derive(Deserialize)]
pub struct CollectionQuery {
    pub status: Option<String>,
}

/// `PUT /api/collection`
pub async fn upsert_entry(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CollectionEntryInput>,
) -> Result<Json<ApiResponse<CollectionEntryView>>, ApiError> {
    let entry = state
        .collection()
        .upsert_entry(&identity, &payload)
        .await?;
    Ok(Json(ApiResponse::success(entry)))
}

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<CollectionQuery>,
) -> Result<Json<ApiResponse<Vec<CollectionEntryView>>>, ApiError> {
    let entries = state
        .collection()
        .list_entries(&identity, query.status.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}

pub async fn remove_entry(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(title_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let title_id = validate_title_id(title_id)?;

    state.collection().remove_entry(&identity, title_id).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Removed title {title_id} from collection"),
    })))
}
