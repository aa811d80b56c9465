use serde::{Deserialize, Serialize};

use crate::models::display::DisplayTitle;
use crate::models::title::{TitleDetails, TitleUpdate};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TitleCreatedResponse {
    pub id: i32,
    pub message: String,
}

/// Update body; `display`, when present, is synced in the same transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    #[serde(flatten)]
    pub update: TitleUpdate,
    #[serde(default)]
    pub display: Option<crate::models::display::DisplaySync>,
}

#[derive(Debug, Serialize)]
pub struct UpdateTitleResponse {
    #[serde(flatten)]
    pub details: TitleDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayTitle>,
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub id: i32,
    pub views: i64,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
}
