use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::Identity;

/// Resolves the caller from `X-Api-Key` or `Authorization: Bearer <api_key>`
/// and attaches the [`Identity`] to the request.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(key) = extract_api_key(&headers) {
        match state.store().identity_for_api_key(&key).await {
            Ok(Some(identity)) => {
                tracing::Span::current().record("user_id", identity.user_id);
                request.extensions_mut().insert(identity);
                return Ok(next.run(request).await.into_response());
            }
            Ok(None) => {}
            Err(e) => return Err(ApiError::internal(format!("Authentication error: {e}"))),
        }
    }

    Err(ApiError::unauthorized("Missing or invalid API key"))
}

/// Catalog and mirror writes are reserved to administrators.
pub fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.is_admin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Administrator access required"))
    }
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}
