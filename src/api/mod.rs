use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod collection;
mod display;
mod error;
mod observability;
mod releases;
mod system;
mod titles;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{AlertService, CatalogService, CollectionService, DisplayService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogService {
        self.shared.catalog.as_ref()
    }

    #[must_use]
    pub fn display(&self) -> &dyn DisplayService {
        self.shared.display.as_ref()
    }

    #[must_use]
    pub fn collection(&self) -> &dyn CollectionService {
        self.shared.collection.as_ref()
    }

    #[must_use]
    pub fn alerts(&self) -> &dyn AlertService {
        self.shared.alerts.as_ref()
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/health", get(system::health))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    // The request span must be innermost so auth can record `user_id` on it.
    Router::new()
        .nest("/api", api_router)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/titles",
            get(titles::list_titles).post(titles::create_title),
        )
        .route(
            "/titles/{id}",
            get(titles::get_title)
                .put(titles::update_title)
                .delete(titles::delete_title),
        )
        .route("/titles/{id}/views", post(titles::record_view))
        .route(
            "/titles/{id}/episodes/{number}/alert",
            delete(titles::clear_alert),
        )
        .route("/releases/today", get(releases::released_today))
        .route(
            "/display",
            delete(display::clear_display_mirror),
        )
        .route(
            "/display/{title_id}",
            get(display::get_display_title)
                .put(display::upsert_display_title)
                .delete(display::remove_display_title),
        )
        .route(
            "/display/{title_id}/episodes/{number}/{direction}",
            get(display::adjacent_episode),
        )
        .route(
            "/display/{title_id}/rebuild",
            post(display::rebuild_display_title),
        )
        .route(
            "/collection",
            get(collection::list_entries).put(collection::upsert_entry),
        )
        .route(
            "/collection/{title_id}",
            delete(collection::remove_entry),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
