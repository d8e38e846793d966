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

mod anime;
mod collections;
pub mod device;
mod error;
mod favourites;
mod history;
mod observability;
mod system;
mod timecodes;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{CatalogService, PersonalizationService};
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
    pub fn catalog(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog
    }

    #[must_use]
    pub fn personalization(&self) -> &Arc<dyn PersonalizationService> {
        &self.shared.personalization
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

    let api_router = Router::new()
        .merge(create_device_router(state.clone()))
        .merge(catalog_routes())
        .route("/health", get(system::health))
        .route("/health/ready", get(system::ready))
        .route("/metrics", get(observability::get_metrics))
        .route("/users/device", post(device::issue_device))
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api/v1", api_router)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/anime/search/{id}", get(anime::search_by_id))
        .route("/anime/anilibria/search", get(anime::anilibria_search))
        .route(
            "/anime/anilibria/recommended",
            get(anime::anilibria_recommended),
        )
        .route("/anime/anilibria/latest", get(anime::anilibria_latest))
        .route("/anime/anilibria/random", get(anime::anilibria_random))
        .route("/anime/anilibria/genres", get(anime::anilibria_genres))
        .route(
            "/anime/anilibria/genres/{id}/releases",
            get(anime::anilibria_genre_releases),
        )
        .route("/anime/anilibria/info/{id}", get(anime::anilibria_info))
        .route(
            "/anime/anilibria/episode/{id}",
            get(anime::anilibria_episode),
        )
        .route("/anime/consumet/search", get(anime::consumet_search))
        .route(
            "/anime/consumet/recommended",
            get(anime::consumet_recommended),
        )
        .route("/anime/consumet/latest", get(anime::consumet_latest))
        .route("/anime/consumet/genres", get(anime::consumet_genres))
        .route(
            "/anime/consumet/genres/{name}/releases",
            get(anime::consumet_genre_releases),
        )
        .route("/anime/consumet/info/{id}", get(anime::consumet_info))
        .route("/anime/consumet/episode/{id}", get(anime::consumet_episode))
}

/// Routes scoped to the presenting device.
fn create_device_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/favourites",
            get(favourites::list_favourites).post(favourites::add_favourite),
        )
        .route("/favourites/all", get(favourites::list_all_favourites))
        .route(
            "/favourites/{anime_id}",
            get(favourites::favourite_status).delete(favourites::remove_favourite),
        )
        .route(
            "/collections",
            get(collections::list_collections).post(collections::add_collection),
        )
        .route("/collections/all", get(collections::list_all_collections))
        .route(
            "/collections/{anime_id}",
            delete(collections::remove_collection),
        )
        .route(
            "/history",
            get(history::list_history).post(history::add_history),
        )
        .route("/history/all", get(history::list_all_history))
        .route(
            "/timecodes",
            get(timecodes::list_timecodes).post(timecodes::add_timecode),
        )
        .route(
            "/timecodes/episode/{episode_id}",
            get(timecodes::get_timecode),
        )
        .route(
            "/timecodes/anime/{anime_id}",
            get(timecodes::list_anime_timecodes),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            device::require_device,
        ))
}
