pub mod cache;
pub mod docs;
pub mod health;
pub mod jobs;
pub mod media;
pub mod params;
pub mod radarr;
pub mod sonarr;
pub mod status;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Upstream overview
        .route("/status", get(status::get_status))

        // Sonarr endpoints
        .route("/sonarr/status", get(sonarr::get_status))
        .route("/sonarr/series", get(sonarr::list_series).post(sonarr::add_series))
        .route("/sonarr/series/lookup", get(sonarr::lookup_series))
        .route("/sonarr/series/:id", get(sonarr::get_series).delete(sonarr::delete_series))
        .route("/sonarr/series/:id/search", post(sonarr::search_series))
        .route("/sonarr/queue", get(sonarr::get_queue))
        .route("/sonarr/calendar", get(sonarr::get_calendar))
        .route("/sonarr/rootfolders", get(sonarr::get_root_folders))
        .route("/sonarr/qualityprofiles", get(sonarr::get_quality_profiles))

        // Radarr endpoints
        .route("/radarr/status", get(radarr::get_status))
        .route("/radarr/movies", get(radarr::list_movies).post(radarr::add_movie))
        .route("/radarr/movies/lookup", get(radarr::lookup_movies))
        .route("/radarr/movies/:id", get(radarr::get_movie).delete(radarr::delete_movie))
        .route("/radarr/movies/:id/search", post(radarr::search_movie))
        .route("/radarr/queue", get(radarr::get_queue))
        .route("/radarr/calendar", get(radarr::get_calendar))
        .route("/radarr/rootfolders", get(radarr::get_root_folders))
        .route("/radarr/qualityprofiles", get(radarr::get_quality_profiles))

        // Cache maintenance
        .route("/cache", delete(cache::flush_all))
        .route("/cache/:service", delete(cache::flush_service))

        // Job endpoints
        .route("/jobs/cache-warm", post(jobs::trigger_cache_warm))
        .route("/jobs/:id", get(jobs::get_job_status))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // API routes (JSON)
        .nest("/api", api_routes())

        // Media file and API documentation
        .route("/media", get(media::get_media))
        .route("/docs", get(docs::swagger_ui))
        .route("/openapi.json", get(docs::openapi_spec))

        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Drop cached entries made stale by a write. Failures are logged only; the
/// entries expire on their own.
pub(crate) async fn invalidate(state: &AppState, keys: &[String]) {
    for key in keys {
        if let Err(e) = state.cache.delete(key).await {
            tracing::warn!("Failed to invalidate cache key {}: {}", key, e);
        }
    }
}
