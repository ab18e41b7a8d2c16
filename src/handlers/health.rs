use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: &'static str,
    pub cache_backend: &'static str,
}

/// Liveness check. The service stays up without its cache, so a failed
/// ping is reported rather than turned into an error status.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = match state.cache.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("Cache health check failed: {}", e);
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok",
        cache,
        cache_backend: state.cache.backend_name(),
    })
}
