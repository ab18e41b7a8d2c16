use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    services::{CacheService, Service},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct FlushResponse {
    pub removed: usize,
}

/// Drop every cached upstream response for both services
pub async fn flush_all(State(state): State<AppState>) -> Result<Json<FlushResponse>> {
    let mut removed = 0;
    for service in Service::ALL {
        removed += state
            .cache
            .invalidate_prefix(&CacheService::service_prefix(service))
            .await?;
    }

    tracing::info!("Flushed {} cache entries", removed);
    Ok(Json(FlushResponse { removed }))
}

pub async fn flush_service(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<Json<FlushResponse>> {
    let service: Service = service.parse().map_err(AppError::BadRequest)?;

    let removed = state
        .cache
        .invalidate_prefix(&CacheService::service_prefix(service))
        .await?;

    tracing::info!("Flushed {} {} cache entries", removed, service);
    Ok(Json(FlushResponse { removed }))
}
