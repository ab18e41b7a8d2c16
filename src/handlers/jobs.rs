use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    handlers::params::ApiPath,
    jobs::{JobRecord, JobType},
    services::Service,
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct CacheWarmRequest {
    pub service: Option<Service>,
}

#[derive(Serialize)]
pub struct JobCreatedResponse {
    pub job_id: Uuid,
    pub status: String,
}

pub async fn trigger_cache_warm(
    State(state): State<AppState>,
    Json(payload): Json<CacheWarmRequest>,
) -> Result<(StatusCode, Json<JobCreatedResponse>)> {
    if let Some(service) = payload.service {
        if !state.is_configured(service) {
            return Err(AppError::NotConfigured(service.display_name()));
        }
    }

    let record = state
        .job_queue
        .submit(JobType::CacheWarm {
            service: payload.service,
        })
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(JobCreatedResponse {
            job_id: record.id,
            status: record.status.as_str().to_string(),
        }),
    ))
}

pub async fn get_job_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<JobRecord>> {
    let record = JobRecord::load(&state.cache, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(Json(record))
}
