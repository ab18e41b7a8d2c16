use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    error::Result,
    handlers::{
        invalidate,
        params::{ApiPath, CalendarQuery, DeleteQuery, LookupQuery},
    },
    services::{
        cache::QUEUE_TTL, fetch_cached, CacheService, Cached, CommandResponse, QualityProfile,
        QueuePage, RootFolder, Series, Service, SystemStatus,
    },
    state::AppState,
};

const SERVICE: Service = Service::Sonarr;

pub async fn get_status(State(state): State<AppState>) -> Result<Cached<SystemStatus>> {
    let sonarr = state.sonarr()?;
    fetch_cached(&state.cache, &CacheService::status_key(SERVICE), None, || {
        sonarr.system_status()
    })
    .await
}

pub async fn list_series(State(state): State<AppState>) -> Result<Cached<Vec<Series>>> {
    let sonarr = state.sonarr()?;
    fetch_cached(&state.cache, &CacheService::collection_key(SERVICE), None, || {
        sonarr.list_series()
    })
    .await
}

pub async fn get_series(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Cached<Series>> {
    let sonarr = state.sonarr()?;
    fetch_cached(&state.cache, &CacheService::item_key(SERVICE, id), None, || {
        sonarr.get_series(id)
    })
    .await
}

pub async fn lookup_series(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Cached<Value>> {
    let term = query.term()?;
    let sonarr = state.sonarr()?;
    fetch_cached(&state.cache, &CacheService::lookup_key(SERVICE, term), None, || {
        sonarr.lookup_series(term)
    })
    .await
}

pub async fn add_series(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Series>)> {
    let sonarr = state.sonarr()?;
    let series = sonarr.add_series(&body).await?;
    tracing::info!("Added series '{}' ({}) to Sonarr", series.title, series.id);

    invalidate(
        &state,
        &[
            CacheService::collection_key(SERVICE),
            CacheService::item_key(SERVICE, series.id),
        ],
    )
    .await;

    Ok((StatusCode::CREATED, Json(series)))
}

pub async fn delete_series(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode> {
    let sonarr = state.sonarr()?;
    let delete_files = query.delete_files.unwrap_or(false);
    sonarr.delete_series(id, delete_files).await?;
    tracing::info!("Deleted series {} from Sonarr (deleteFiles={})", id, delete_files);

    invalidate(
        &state,
        &[
            CacheService::collection_key(SERVICE),
            CacheService::item_key(SERVICE, id),
            CacheService::queue_key(SERVICE),
        ],
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_series(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<(StatusCode, Json<CommandResponse>)> {
    let sonarr = state.sonarr()?;
    let command = sonarr.search_series(id).await?;
    tracing::info!("Sonarr search triggered for series {} (command {})", id, command.id);

    invalidate(&state, &[CacheService::queue_key(SERVICE)]).await;

    Ok((StatusCode::ACCEPTED, Json(command)))
}

pub async fn get_queue(State(state): State<AppState>) -> Result<Cached<QueuePage>> {
    let sonarr = state.sonarr()?;
    fetch_cached(
        &state.cache,
        &CacheService::queue_key(SERVICE),
        Some(QUEUE_TTL),
        || sonarr.queue(),
    )
    .await
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Cached<Value>> {
    let (start, end) = query.range()?;
    let sonarr = state.sonarr()?;
    fetch_cached(
        &state.cache,
        &CacheService::calendar_key(SERVICE, &start, &end),
        None,
        || sonarr.calendar(&start, &end),
    )
    .await
}

pub async fn get_root_folders(State(state): State<AppState>) -> Result<Cached<Vec<RootFolder>>> {
    let sonarr = state.sonarr()?;
    fetch_cached(&state.cache, &CacheService::root_folders_key(SERVICE), None, || {
        sonarr.root_folders()
    })
    .await
}

pub async fn get_quality_profiles(
    State(state): State<AppState>,
) -> Result<Cached<Vec<QualityProfile>>> {
    let sonarr = state.sonarr()?;
    fetch_cached(
        &state.cache,
        &CacheService::quality_profiles_key(SERVICE),
        None,
        || sonarr.quality_profiles(),
    )
    .await
}
