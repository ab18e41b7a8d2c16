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
        cache::QUEUE_TTL, fetch_cached, CacheService, Cached, CommandResponse, Movie,
        QualityProfile, QueuePage, RootFolder, Service, SystemStatus,
    },
    state::AppState,
};

const SERVICE: Service = Service::Radarr;

pub async fn get_status(State(state): State<AppState>) -> Result<Cached<SystemStatus>> {
    let radarr = state.radarr()?;
    fetch_cached(&state.cache, &CacheService::status_key(SERVICE), None, || {
        radarr.system_status()
    })
    .await
}

pub async fn list_movies(State(state): State<AppState>) -> Result<Cached<Vec<Movie>>> {
    let radarr = state.radarr()?;
    fetch_cached(&state.cache, &CacheService::collection_key(SERVICE), None, || {
        radarr.list_movies()
    })
    .await
}

pub async fn get_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Cached<Movie>> {
    let radarr = state.radarr()?;
    fetch_cached(&state.cache, &CacheService::item_key(SERVICE, id), None, || {
        radarr.get_movie(id)
    })
    .await
}

pub async fn lookup_movies(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Cached<Value>> {
    let term = query.term()?;
    let radarr = state.radarr()?;
    fetch_cached(&state.cache, &CacheService::lookup_key(SERVICE, term), None, || {
        radarr.lookup_movies(term)
    })
    .await
}

pub async fn add_movie(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Movie>)> {
    let radarr = state.radarr()?;
    let movie = radarr.add_movie(&body).await?;
    tracing::info!("Added movie '{}' ({}) to Radarr", movie.title, movie.id);

    invalidate(
        &state,
        &[
            CacheService::collection_key(SERVICE),
            CacheService::item_key(SERVICE, movie.id),
        ],
    )
    .await;

    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode> {
    let radarr = state.radarr()?;
    let delete_files = query.delete_files.unwrap_or(false);
    radarr.delete_movie(id, delete_files).await?;
    tracing::info!("Deleted movie {} from Radarr (deleteFiles={})", id, delete_files);

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

pub async fn search_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<(StatusCode, Json<CommandResponse>)> {
    let radarr = state.radarr()?;
    let command = radarr.search_movie(id).await?;
    tracing::info!("Radarr search triggered for movie {} (command {})", id, command.id);

    invalidate(&state, &[CacheService::queue_key(SERVICE)]).await;

    Ok((StatusCode::ACCEPTED, Json(command)))
}

pub async fn get_queue(State(state): State<AppState>) -> Result<Cached<QueuePage>> {
    let radarr = state.radarr()?;
    fetch_cached(
        &state.cache,
        &CacheService::queue_key(SERVICE),
        Some(QUEUE_TTL),
        || radarr.queue(),
    )
    .await
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Cached<Value>> {
    let (start, end) = query.range()?;
    let radarr = state.radarr()?;
    fetch_cached(
        &state.cache,
        &CacheService::calendar_key(SERVICE, &start, &end),
        None,
        || radarr.calendar(&start, &end),
    )
    .await
}

pub async fn get_root_folders(State(state): State<AppState>) -> Result<Cached<Vec<RootFolder>>> {
    let radarr = state.radarr()?;
    fetch_cached(&state.cache, &CacheService::root_folders_key(SERVICE), None, || {
        radarr.root_folders()
    })
    .await
}

pub async fn get_quality_profiles(
    State(state): State<AppState>,
) -> Result<Cached<Vec<QualityProfile>>> {
    let radarr = state.radarr()?;
    fetch_cached(
        &state.cache,
        &CacheService::quality_profiles_key(SERVICE),
        None,
        || radarr.quality_profiles(),
    )
    .await
}
