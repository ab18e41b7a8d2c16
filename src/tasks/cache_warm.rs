use anyhow::{bail, Result};

use crate::{
    services::{cache::QUEUE_TTL, CacheService, RadarrService, Service, SonarrService},
    state::AppState,
};

/// Prefetch upstream collections into the cache under the read-path keys.
///
/// `None` warms every configured upstream and skips the rest; naming an
/// unconfigured upstream is an error. Returns the number of entries written.
pub async fn run_cache_warm(state: &AppState, target: Option<Service>) -> Result<usize> {
    let services: Vec<Service> = match target {
        Some(service) if !state.is_configured(service) => {
            bail!("{} is not configured", service);
        }
        Some(service) => vec![service],
        None => Service::ALL
            .into_iter()
            .filter(|s| state.is_configured(*s))
            .collect(),
    };

    if services.is_empty() {
        tracing::warn!("Cache warm requested but no upstream is configured");
        return Ok(0);
    }

    let mut written = 0;
    for service in services {
        tracing::info!("Warming {} cache", service);
        let count = match service {
            Service::Sonarr => match &state.sonarr {
                Some(sonarr) => warm_sonarr(&state.cache, sonarr).await?,
                None => 0,
            },
            Service::Radarr => match &state.radarr {
                Some(radarr) => warm_radarr(&state.cache, radarr).await?,
                None => 0,
            },
        };
        tracing::info!("{} cache warmed with {} entries", service, count);
        written += count;
    }

    Ok(written)
}

async fn warm_sonarr(cache: &CacheService, sonarr: &SonarrService) -> Result<usize> {
    let service = Service::Sonarr;

    let status = sonarr.system_status().await?;
    cache.set(&CacheService::status_key(service), &status, None).await?;

    let series = sonarr.list_series().await?;
    cache.set(&CacheService::collection_key(service), &series, None).await?;
    for item in &series {
        cache.set(&CacheService::item_key(service, item.id), item, None).await?;
    }

    let queue = sonarr.queue().await?;
    cache.set(&CacheService::queue_key(service), &queue, Some(QUEUE_TTL)).await?;

    let root_folders = sonarr.root_folders().await?;
    cache.set(&CacheService::root_folders_key(service), &root_folders, None).await?;

    let profiles = sonarr.quality_profiles().await?;
    cache.set(&CacheService::quality_profiles_key(service), &profiles, None).await?;

    Ok(5 + series.len())
}

async fn warm_radarr(cache: &CacheService, radarr: &RadarrService) -> Result<usize> {
    let service = Service::Radarr;

    let status = radarr.system_status().await?;
    cache.set(&CacheService::status_key(service), &status, None).await?;

    let movies = radarr.list_movies().await?;
    cache.set(&CacheService::collection_key(service), &movies, None).await?;
    for movie in &movies {
        cache.set(&CacheService::item_key(service, movie.id), movie, None).await?;
    }

    let queue = radarr.queue().await?;
    cache.set(&CacheService::queue_key(service), &queue, Some(QUEUE_TTL)).await?;

    let root_folders = radarr.root_folders().await?;
    cache.set(&CacheService::root_folders_key(service), &root_folders, None).await?;

    let profiles = radarr.quality_profiles().await?;
    cache.set(&CacheService::quality_profiles_key(service), &profiles, None).await?;

    Ok(5 + movies.len())
}
