use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;

use crate::error::Result;
use crate::services::cache::CacheService;

pub const CACHE_STATUS_HEADER: &str = "x-cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the store.
    Hit,
    /// Fetched upstream and stored.
    Miss,
    /// Fetched upstream; the store was unavailable.
    Bypass,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::Bypass => "BYPASS",
        }
    }
}

/// A response value tagged with where it came from.
#[derive(Debug)]
pub struct Cached<T> {
    pub value: T,
    pub status: CacheStatus,
}

impl<T: Serialize> IntoResponse for Cached<T> {
    fn into_response(self) -> Response {
        ([(CACHE_STATUS_HEADER, self.status.as_str())], Json(self.value)).into_response()
    }
}

/// Read-through lookup: serve `key` from the store, or run `fetch` and store
/// its result for `ttl` seconds (`None` = the store's default TTL).
///
/// Store failures never fail the request; they are logged and the upstream
/// result is returned with [`CacheStatus::Bypass`]. Errors from `fetch` are
/// propagated and nothing is stored.
pub async fn fetch_cached<T, F, Fut>(
    cache: &CacheService,
    key: &str,
    ttl: Option<u64>,
    fetch: F,
) -> Result<Cached<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut store_available = true;

    match cache.get::<T>(key).await {
        Ok(Some(value)) => {
            tracing::debug!("Cache hit for {}", key);
            return Ok(Cached {
                value,
                status: CacheStatus::Hit,
            });
        }
        Ok(None) => tracing::debug!("Cache miss for {}", key),
        Err(e) => {
            tracing::warn!("Cache read failed for {}: {}", key, e);
            store_available = false;
        }
    }

    let value = fetch().await?;

    let status = if store_available {
        match cache.set(key, &value, ttl).await {
            Ok(()) => CacheStatus::Miss,
            Err(e) => {
                tracing::warn!("Cache write failed for {}: {}", key, e);
                CacheStatus::Bypass
            }
        }
    } else {
        CacheStatus::Bypass
    };

    Ok(Cached { value, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = CacheService::in_memory();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(vec![1, 2, 3])
        };

        let first = fetch_cached(&cache, "sonarr:series", None, fetch).await.unwrap();
        assert_eq!(first.status, CacheStatus::Miss);
        assert_eq!(first.value, vec![1, 2, 3]);

        let second = fetch_cached(&cache, "sonarr:series", None, fetch).await.unwrap();
        assert_eq!(second.status, CacheStatus::Hit);
        assert_eq!(second.value, vec![1, 2, 3]);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let cache = CacheService::in_memory();

        let result: Result<Cached<Vec<i32>>> = fetch_cached(&cache, "radarr:movies", None, || async {
            Err(AppError::NotConfigured("Radarr"))
        })
        .await;

        assert!(matches!(result, Err(AppError::NotConfigured("Radarr"))));
        assert!(!cache.exists("radarr:movies").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_entry_falls_back_to_upstream() {
        let cache = CacheService::in_memory();
        cache.set("radarr:status", &"not an object", None).await.unwrap();

        let result = fetch_cached(&cache, "radarr:status", None, || async {
            Ok::<_, AppError>(vec![42])
        })
        .await
        .unwrap();

        assert_eq!(result.status, CacheStatus::Bypass);
        assert_eq!(result.value, vec![42]);
    }

    #[test]
    fn test_response_carries_cache_header() {
        let response = Cached {
            value: serde_json::json!({"ok": true}),
            status: CacheStatus::Hit,
        }
        .into_response();

        assert_eq!(response.headers()[CACHE_STATUS_HEADER], "HIT");
    }
}
