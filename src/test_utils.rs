//! Test utilities for arr-proxy
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory cache stores (one per test, no Redis needed)
//! - Upstream configuration pointing at mock servers
//! - AppState factories

use nonzero_ext::nonzero;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    config::{CacheBackend, Config, LogFormat, UpstreamConfig},
    jobs::{JobMessage, JobQueue},
    services::CacheService,
    state::AppState,
};

pub const TEST_API_KEY: &str = "test-api-key";

/// Create a test configuration with sensible defaults and no upstreams
pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 8000,
        sonarr: UpstreamConfig {
            url: "http://localhost:8989".to_string(),
            api_key: None,
        },
        radarr: UpstreamConfig {
            url: "http://localhost:7878".to_string(),
            api_key: None,
        },
        redis_host: "127.0.0.1".to_string(),
        redis_port: 6379,
        redis_db: 0,
        cache_backend: CacheBackend::Memory,
        cache_ttl_seconds: 300,
        upstream_timeout_seconds: 5,
        upstream_rate_limit: nonzero!(100u32),
        media_file: None,
        cache_warm_schedule: None,
        log_format: LogFormat::Pretty,
    }
}

/// Test configuration with upstreams at the given base URLs
pub fn test_config_with_upstreams(sonarr_url: Option<&str>, radarr_url: Option<&str>) -> Config {
    let mut config = test_config();
    if let Some(url) = sonarr_url {
        config.sonarr = UpstreamConfig {
            url: url.to_string(),
            api_key: Some(TEST_API_KEY.to_string()),
        };
    }
    if let Some(url) = radarr_url {
        config.radarr = UpstreamConfig {
            url: url.to_string(),
            api_key: Some(TEST_API_KEY.to_string()),
        };
    }
    config
}

/// Create an AppState from `config` with a fresh in-memory cache.
/// Returns (AppState, receiver) - keep receiver in scope to prevent queue from closing
pub fn setup_test_app_state_with_config(
    config: Config,
) -> (AppState, UnboundedReceiver<JobMessage>) {
    let cache = CacheService::in_memory().with_default_ttl(config.cache_ttl_seconds);
    let (job_queue, receiver) = JobQueue::new(cache.clone());
    let state = AppState::new(config, cache, job_queue).expect("Failed to build test AppState");

    (state, receiver)
}

/// Create a test AppState with no upstreams configured
pub fn setup_test_app_state() -> (AppState, UnboundedReceiver<JobMessage>) {
    setup_test_app_state_with_config(test_config())
}

/// Create a test AppState whose upstreams point at mock servers
pub fn setup_test_app_state_with_upstreams(
    sonarr_url: Option<&str>,
    radarr_url: Option<&str>,
) -> (AppState, UnboundedReceiver<JobMessage>) {
    setup_test_app_state_with_config(test_config_with_upstreams(sonarr_url, radarr_url))
}
