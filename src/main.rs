use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arr_proxy::{
    config::{CacheBackend, Config, LogFormat},
    handlers,
    jobs::{JobExecutor, JobQueue},
    services::{CacheService, Service},
    state::AppState,
    tasks,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "arr_proxy=debug,tower_http=debug".into());
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!("Starting arr-proxy...");

    // Connect to the cache store
    let cache = match config.cache_backend {
        CacheBackend::Redis => {
            let redis_client = redis::Client::open(config.redis_url())
                .context("REDIS_HOST/REDIS_PORT do not form a valid Redis URL")?;
            let redis_conn = redis_client
                .get_connection_manager()
                .await
                .with_context(|| format!("Failed to connect to Redis at {}", config.redis_url()))?;
            tracing::info!("Connected to Redis");
            CacheService::new(redis_conn)
        }
        CacheBackend::Memory => {
            tracing::warn!("Using in-process cache; entries are lost on restart");
            CacheService::in_memory()
        }
    }
    .with_default_ttl(config.cache_ttl_seconds);

    // Initialize job queue
    let (job_queue, job_receiver) = JobQueue::new(cache.clone());
    tracing::info!("Job queue initialized");

    // Initialize application state
    let state = AppState::new(config.clone(), cache, job_queue)?;
    for service in Service::ALL {
        if state.is_configured(service) {
            tracing::info!("{} upstream configured", service);
        } else {
            tracing::warn!("{} API key not set; its routes will answer 503", service);
        }
    }

    let upstream_state = state.clone();
    tokio::spawn(async move {
        upstream_state.check_upstreams().await;
    });

    // Start job executor
    let executor = JobExecutor::new(state.clone(), job_receiver);
    tokio::spawn(async move {
        executor.start().await;
    });
    tracing::info!("Job executor started");

    // Start background tasks
    let _task_scheduler = tasks::start_scheduler(state.clone()).await?;
    tracing::info!("Background task scheduler started");

    // Build application routes
    let app = handlers::create_router(state);

    // Start server
    let ip = config
        .server_host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("SERVER_HOST is not an IP address: {}", config.server_host))?;
    let addr = SocketAddr::from((ip, config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {} (docs at /docs)", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
