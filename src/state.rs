use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::jobs::JobQueue;
use crate::services::{CacheService, RadarrService, Service, SonarrService};

#[derive(Clone)]
pub struct AppState {
    pub cache: CacheService,
    pub config: Arc<Config>,
    pub sonarr: Option<SonarrService>,
    pub radarr: Option<RadarrService>,
    pub job_queue: JobQueue,
}

impl AppState {
    pub fn new(config: Config, cache: CacheService, job_queue: JobQueue) -> Result<Self> {
        let timeout = Duration::from_secs(config.upstream_timeout_seconds);
        let rate = config.upstream_rate_limit;

        let sonarr = SonarrService::from_config(&config.sonarr, timeout, rate)?;
        let radarr = RadarrService::from_config(&config.radarr, timeout, rate)?;

        Ok(Self {
            cache,
            config: Arc::new(config),
            sonarr,
            radarr,
            job_queue,
        })
    }

    pub fn sonarr(&self) -> Result<&SonarrService> {
        self.sonarr
            .as_ref()
            .ok_or(AppError::NotConfigured(Service::Sonarr.display_name()))
    }

    pub fn radarr(&self) -> Result<&RadarrService> {
        self.radarr
            .as_ref()
            .ok_or(AppError::NotConfigured(Service::Radarr.display_name()))
    }

    pub fn is_configured(&self, service: Service) -> bool {
        match service {
            Service::Sonarr => self.sonarr.is_some(),
            Service::Radarr => self.radarr.is_some(),
        }
    }

    /// Check every configured upstream once and log the outcome.
    pub async fn check_upstreams(&self) -> Vec<(Service, bool)> {
        let clients = [
            (Service::Sonarr, self.sonarr.as_ref().map(|s| s.client())),
            (Service::Radarr, self.radarr.as_ref().map(|r| r.client())),
        ];

        let mut results = Vec::new();
        for (service, client) in clients {
            let Some(client) = client else { continue };
            let reachable = match client.test_connection().await {
                Ok(true) => {
                    tracing::info!("{} reachable at {}", client.name(), client.base_url());
                    true
                }
                Ok(false) => {
                    tracing::warn!(
                        "{} at {} rejected the status request; check its API key",
                        client.name(),
                        client.base_url()
                    );
                    false
                }
                Err(e) => {
                    tracing::warn!("{} unreachable at {}: {}", client.name(), client.base_url(), e);
                    false
                }
            };
            results.push((service, reachable));
        }
        results
    }
}
