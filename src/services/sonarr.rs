use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::{AppError, Result};
use crate::services::arr::ArrClient;
use crate::services::models::{
    Command, CommandResponse, QualityProfile, QueuePage, RootFolder, Series, SystemStatus,
};

/// Client for a Sonarr instance.
#[derive(Clone)]
pub struct SonarrService {
    client: ArrClient,
}

impl SonarrService {
    pub fn new(client: ArrClient) -> Self {
        Self { client }
    }

    /// Build from configuration; `None` when no API key is set.
    pub fn from_config(
        config: &UpstreamConfig,
        timeout: Duration,
        requests_per_second: NonZeroU32,
    ) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Ok(None);
        };

        let client = ArrClient::new("Sonarr", &config.url, api_key, timeout, requests_per_second)?;
        Ok(Some(Self::new(client)))
    }

    pub fn client(&self) -> &ArrClient {
        &self.client
    }

    pub async fn system_status(&self) -> Result<SystemStatus> {
        self.client.get("system/status", &[]).await
    }

    pub async fn list_series(&self) -> Result<Vec<Series>> {
        self.client.get("series", &[]).await
    }

    pub async fn get_series(&self, id: i32) -> Result<Series> {
        self.client.get(&format!("series/{}", id), &[]).await
    }

    /// Search TheTVDB through Sonarr
    pub async fn lookup_series(&self, term: &str) -> Result<Value> {
        self.client
            .get("series/lookup", &[("term", term.to_string())])
            .await
    }

    pub async fn add_series(&self, body: &Value) -> Result<Series> {
        self.client.post("series", body).await
    }

    pub async fn delete_series(&self, id: i32, delete_files: bool) -> Result<()> {
        self.client
            .delete(
                &format!("series/{}", id),
                &[("deleteFiles", delete_files.to_string())],
            )
            .await
    }

    /// Get current download queue
    pub async fn queue(&self) -> Result<QueuePage> {
        self.client.get("queue", &[]).await
    }

    /// Episodes airing between `start` and `end` (inclusive, `YYYY-MM-DD`)
    pub async fn calendar(&self, start: &str, end: &str) -> Result<Value> {
        self.client
            .get(
                "calendar",
                &[("start", start.to_string()), ("end", end.to_string())],
            )
            .await
    }

    pub async fn root_folders(&self) -> Result<Vec<RootFolder>> {
        self.client.get("rootfolder", &[]).await
    }

    pub async fn quality_profiles(&self) -> Result<Vec<QualityProfile>> {
        self.client.get("qualityprofile", &[]).await
    }

    /// Trigger an indexer search for every monitored episode of a series
    pub async fn search_series(&self, id: i32) -> Result<CommandResponse> {
        if id <= 0 {
            return Err(AppError::BadRequest(format!("Invalid series id {}", id)));
        }

        let command = Command {
            name: "SeriesSearch".to_string(),
            series_id: Some(id),
            movie_ids: None,
        };

        self.client.post("command", &command).await
    }
}
