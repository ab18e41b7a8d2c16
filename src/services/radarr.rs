use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::{AppError, Result};
use crate::services::arr::ArrClient;
use crate::services::models::{
    Command, CommandResponse, Movie, QualityProfile, QueuePage, RootFolder, SystemStatus,
};

/// Client for a Radarr instance.
#[derive(Clone)]
pub struct RadarrService {
    client: ArrClient,
}

impl RadarrService {
    pub fn new(client: ArrClient) -> Self {
        Self { client }
    }

    pub fn from_config(
        config: &UpstreamConfig,
        timeout: Duration,
        requests_per_second: NonZeroU32,
    ) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Ok(None);
        };

        let client = ArrClient::new("Radarr", &config.url, api_key, timeout, requests_per_second)?;
        Ok(Some(Self::new(client)))
    }

    pub fn client(&self) -> &ArrClient {
        &self.client
    }

    pub async fn system_status(&self) -> Result<SystemStatus> {
        self.client.get("system/status", &[]).await
    }

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.client.get("movie", &[]).await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Movie> {
        self.client.get(&format!("movie/{}", id), &[]).await
    }

    /// Search TMDb through Radarr
    pub async fn lookup_movies(&self, term: &str) -> Result<Value> {
        self.client
            .get("movie/lookup", &[("term", term.to_string())])
            .await
    }

    pub async fn add_movie(&self, body: &Value) -> Result<Movie> {
        self.client.post("movie", body).await
    }

    pub async fn delete_movie(&self, id: i32, delete_files: bool) -> Result<()> {
        self.client
            .delete(
                &format!("movie/{}", id),
                &[("deleteFiles", delete_files.to_string())],
            )
            .await
    }

    pub async fn queue(&self) -> Result<QueuePage> {
        self.client.get("queue", &[]).await
    }

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

    pub async fn search_movie(&self, id: i32) -> Result<CommandResponse> {
        if id <= 0 {
            return Err(AppError::BadRequest(format!("Invalid movie id {}", id)));
        }

        let command = Command {
            name: "MoviesSearch".to_string(),
            series_id: None,
            movie_ids: Some(vec![id]),
        };

        self.client.post("command", &command).await
    }
}
