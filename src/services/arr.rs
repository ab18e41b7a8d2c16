use governor::{clock::DefaultClock, state::direct::NotKeyed, state::InMemoryState, Quota, RateLimiter};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};

const API_PREFIX: &str = "api/v3";

/// HTTP plumbing shared by the Sonarr and Radarr clients.
///
/// Both applications expose the same Servarr v3 API surface: JSON over HTTP,
/// authenticated with an `X-Api-Key` header.
#[derive(Clone)]
pub struct ArrClient {
    name: &'static str,
    base_url: String,
    api_key: String,
    client: Client,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl ArrClient {
    pub fn new(
        name: &'static str,
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        requests_per_second: NonZeroU32,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second)));

        Ok(Self {
            name,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            rate_limiter,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.rate_limiter.until_ready().await;
        tracing::debug!("GET {} {}", self.name, path);

        let response = self
            .client
            .get(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let response = self.check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.rate_limiter.until_ready().await;
        tracing::debug!("POST {} {}", self.name, path);

        let response = self
            .client
            .post(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let response = self.check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        self.rate_limiter.until_ready().await;
        tracing::debug!("DELETE {} {}", self.name, path);

        let response = self
            .client
            .delete(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        self.check(response).await?;
        Ok(())
    }

    /// Test connection to the upstream instance
    pub async fn test_connection(&self) -> Result<bool> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(self.url("system/status"))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn check(&self, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        Err(AppError::Upstream {
            service: self.name,
            status: status.as_u16(),
            message: error_text,
        })
    }
}
