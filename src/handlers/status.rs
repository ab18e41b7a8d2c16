use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::Result,
    services::{Service, SystemStatus},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UpstreamStatus {
    pub configured: bool,
    pub reachable: bool,
    pub version: Option<String>,
    pub error: Option<String>,
}

impl UpstreamStatus {
    fn not_configured() -> Self {
        Self {
            configured: false,
            reachable: false,
            version: None,
            error: None,
        }
    }

    fn from_result(result: Result<SystemStatus>) -> Self {
        match result {
            Ok(status) => Self {
                configured: true,
                reachable: true,
                version: Some(status.version),
                error: None,
            },
            Err(e) => Self {
                configured: true,
                reachable: false,
                version: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub sonarr: UpstreamStatus,
    pub radarr: UpstreamStatus,
}

/// Live (uncached) reachability of both upstreams.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let sonarr = async {
        match &state.sonarr {
            Some(sonarr) => UpstreamStatus::from_result(sonarr.system_status().await),
            None => UpstreamStatus::not_configured(),
        }
    };
    let radarr = async {
        match &state.radarr {
            Some(radarr) => UpstreamStatus::from_result(radarr.system_status().await),
            None => UpstreamStatus::not_configured(),
        }
    };

    let (sonarr, radarr) = tokio::join!(sonarr, radarr);

    for (service, status) in [(Service::Sonarr, &sonarr), (Service::Radarr, &radarr)] {
        if status.configured && !status.reachable {
            tracing::warn!("{} is unreachable: {:?}", service, status.error);
        }
    }

    Json(StatusResponse { sonarr, radarr })
}
