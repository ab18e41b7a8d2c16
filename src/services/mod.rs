pub mod arr;
pub mod cache;
pub mod cached;
pub mod models;
pub mod radarr;
pub mod sonarr;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use arr::ArrClient;
pub use cache::CacheService;
pub use cached::{fetch_cached, CacheStatus, Cached};
pub use models::{
    CommandResponse, Movie, QualityProfile, QueuePage, QueueRecord, RootFolder, Series,
    SystemStatus,
};
pub use radarr::RadarrService;
pub use sonarr::SonarrService;

/// The upstream media managers the proxy fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Sonarr,
    Radarr,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Sonarr, Service::Radarr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sonarr => "sonarr",
            Self::Radarr => "radarr",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sonarr => "Sonarr",
            Self::Radarr => "Radarr",
        }
    }

    /// Name of the library collection in cache keys and routes.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Sonarr => "series",
            Self::Radarr => "movies",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sonarr" => Ok(Self::Sonarr),
            "radarr" => Ok(Self::Radarr),
            other => Err(format!("Unknown service '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_parse() {
        assert_eq!("sonarr".parse::<Service>(), Ok(Service::Sonarr));
        assert_eq!("RADARR".parse::<Service>(), Ok(Service::Radarr));
        assert!("lidarr".parse::<Service>().is_err());
    }

    #[test]
    fn test_service_serde_is_lowercase() {
        let json = serde_json::to_string(&Service::Radarr).unwrap();
        assert_eq!(json, "\"radarr\"");
        let parsed: Service = serde_json::from_str("\"sonarr\"").unwrap();
        assert_eq!(parsed, Service::Sonarr);
    }
}
