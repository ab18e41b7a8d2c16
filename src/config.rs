use anyhow::{bail, Context, Result};
use std::env;
use std::num::NonZeroU32;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => bail!("CACHE_BACKEND must be 'redis' or 'memory', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

/// Connection settings for one Servarr instance.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub sonarr: UpstreamConfig,
    pub radarr: UpstreamConfig,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: u8,
    pub cache_backend: CacheBackend,
    pub cache_ttl_seconds: u64,
    pub upstream_timeout_seconds: u64,
    pub upstream_rate_limit: NonZeroU32,
    pub media_file: Option<String>,
    pub cache_warm_schedule: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source; `from_env` reads the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        Ok(Self {
            server_host: vars.or("SERVER_HOST", "0.0.0.0"),
            server_port: vars.parse("SERVER_PORT", "8000")?,
            sonarr: UpstreamConfig {
                url: vars.or("SONARR_URL", "http://localhost:8989"),
                api_key: vars.non_empty("SONARR_API_KEY"),
            },
            radarr: UpstreamConfig {
                url: vars.or("RADARR_URL", "http://localhost:7878"),
                api_key: vars.non_empty("RADARR_API_KEY"),
            },
            redis_host: vars.or("REDIS_HOST", "localhost"),
            redis_port: vars.parse("REDIS_PORT", "6379")?,
            redis_db: vars.parse("REDIS_DB", "0")?,
            cache_backend: vars.parse("CACHE_BACKEND", "redis")?,
            cache_ttl_seconds: vars.parse("CACHE_TTL_SECONDS", "300")?,
            upstream_timeout_seconds: vars.parse("UPSTREAM_TIMEOUT_SECONDS", "30")?,
            upstream_rate_limit: vars.parse("UPSTREAM_RATE_LIMIT", "10")?,
            media_file: vars.non_empty("MEDIA_FILE"),
            cache_warm_schedule: vars.non_empty("CACHE_WARM_SCHEDULE"),
            log_format: vars.parse("LOG_FORMAT", "pretty")?,
        })
    }

    pub fn redis_url(&self) -> String {
        format!(
            "redis://{}:{}/{}",
            self.redis_host, self.redis_port, self.redis_db
        )
    }
}

struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    fn or(&self, name: &str, default: &str) -> String {
        (self.0)(name).unwrap_or_else(|| default.to_string())
    }

    fn non_empty(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn parse<T>(&self, name: &str, default: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.or(name, default);
        raw.trim()
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{}", e))
            .with_context(|| format!("{} has an invalid value: '{}'", name, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    fn error_chain(err: &anyhow::Error) -> String {
        format!("{:#}", err)
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.sonarr.url, "http://localhost:8989");
        assert_eq!(config.sonarr.api_key, None);
        assert_eq!(config.radarr.url, "http://localhost:7878");
        assert_eq!(config.cache_backend, CacheBackend::Redis);
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.upstream_rate_limit.get(), 10);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.redis_url(), "redis://localhost:6379/0");
    }

    #[test]
    fn test_overrides_and_blank_keys() {
        let config = config_from(&[
            ("SONARR_URL", "http://sonarr:8989"),
            ("SONARR_API_KEY", "abc"),
            ("RADARR_API_KEY", "  "),
            ("SERVER_PORT", " 9000 "),
            ("CACHE_BACKEND", "memory"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.sonarr.url, "http://sonarr:8989");
        assert_eq!(config.sonarr.api_key.as_deref(), Some("abc"));
        assert_eq!(config.radarr.api_key, None);
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_names_variable() {
        let err = config_from(&[("SERVER_PORT", "abc")]).unwrap_err();
        assert!(error_chain(&err).contains("SERVER_PORT"));
    }

    #[test]
    fn test_unknown_backend_names_variable() {
        let err = config_from(&[("CACHE_BACKEND", "memcached")]).unwrap_err();
        assert!(error_chain(&err).contains("CACHE_BACKEND"));

        let err = config_from(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(error_chain(&err).contains("LOG_FORMAT"));
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let err = config_from(&[("UPSTREAM_RATE_LIMIT", "0")]).unwrap_err();
        assert!(error_chain(&err).contains("UPSTREAM_RATE_LIMIT"));
    }

    #[test]
    fn test_out_of_range_redis_db_rejected() {
        let err = config_from(&[("REDIS_DB", "300")]).unwrap_err();
        assert!(error_chain(&err).contains("REDIS_DB"));
    }

    #[test]
    fn test_cache_backend_parse() {
        assert_eq!("redis".parse::<CacheBackend>().unwrap(), CacheBackend::Redis);
        assert_eq!("Memory".parse::<CacheBackend>().unwrap(), CacheBackend::Memory);
        assert!("memcached".parse::<CacheBackend>().is_err());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_redis_url() {
        let mut config = crate::test_utils::test_config();
        config.redis_host = "cache.internal".to_string();
        config.redis_port = 6380;
        config.redis_db = 2;

        assert_eq!(config.redis_url(), "redis://cache.internal:6380/2");
    }
}
