use dashmap::DashMap;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::services::Service;

const DEFAULT_TTL: u64 = 300; // 5 minutes in seconds

/// Download queues change quickly; keep them for 30 seconds only.
pub const QUEUE_TTL: u64 = 30;

/// Expired memory entries are swept once every this many writes.
const SWEEP_INTERVAL: usize = 64;

#[derive(Debug, Clone)]
struct MemoryEntry {
    json: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

#[derive(Default)]
struct MemoryStore {
    entries: DashMap<String, MemoryEntry>,
    writes: AtomicUsize,
}

impl MemoryStore {
    fn insert(&self, key: &str, entry: MemoryEntry) {
        self.entries.insert(key.to_string(), entry);
        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0 {
            self.evict_expired();
        }
    }

    fn evict_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            tracing::debug!("Evicted {} expired cache entries", evicted);
        }
        evicted
    }
}

#[derive(Clone)]
enum Backend {
    Redis(ConnectionManager),
    Memory(Arc<MemoryStore>),
}

/// JSON key/value store used for memoized upstream responses and job records.
#[derive(Clone)]
pub struct CacheService {
    backend: Backend,
    default_ttl: u64,
}

impl CacheService {
    pub fn new(redis: ConnectionManager) -> Self {
        Self {
            backend: Backend::Redis(redis),
            default_ttl: DEFAULT_TTL,
        }
    }

    /// In-process store with the same semantics as the Redis backend.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
            default_ttl: DEFAULT_TTL,
        }
    }

    pub fn with_default_ttl(mut self, ttl_seconds: u64) -> Self {
        self.default_ttl = ttl_seconds;
        self
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Redis(_) => "redis",
            Backend::Memory(_) => "memory",
        }
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let data: Option<String> = match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.clone();
                conn.get(key).await?
            }
            Backend::Memory(store) => {
                let entry = store.entries.get(key).map(|e| e.clone());
                match entry {
                    Some(e) if e.is_expired() => {
                        store.entries.remove(key);
                        None
                    }
                    Some(e) => Some(e.json),
                    None => None,
                }
            }
        };

        match data {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with TTL
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.clone();
                let _: () = conn.set_ex(key, json, ttl).await?;
            }
            Backend::Memory(store) => {
                store.insert(
                    key,
                    MemoryEntry {
                        json,
                        expires_at: Some(Instant::now() + Duration::from_secs(ttl)),
                    },
                );
            }
        }
        Ok(())
    }

    /// Set a value with no expiration
    pub async fn set_permanent<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.clone();
                let _: () = conn.set(key, json).await?;
            }
            Backend::Memory(store) => {
                store.insert(
                    key,
                    MemoryEntry {
                        json,
                        expires_at: None,
                    },
                );
            }
        }
        Ok(())
    }

    /// Delete a key from cache
    pub async fn delete(&self, key: &str) -> Result<()> {
        match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.clone();
                let _: usize = conn.del(key).await?;
            }
            Backend::Memory(store) => {
                store.entries.remove(key);
            }
        }
        Ok(())
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.clone();
                let exists: bool = conn.exists(key).await?;
                Ok(exists)
            }
            Backend::Memory(store) => Ok(store
                .entries
                .get(key)
                .is_some_and(|e| !e.is_expired())),
        }
    }

    /// Remove every key starting with `prefix`, returning how many were removed.
    pub async fn invalidate_prefix(&self, prefix: &str) -> Result<usize> {
        match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.clone();
                let pattern = format!("{}*", prefix);
                let keys: Vec<String> = {
                    let mut iter = conn.scan_match::<_, String>(pattern).await?;
                    let mut keys = Vec::new();
                    while let Some(key) = iter.next_item().await {
                        keys.push(key);
                    }
                    keys
                };

                if keys.is_empty() {
                    return Ok(0);
                }

                let removed: usize = conn.del(&keys).await?;
                Ok(removed)
            }
            Backend::Memory(store) => {
                // Expired entries are dropped without being counted.
                let mut removed = 0;
                store.entries.retain(|key, entry| {
                    if entry.is_expired() {
                        return false;
                    }
                    if key.starts_with(prefix) {
                        removed += 1;
                        return false;
                    }
                    true
                });
                Ok(removed)
            }
        }
    }

    /// Drop expired entries from the in-process store. Redis expires keys on
    /// its own, so this is a no-op there.
    pub fn evict_expired(&self) -> usize {
        match &self.backend {
            Backend::Redis(_) => 0,
            Backend::Memory(store) => store.evict_expired(),
        }
    }

    #[cfg(test)]
    fn memory_len(&self) -> usize {
        match &self.backend {
            Backend::Redis(_) => 0,
            Backend::Memory(store) => store.entries.len(),
        }
    }

    /// Round-trip to the store; used by the health check.
    pub async fn ping(&self) -> Result<()> {
        if let Backend::Redis(redis) = &self.backend {
            let mut conn = redis.clone();
            redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        }
        Ok(())
    }

    /// Cache key builders for consistent naming
    pub fn service_prefix(service: Service) -> String {
        format!("{}:", service.as_str())
    }

    pub fn status_key(service: Service) -> String {
        format!("{}:status", service.as_str())
    }

    pub fn collection_key(service: Service) -> String {
        format!("{}:{}", service.as_str(), service.collection())
    }

    pub fn item_key(service: Service, id: i32) -> String {
        format!("{}:{}:{}", service.as_str(), service.collection(), id)
    }

    pub fn lookup_key(service: Service, term: &str) -> String {
        format!(
            "{}:lookup:{}",
            service.as_str(),
            hash_fragment(&term.trim().to_lowercase())
        )
    }

    pub fn queue_key(service: Service) -> String {
        format!("{}:queue", service.as_str())
    }

    pub fn calendar_key(service: Service, start: &str, end: &str) -> String {
        format!(
            "{}:calendar:{}",
            service.as_str(),
            hash_fragment(&format!("{}..{}", start, end))
        )
    }

    pub fn root_folders_key(service: Service) -> String {
        format!("{}:rootfolders", service.as_str())
    }

    pub fn quality_profiles_key(service: Service) -> String {
        format!("{}:qualityprofiles", service.as_str())
    }

    pub fn job_key(job_id: uuid::Uuid) -> String {
        format!("job:{}", job_id)
    }
}

/// First 16 hex chars of the SHA-256 of `input`.
fn hash_fragment(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}
