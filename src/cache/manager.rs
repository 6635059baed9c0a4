//! Cache manager.

use super::backend::{CacheBackend, MemoryCache, NullCache};
use crate::query::QueryKey;
use crate::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub default_ttl: Duration,
    pub enabled: bool,
    pub max_entries: usize,
    pub max_entry_size: usize,
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            enabled: true,
            max_entries: 1000,
            max_entry_size: 10 * 1024 * 1024,
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub invalidations: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    invalidations: AtomicU64,
    errors: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Response cache addressed by [`QueryKey`].
///
/// This is an ordinary value owned by the application: create one at startup,
/// share it through an `Arc`, and call [`QueryCache::shutdown`] when done. Tests
/// build their own so nothing leaks between them.
pub struct QueryCache {
    config: CacheConfig,
    backend: Box<dyn CacheBackend>,
    stats: Arc<AtomicStats>,
}

impl QueryCache {
    pub fn new(config: CacheConfig, backend: Box<dyn CacheBackend>) -> Self {
        Self {
            config,
            backend,
            stats: Arc::new(AtomicStats::default()),
        }
    }

    /// Memory backend sized from the config, or a null backend when disabled.
    pub fn from_config(config: CacheConfig) -> Self {
        let backend: Box<dyn CacheBackend> = if config.enabled {
            Box::new(MemoryCache::new(config.max_entries))
        } else {
            Box::new(NullCache::new())
        };
        Self::new(config, backend)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        if !self.config.enabled {
            return Ok(None);
        }
        let prefixed = self.prefix_key(key);
        match self.backend.get(&prefixed).await {
            Ok(Some(data)) => match serde_json::from_slice(&data) {
                Ok(val) => {
                    AtomicStats::bump(&self.stats.hits);
                    debug!(key = %key, "cache hit");
                    Ok(Some(val))
                }
                Err(e) => {
                    AtomicStats::bump(&self.stats.errors);
                    warn!(key = %key, error = %e, "cached entry could not be decoded");
                    Ok(None)
                }
            },
            Ok(None) => {
                AtomicStats::bump(&self.stats.misses);
                debug!(key = %key, "cache miss");
                Ok(None)
            }
            Err(e) => {
                AtomicStats::bump(&self.stats.errors);
                Err(e)
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<()> {
        self.set_with_ttl(key, value, self.config.default_ttl).await
    }

    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &QueryKey,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }
        let data = serde_json::to_vec(value)?;
        if data.len() > self.config.max_entry_size {
            debug!(key = %key, size = data.len(), "entry exceeds max size, not cached");
            return Ok(());
        }
        let prefixed = self.prefix_key(key);
        match self.backend.set(&prefixed, &data, ttl).await {
            Ok(()) => {
                AtomicStats::bump(&self.stats.sets);
                let fp = prefixed.fingerprint();
                debug!(key = %key, fingerprint = &fp[..8], "stored");
                Ok(())
            }
            Err(e) => {
                AtomicStats::bump(&self.stats.errors);
                Err(e)
            }
        }
    }

    pub async fn delete(&self, key: &QueryKey) -> Result<bool> {
        if !self.config.enabled {
            return Ok(false);
        }
        let prefixed = self.prefix_key(key);
        match self.backend.delete(&prefixed).await {
            Ok(d) => {
                if d {
                    AtomicStats::bump(&self.stats.deletes);
                }
                Ok(d)
            }
            Err(e) => {
                AtomicStats::bump(&self.stats.errors);
                Err(e)
            }
        }
    }

    /// Drops every entry under `prefix` (a base key or any shorter prefix).
    pub async fn invalidate(&self, prefix: &QueryKey) -> Result<usize> {
        if !self.config.enabled {
            return Ok(0);
        }
        let prefixed = self.prefix_key(prefix);
        match self.backend.delete_prefix(&prefixed).await {
            Ok(n) => {
                self.stats
                    .invalidations
                    .fetch_add(n as u64, Ordering::Relaxed);
                info!(prefix = %prefix, removed = n, "invalidated cached queries");
                Ok(n)
            }
            Err(e) => {
                AtomicStats::bump(&self.stats.errors);
                Err(e)
            }
        }
    }

    pub async fn contains(&self, key: &QueryKey) -> Result<bool> {
        if !self.config.enabled {
            return Ok(false);
        }
        self.backend.exists(&self.prefix_key(key)).await
    }

    pub async fn len(&self) -> Result<usize> {
        self.backend.len().await
    }

    pub async fn clear(&self) -> Result<()> {
        self.backend.clear().await
    }

    /// Releases all cached data at the end of the cache's lifetime.
    pub async fn shutdown(self) -> Result<()> {
        let stats = self.stats();
        self.backend.clear().await?;
        info!(
            backend = self.backend.name(),
            hits = stats.hits,
            misses = stats.misses,
            "query cache shut down"
        );
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn prefix_key(&self, key: &QueryKey) -> QueryKey {
        if let Some(ref p) = self.config.key_prefix {
            key.prefixed(p.as_str())
        } else {
            key.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache() -> QueryCache {
        QueryCache::from_config(CacheConfig::new().with_max_entries(16))
    }

    #[tokio::test]
    async fn test_get_set_and_stats() {
        let cache = cache();
        let key = QueryKey::from(["pitches", "p1", "documents"]);
        assert_eq!(cache.get::<serde_json::Value>(&key).await.unwrap(), None);
        cache.set(&key, &json!([{"id": 1}])).await.unwrap();
        let got: serde_json::Value = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(got, json!([{"id": 1}]));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.hit_ratio(), 0.5);
    }

    #[tokio::test]
    async fn test_disabled_cache_is_inert() {
        let cache = QueryCache::from_config(CacheConfig::new().with_enabled(false));
        let key = QueryKey::from(["a"]);
        cache.set(&key, &1).await.unwrap();
        assert_eq!(cache.get::<i32>(&key).await.unwrap(), None);
        assert_eq!(cache.backend_name(), "null");
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_key_prefix_is_applied_consistently() {
        let cache = QueryCache::from_config(CacheConfig::new().with_key_prefix("tenant-a"));
        let key = QueryKey::from(["pitches", "p1", "videos"]);
        cache.set(&key, &"v").await.unwrap();
        assert!(cache.contains(&key).await.unwrap());
        assert_eq!(
            cache.invalidate(&QueryKey::from(["pitches"])).await.unwrap(),
            1
        );
        assert!(!cache.contains(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_oversize_entries_are_skipped() {
        let mut config = CacheConfig::new();
        config.max_entry_size = 4;
        let cache = QueryCache::from_config(config);
        let key = QueryKey::from(["big"]);
        cache.set(&key, &"0123456789").await.unwrap();
        assert!(!cache.contains(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_undecodable_entry_counts_as_error() {
        let cache = cache();
        let key = QueryKey::from(["a"]);
        cache.set(&key, &"text").await.unwrap();
        assert_eq!(cache.get::<u32>(&key).await.unwrap(), None);
        assert_eq!(cache.stats().errors, 1);
    }

    #[tokio::test]
    async fn test_shutdown_clears_backend() {
        let cache = cache();
        cache.set(&QueryKey::from(["a"]), &1).await.unwrap();
        assert_eq!(cache.len().await.unwrap(), 1);
        cache.shutdown().await.unwrap();
    }
}
