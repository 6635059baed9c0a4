//! Cache backend implementations.

use crate::query::QueryKey;
use crate::Result;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct CacheEntry {
    data: Vec<u8>,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &QueryKey) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &QueryKey, value: &[u8], ttl: Duration) -> Result<()>;
    async fn delete(&self, key: &QueryKey) -> Result<bool>;
    /// Removes every entry whose key starts with `prefix`; returns how many were still live.
    async fn delete_prefix(&self, prefix: &QueryKey) -> Result<usize>;
    async fn exists(&self, key: &QueryKey) -> Result<bool>;
    async fn clear(&self) -> Result<()>;
    async fn len(&self) -> Result<usize>;
    fn name(&self) -> &'static str;
}

/// In-memory backend with least-recently-used eviction and per-entry TTL.
pub struct MemoryCache {
    entries: Mutex<LruCache<QueryKey, CacheEntry>>,
}

impl MemoryCache {
    /// `max_entries` of zero is treated as one.
    pub fn new(max_entries: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<QueryKey, CacheEntry>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &QueryKey) -> Result<Option<Vec<u8>>> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.data.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }
    async fn set(&self, key: &QueryKey, value: &[u8], ttl: Duration) -> Result<()> {
        let mut entries = self.lock();
        entries.put(key.clone(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }
    async fn delete(&self, key: &QueryKey) -> Result<bool> {
        Ok(self.lock().pop(key).is_some())
    }
    async fn delete_prefix(&self, prefix: &QueryKey) -> Result<usize> {
        let mut entries = self.lock();
        let matching: Vec<QueryKey> = entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();
        // expired entries are dropped too but only live ones are counted
        let mut live = 0;
        for k in &matching {
            if let Some(entry) = entries.pop(k) {
                if !entry.is_expired() {
                    live += 1;
                }
            }
        }
        Ok(live)
    }
    async fn exists(&self, key: &QueryKey) -> Result<bool> {
        Ok(self
            .lock()
            .peek(key)
            .map(|e| !e.is_expired())
            .unwrap_or(false))
    }
    async fn clear(&self) -> Result<()> {
        self.lock().clear();
        Ok(())
    }
    async fn len(&self) -> Result<usize> {
        Ok(self
            .lock()
            .iter()
            .filter(|(_, e)| !e.is_expired())
            .count())
    }
    fn name(&self) -> &'static str {
        "memory"
    }
}

pub struct NullCache;
impl NullCache {
    pub fn new() -> Self {
        Self
    }
}
impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _: &QueryKey) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
    async fn set(&self, _: &QueryKey, _: &[u8], _: Duration) -> Result<()> {
        Ok(())
    }
    async fn delete(&self, _: &QueryKey) -> Result<bool> {
        Ok(false)
    }
    async fn delete_prefix(&self, _: &QueryKey) -> Result<usize> {
        Ok(0)
    }
    async fn exists(&self, _: &QueryKey) -> Result<bool> {
        Ok(false)
    }
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
    async fn len(&self) -> Result<usize> {
        Ok(0)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
