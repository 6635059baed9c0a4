//! 响应缓存模块：以查询键为地址的显式缓存对象。
//!
//! # Response Caching Module
//!
//! Caches API responses under composite [`QueryKey`](crate::query::QueryKey)s.
//! The cache is a plain value with an explicit lifecycle; there is no
//! process-wide instance.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`QueryCache`] | Cache manager with TTL, key prefixing, invalidation and statistics |
//! | [`CacheConfig`] | Configuration for cache behavior and limits |
//! | [`CacheBackend`] | Trait for implementing custom cache backends |
//! | [`MemoryCache`] | In-memory LRU cache implementation |
//! | [`NullCache`] | No-op cache for disabling caching |
//!
//! ## Example
//!
//! ```rust
//! use pitch_hub::cache::{CacheConfig, QueryCache};
//! use pitch_hub::query::build_key;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cache = QueryCache::from_config(CacheConfig::new().with_ttl(Duration::from_secs(60)));
//! let key = build_key(["pitches", "p1", "documents"], None).unwrap();
//! cache.set(&key, &vec!["deck.pdf"]).await.unwrap();
//! let docs: Option<Vec<String>> = cache.get(&key).await.unwrap();
//! assert_eq!(docs.unwrap(), vec!["deck.pdf"]);
//! cache.shutdown().await.unwrap();
//! # }
//! ```
//!
//! Invalidation is prefix based: invalidating `["pitches", "p1"]` drops every
//! cached list for that pitch regardless of the params it was fetched with.

mod backend;
mod manager;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use manager::{CacheConfig, CacheStats, QueryCache};
