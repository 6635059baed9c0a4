use crate::cache::QueryCache;
use crate::query::{QueryKey, QueryParams};
use crate::transport::Fetcher;
use crate::Result;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// One logical read: where it is cached and where it is fetched from.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub base: QueryKey,
    pub path: String,
    pub params: Option<QueryParams>,
}

impl QueryRequest {
    pub fn new(base: QueryKey, path: impl Into<String>) -> Self {
        Self {
            base,
            path: path.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Composite cache key for this request.
    pub fn key(&self) -> Result<QueryKey> {
        self.base.with_params(self.params.as_ref())
    }
}

// Missing params and params with nothing present address the same entry.
impl PartialEq for QueryRequest {
    fn eq(&self, other: &Self) -> bool {
        let empty = QueryParams::new();
        self.base == other.base
            && self.path == other.path
            && self.params.as_ref().unwrap_or(&empty) == other.params.as_ref().unwrap_or(&empty)
    }
}

/// Reads API data through a [`QueryCache`].
///
/// Successful responses are stored as raw JSON under the request's composite
/// key; failed fetches leave the cache untouched.
#[derive(Clone)]
pub struct QueryClient {
    cache: Arc<QueryCache>,
    fetcher: Arc<dyn Fetcher>,
}

impl QueryClient {
    pub fn new(cache: Arc<QueryCache>, fetcher: Arc<dyn Fetcher>) -> Self {
        info!(
            backend = cache.backend_name(),
            fetcher = fetcher.name(),
            "query client ready"
        );
        Self { cache, fetcher }
    }

    pub fn builder() -> super::QueryClientBuilder {
        super::QueryClientBuilder::new()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Cached value for the request, fetching and storing it on a miss.
    pub async fn fetch_query<T: DeserializeOwned>(&self, request: &QueryRequest) -> Result<T> {
        let key = request.key()?;
        if let Some(value) = self.cache.get::<serde_json::Value>(&key).await? {
            return Ok(serde_json::from_value(value)?);
        }

        debug!(key = %key, path = %request.path, "fetching");
        let value = self
            .fetcher
            .fetch(&request.path, request.params.as_ref())
            .await?;
        self.cache.set(&key, &value).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Warms the cache for several requests concurrently.
    ///
    /// Results line up with `requests`; one failure does not stop the others.
    pub async fn prefetch_many(&self, requests: &[QueryRequest]) -> Vec<Result<()>> {
        join_all(requests.iter().map(|r| async move {
            self.fetch_query::<serde_json::Value>(r).await.map(|_| ())
        }))
        .await
    }

    pub async fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        self.cache.get(key).await
    }

    /// Writes a value straight into the cache, e.g. after a mutation.
    pub async fn set_query_data<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<()> {
        self.cache.set(key, value).await
    }

    /// Drops every cached entry under `prefix`.
    pub async fn invalidate(&self, prefix: &QueryKey) -> Result<usize> {
        self.cache.invalidate(prefix).await
    }

    pub async fn remove(&self, key: &QueryKey) -> Result<bool> {
        self.cache.delete(key).await
    }
}
