use crate::cache::QueryCache;
use crate::client::core::QueryClient;
use crate::config::HubConfig;
use crate::transport::{Fetcher, HttpFetcher};
use crate::Result;
use std::sync::Arc;

/// Builder for creating clients with custom configuration.
pub struct QueryClientBuilder {
    config: HubConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    cache: Option<Arc<QueryCache>>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
}

impl QueryClientBuilder {
    pub fn new() -> Self {
        Self {
            config: HubConfig::default(),
            fetcher: None,
            cache: None,
            base_url_override: None,
        }
    }

    pub fn config(mut self, config: HubConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Use a custom fetcher instead of HTTP.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Share an existing cache between clients.
    pub fn cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<QueryClient> {
        let mut config = self.config;
        if let Some(url) = self.base_url_override {
            config.api.base_url = url;
        }

        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(f) => f,
            None => Arc::new(HttpFetcher::new(&config.api)?),
        };
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(QueryCache::from_config(config.cache.to_cache_config())));

        Ok(QueryClient::new(cache, fetcher))
    }
}

impl Default for QueryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
