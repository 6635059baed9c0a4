use super::Fetcher;
use crate::config::ApiConfig;
use crate::query::QueryParams;
use crate::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// [`Fetcher`] over HTTPS GET requests to the hub API.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(TransportError::InvalidUrl)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .user_agent(concat!("pitch-hub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// Full request URL; present params become the query string in key order.
    pub fn url_for(&self, path: &str, params: Option<&QueryParams>) -> Result<Url> {
        let mut url =
            Url::parse(&format!("{}{}", self.base_url, path)).map_err(TransportError::InvalidUrl)?;
        if let Some(params) = params {
            let present = params.sorted_present();
            if !present.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (k, v) in present {
                    pairs.append_pair(k, &v.to_query_string());
                }
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str, params: Option<&QueryParams>) -> Result<serde_json::Value> {
        let url = self.url_for(path, params)?;
        debug!(%url, "GET");

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(TransportError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(crate::Error::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let json = response.json().await.map_err(TransportError::Http)?;
        Ok(json)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: &str) -> HttpFetcher {
        HttpFetcher::new(&ApiConfig {
            base_url: base.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_without_params() {
        let url = fetcher("https://hub.example.com/api/")
            .url_for("/pitches/p1/videos", None)
            .unwrap();
        assert_eq!(url.as_str(), "https://hub.example.com/api/pitches/p1/videos");
    }

    #[test]
    fn test_url_with_params_is_sorted_and_skips_nulls() {
        let params = QueryParams::new()
            .with("sort", "recent")
            .with("owner", Option::<&str>::None)
            .with("page", 2);
        let url = fetcher("https://hub.example.com/api")
            .url_for("/pitches/p1/documents", Some(&params))
            .unwrap();
        assert_eq!(url.query(), Some("page=2&sort=recent"));
    }

    #[test]
    fn test_all_null_params_leave_no_query() {
        let params = QueryParams::new().with("q", Option::<&str>::None);
        let url = fetcher("https://hub.example.com")
            .url_for("/x", Some(&params))
            .unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpFetcher::new(&ApiConfig {
            base_url: "::nope".to_string(),
            ..ApiConfig::default()
        });
        assert!(matches!(result, Err(crate::Error::Transport(_))));
    }
}
