//! Request/response seam between the query client and the hub API.

mod http;

pub use http::{HttpFetcher, TransportError};

use crate::query::QueryParams;
use crate::Result;
use async_trait::async_trait;

/// Loads the JSON document behind an API path.
///
/// Implementations must not cache; caching is the query client's job.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, path: &str, params: Option<&QueryParams>) -> Result<serde_json::Value>;

    fn name(&self) -> &'static str {
        "custom"
    }
}
