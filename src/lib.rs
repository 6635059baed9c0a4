//! # pitch-hub
//!
//! Pitch Hub 客户门户的数据层：确定性查询键、显式响应缓存与 API 拉取。
//!
//! Data layer for the Pitch Hub client portal, where a sales team shares
//! proposals, documents, videos, meeting notes and message threads with a
//! client and follows the client's engagement.
//!
//! ## Overview
//!
//! Every read is addressed by a composite [`QueryKey`]: a base key naming the
//! resource family plus, when the caller passes filter/sort/pagination
//! parameters, one canonical serialized-parameter token. Equal parameter sets
//! always produce equal keys, whatever order they were built in.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`query`] | Parameter mappings, canonical serialization and key building |
//! | [`cache`] | Explicit response cache with pluggable backends |
//! | [`transport`] | Request/response seam and the HTTP fetcher |
//! | [`client`] | Cache-through [`QueryClient`] |
//! | [`hub`] | Pitch Hub resource keys, paths and the [`PitchHub`] facade |
//! | [`config`] | YAML + environment configuration |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pitch_hub::{HubConfig, PitchHub, QueryClient, QueryParams, Resource};
//!
//! #[tokio::main]
//! async fn main() -> pitch_hub::Result<()> {
//!     let config = HubConfig::from_path("pitch-hub.yaml")?.with_env_overrides()?;
//!     let hub = PitchHub::new(QueryClient::builder().config(config).build()?);
//!
//!     let params = QueryParams::new().with("sort", "recent").with("page", 1);
//!     let docs: serde_json::Value = hub.list(Resource::Documents, "p-42", Some(params)).await?;
//!     println!("{docs}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod hub;
pub mod query;
pub mod transport;

// Re-export main types for convenience
pub use cache::{CacheConfig, QueryCache};
pub use client::{QueryClient, QueryClientBuilder, QueryRequest};
pub use config::HubConfig;
pub use hub::{PitchHub, Resource};
pub use query::{build_key, serialize_params, ParamValue, QueryKey, QueryParams};
pub use transport::{Fetcher, HttpFetcher};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
