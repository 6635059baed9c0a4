//! Cache-through query client.
//!
//! Keep the public surface small: build a [`QueryClient`] once, describe each
//! read as a [`QueryRequest`], and let the client decide between the cache and
//! the API.

pub mod builder;
pub mod core;

pub use builder::QueryClientBuilder;
pub use core::{QueryClient, QueryRequest};
