//! 查询键模块：把可选参数映射稳定地序列化为缓存键片段。
//!
//! # Query Key Module
//!
//! Builds deterministic cache keys from a base key and an optional parameter
//! mapping.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ParamValue`] | Scalar parameter value (string, number, bool, null) |
//! | [`QueryParams`] | Insertion-ordered parameter mapping |
//! | [`QueryKey`] | Ordered token sequence used as the cache address |
//! | [`serialize_params`] | Canonical, order-independent fragment for a mapping |
//! | [`build_key`] | Base key plus the fragment, when there is one |
//!
//! ## Example
//!
//! ```rust
//! use pitch_hub::query::{build_key, serialize_params, QueryParams};
//!
//! let params = QueryParams::new().with("b", 2).with("a", 1).with("q", None::<&str>);
//! assert_eq!(
//!     serialize_params(Some(&params)).unwrap().as_deref(),
//!     Some(r#"{"a":1,"b":2}"#)
//! );
//!
//! let key = build_key(["proposals", "list"], Some(&params)).unwrap();
//! assert_eq!(key.len(), 3);
//! ```
//!
//! Null entries count as absent. A mapping with nothing present produces no
//! fragment, so its composite key equals the base key.

mod key;
mod params;
mod value;

pub use key::{build_key, serialize_params, QueryKey};
pub use params::QueryParams;
pub use value::ParamValue;
