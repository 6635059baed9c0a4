//! Composite key construction.

use super::params::QueryParams;
use super::value::ParamValue;
use crate::Result;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Ordered sequence of opaque tokens addressing one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.0.push(token.into());
    }

    /// Returns a new key extended by one token.
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut key = self.clone();
        key.push(token);
        key
    }

    /// Returns a new key with `token` placed in front.
    pub fn prefixed(&self, token: impl Into<String>) -> Self {
        let mut tokens = Vec::with_capacity(self.0.len() + 1);
        tokens.push(token.into());
        tokens.extend(self.0.iter().cloned());
        Self(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Token-wise prefix test; the empty key is a prefix of every key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Appends the serialized params, if any, as the final token.
    pub fn with_params(&self, params: Option<&QueryParams>) -> Result<QueryKey> {
        let mut key = self.clone();
        if let Some(fragment) = serialize_params(params)? {
            key.push(fragment);
        }
        Ok(key)
    }

    /// SHA-256 of the JSON-array form, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_string().as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl From<Vec<String>> for QueryKey {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl From<&[&str]> for QueryKey {
    fn from(tokens: &[&str]) -> Self {
        Self::new(tokens.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(tokens: [&str; N]) -> Self {
        Self::new(tokens)
    }
}

struct SortedParams<'a>(Vec<(&'a str, &'a ParamValue)>);

impl Serialize for SortedParams<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Canonical string form of a parameter mapping.
///
/// Null entries are dropped and the rest are emitted as a compact JSON object
/// in byte-wise key order, so equal mappings always give equal strings no
/// matter how they were built. Returns `Ok(None)` when nothing is left.
///
/// # Errors
///
/// `Error::Validation` if a value has no canonical form (NaN or infinite floats).
pub fn serialize_params(params: Option<&QueryParams>) -> Result<Option<String>> {
    let Some(params) = params else {
        return Ok(None);
    };
    let present = params.sorted_present();
    if present.is_empty() {
        return Ok(None);
    }
    for (k, v) in &present {
        v.ensure_canonical(k)?;
    }
    Ok(Some(serde_json::to_string(&SortedParams(present))?))
}

/// Base key plus the serialized params as a final token, when there are any.
pub fn build_key<I, S>(base: I, params: Option<&QueryParams>) -> Result<QueryKey>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    QueryKey::new(base).with_params(params)
}
