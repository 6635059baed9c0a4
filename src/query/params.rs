//! Parameter mappings supplied by call sites.

use super::value::ParamValue;
use crate::error::{Error, ErrorContext};
use crate::Result;

/// Insertion-ordered mapping of parameter names to scalar values.
///
/// Re-inserting a key replaces its value in place. Order is kept only so
/// callers can inspect what they built; serialization sorts by key.
/// Equality follows the same rule: null entries and order are ignored.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries whose value is not null, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.iter().filter(|(_, v)| !v.is_null())
    }

    /// Present entries sorted by key (byte-wise, independent of locale).
    pub fn sorted_present(&self) -> Vec<(&str, &ParamValue)> {
        let mut present: Vec<_> = self.present().collect();
        present.sort_by(|a, b| a.0.cmp(b.0));
        present
    }
}

impl PartialEq for QueryParams {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_present() == other.sorted_present()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl TryFrom<serde_json::Value> for QueryParams {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(Error::validation_with_context(
                "query parameters must be a JSON object",
                ErrorContext::new().with_source("query_key"),
            ));
        };
        let mut params = QueryParams::new();
        for (k, v) in map {
            let value = ParamValue::try_from(v).map_err(|e| match e {
                Error::Validation { message, context } => Error::Validation {
                    message,
                    context: context.with_field_path(format!("params.{}", k)),
                },
                other => other,
            })?;
            params.insert(k, value);
        }
        Ok(params)
    }
}
