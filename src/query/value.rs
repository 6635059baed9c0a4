//! Scalar parameter values.

use crate::error::{Error, ErrorContext};
use crate::Result;
use serde::{Serialize, Serializer};

/// Largest magnitude at which every integer is exactly representable as `f64` (2^53).
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// A single query parameter value.
///
/// `Null` marks a value the caller left unset; such entries never reach the
/// serialized fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    /// Unsigned values above `i64::MAX`; kept exact instead of rounding to a float.
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Null,
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Rejects values that have no canonical JSON form (NaN and the infinities).
    pub(crate) fn ensure_canonical(&self, key: &str) -> Result<()> {
        match self {
            ParamValue::Float(f) if !f.is_finite() => Err(Error::validation_with_context(
                format!("parameter '{}' is not a finite number", key),
                ErrorContext::new()
                    .with_field_path(format!("params.{}", key))
                    .with_details(f.to_string())
                    .with_source("query_key"),
            )),
            _ => Ok(()),
        }
    }

    /// Render as a plain string for URL query strings.
    pub fn to_query_string(&self) -> String {
        match self {
            ParamValue::String(s) => s.clone(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Unsigned(u) => u.to_string(),
            ParamValue::Float(f) => match integral(*f) {
                Some(i) => i.to_string(),
                None => f.to_string(),
            },
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Null => String::new(),
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT_INT {
        Some(f as i64)
    } else {
        None
    }
}

// Numbers follow JSON-number semantics: 2.0 and 2 are the same parameter.
impl Serialize for ParamValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ParamValue::String(s) => serializer.serialize_str(s),
            ParamValue::Integer(i) => serializer.serialize_i64(*i),
            ParamValue::Unsigned(u) => serializer.serialize_u64(*u),
            ParamValue::Float(f) => match integral(*f) {
                Some(i) => serializer.serialize_i64(i),
                None if f.is_finite() => serializer.serialize_f64(*f),
                None => Err(serde::ser::Error::custom("non-finite number")),
            },
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
            ParamValue::Null => serializer.serialize_unit(),
        }
    }
}

impl TryFrom<serde_json::Value> for ParamValue {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(ParamValue::Null),
            serde_json::Value::Bool(b) => Ok(ParamValue::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(ParamValue::Integer(i)),
                None => match n.as_u64() {
                    Some(u) => Ok(ParamValue::Unsigned(u)),
                    None => Ok(ParamValue::Float(n.as_f64().unwrap_or(f64::NAN))),
                },
            },
            serde_json::Value::String(s) => Ok(ParamValue::String(s)),
            other => Err(Error::validation_with_context(
                "parameter values must be scalars",
                ErrorContext::new()
                    .with_details(format!("got {}", other))
                    .with_source("query_key"),
            )),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::String(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::String(v.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v as f64)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(v: $t) -> Self {
                ParamValue::Integer(v as i64)
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        i64::try_from(v)
            .map(ParamValue::Integer)
            .unwrap_or(ParamValue::Unsigned(v))
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::from(v as u64)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ParamValue::Null)
    }
}
