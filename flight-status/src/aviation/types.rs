//! Request parameter and response types shared by the transport layer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Raw upstream JSON document, shared between the cache and its callers.
///
/// A cache hit hands out another reference to the same allocation, so
/// `Arc::ptr_eq` tells a memoized result apart from a fresh fetch.
pub type RawResponse = Arc<Value>;

/// Query parameters for an upstream call.
///
/// A `BTreeMap` keeps names sorted, so iteration order (and therefore the
/// canonical serialization) never depends on insertion order.
pub type Params = BTreeMap<String, ParamValue>;

/// A primitive query parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Int(i64),
}

impl ParamValue {
    /// JSON form used in the canonical cache-key serialization.
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Text(s) => Value::String(s.clone()),
            ParamValue::Int(n) => Value::from(*n),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(i64::from(n))
    }
}
