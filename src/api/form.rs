//! Form encoding for request parameters
//!
//! The API takes `application/x-www-form-urlencoded` bodies and query strings
//! with bracketed keys for nested values:
//!
//! - `metadata[order_id]=6735`
//! - `tax_rates[0]=txr_1&tax_rates[1]=txr_2`
//! - `created[gte]=1577836800`
//!
//! An empty string or an empty array encodes as `key=`, which the server reads
//! as "clear this value". Absent (`null`) values are omitted entirely.

use super::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Ordered list of encoded key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replace every value for `key` with a single one.
    pub fn set(&mut self, key: &str, value: &str) {
        self.remove(key);
        self.0.push((key.to_string(), value.to_string()));
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Percent-encode into `a=1&b[c]=2` form. Brackets are left readable.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", encode_key(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn encode_key(key: &str) -> String {
    urlencoding::encode(key)
        .replace("%5B", "[")
        .replace("%5D", "]")
}

/// Flatten a serializable params object into form pairs.
pub fn to_form<P: Serialize + ?Sized>(params: &P) -> Result<FormParams> {
    let value = serde_json::to_value(params)
        .map_err(|e| Error::invalid_request(format!("failed to serialize params: {}", e)))?;

    let mut pairs = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, value) in &map {
                flatten(key, value, &mut pairs);
            }
        },
        Value::Null => {},
        other => {
            return Err(Error::invalid_request(format!(
                "params must serialize to an object, got {}",
                other
            )))
        },
    }

    Ok(FormParams(pairs))
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {},
        Value::Bool(b) => out.push((prefix.to_string(), b.to_string())),
        Value::Number(n) => out.push((prefix.to_string(), n.to_string())),
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        Value::Array(items) if items.is_empty() => out.push((prefix.to_string(), String::new())),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                flatten(&format!("{}[{}]", prefix, idx), item, out);
            }
        },
        Value::Object(map) => {
            for (key, item) in map {
                flatten(&format!("{}[{}]", prefix, key), item, out);
            }
        },
    }
}
