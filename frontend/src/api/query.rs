//! Query-string encoding for HRIS requests.
//!
//! Arrays use repeated keys (`ids=1&ids=2`) rather than indexed brackets, nested
//! objects use bracketed key paths (`page[number]=1`), and `null` entries are
//! dropped. Keys are emitted in sorted order so the same mapping always yields
//! the same string.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::{Map, Value};

use super::types::ApiError;

/// Everything except the RFC 3986 unreserved characters.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Converts a serializable value into the JSON object used as a query mapping.
pub fn to_query_map<Q: Serialize + ?Sized>(query: &Q) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(query)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ApiError::invalid_request(format!(
            "query parameters must be an object, got {}",
            other
        ))),
    }
}

pub fn encode_query(query: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in sorted(query) {
        flatten(key, value, &mut pairs);
    }
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends an encoded query to `url`, respecting an existing `?`.
pub fn append_query(url: &str, query: &Map<String, Value>) -> String {
    let encoded = encode_query(query);
    if encoded.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, encoded)
}

fn sorted(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

fn flatten(key: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((key.to_string(), flag.to_string())),
        Value::Number(number) => pairs.push((key.to_string(), number.to_string())),
        Value::String(text) => pairs.push((key.to_string(), text.clone())),
        Value::Array(items) => {
            for item in items {
                flatten(key, item, pairs);
            }
        }
        Value::Object(fields) => {
            for (child, nested) in sorted(fields) {
                flatten(&format!("{}[{}]", key, child), nested, pairs);
            }
        }
    }
}
