//! Whitespace repair for browsing exports
//!
//! Export tooling sometimes writes keys and values with stray whitespace
//! (`"date "` instead of `"date"`). [`normalize`] strips it everywhere;
//! [`needs_repair`] decides whether a document needs that treatment.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Recursively strip whitespace from every object key and string value
///
/// Keys that are empty after stripping are dropped. Keys that collide after
/// stripping keep the last value. Numbers, booleans and null are unchanged.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut cleaned = Map::with_capacity(map.len());
            for (key, item) in map {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                cleaned.insert(key.to_string(), normalize(item));
            }
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::String(text) => Value::String(text.trim().to_string()),
        other => other.clone(),
    }
}

/// Every object key anywhere in the document
pub fn collect_keys(value: &Value) -> BTreeSet<&str> {
    let mut keys = BTreeSet::new();
    collect_into(value, &mut keys);
    keys
}

fn collect_into<'a>(value: &'a Value, keys: &mut BTreeSet<&'a str>) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                keys.insert(key.as_str());
                collect_into(item, keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, keys);
            }
        }
        _ => {}
    }
}

/// True when any key has leading or trailing whitespace
///
/// Only keys are inspected; whitespace in values alone does not trigger a repair.
pub fn needs_repair(value: &Value) -> bool {
    collect_keys(value)
        .iter()
        .any(|key| key.trim().len() != key.len())
}
