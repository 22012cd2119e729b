//! Merge combinators
//!
//! Every dedup site (messages, fields, nested messages, imports, methods,
//! components, tags) goes through [`merge_by_key`] or [`push_unique`]:
//! existing entries win, new keys are appended in encounter order.
//! Annotation payloads are applied with [`overlay`].

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::hash::Hash;

/// Append the items of `incoming` whose key is not yet present in `existing`
pub fn merge_by_key<T, K, F>(existing: &mut Vec<T>, incoming: Vec<T>, key: F)
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: HashSet<K> = existing.iter().map(&key).collect();
    for item in incoming {
        if seen.insert(key(&item)) {
            existing.push(item);
        }
    }
}

/// Push `item` unless an entry with the same key exists
///
/// Returns `true` if the item was added.
pub fn push_unique<T, K, F>(existing: &mut Vec<T>, item: T, key: F) -> bool
where
    K: Eq,
    F: Fn(&T) -> K,
{
    let k = key(&item);
    if existing.iter().any(|e| key(e) == k) {
        return false;
    }
    existing.push(item);
    true
}

/// Overlay an annotation payload onto a derived value
///
/// `base` is viewed as JSON. Object members present in `patch` replace the
/// ones in `base`, recursively; members only in `base` are kept. Null and
/// empty values in `patch` never erase derived values. Fails when the
/// merged JSON no longer fits `T`.
pub fn overlay<T>(base: &T, patch: Value) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(base)?;
    overlay_value(&mut merged, patch);
    Ok(serde_json::from_value(merged)?)
}

/// JSON-level form of [`overlay`]
pub fn overlay_value(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                if is_blank(&value) {
                    continue;
                }
                match base_map.get_mut(&key) {
                    Some(slot) => overlay_value(slot, value),
                    None => {
                        base_map.insert(key, value);
                    },
                }
            }
        },
        (slot, value) => {
            if !is_blank(&value) {
                *slot = value;
            }
        },
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
