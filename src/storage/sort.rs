//! Deterministic list ordering.
//!
//! Lists come back from the backend in (namespace, name) order; when the
//! caller asks for a sortBy path, objects are re-ordered by the extracted
//! field with a type-aware comparator. Objects whose path resolves to
//! nothing compare as missing and keep their relative order at the end.

use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// The comparison key extracted from one object.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Time(i64),
    Text(String),
    Missing,
}

/// Sorts objects by the dotted `sort_by` path. A stable sort: ties and
/// missing values keep the backend's (namespace, name) order.
pub fn sort_objects<K: Serialize>(items: &mut Vec<K>, sort_by: &str) {
    let mut decorated: Vec<(SortKey, K)> = items
        .drain(..)
        .map(|item| {
            let key = serde_json::to_value(&item)
                .ok()
                .map(|value| extract_key(&value, sort_by))
                .unwrap_or(SortKey::Missing);
            (key, item)
        })
        .collect();
    decorated.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    items.extend(decorated.into_iter().map(|(_, item)| item));
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortKey::Time(x), SortKey::Time(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        // mixed types: compare their textual forms, lower-cased
        _ => text_of(a).cmp(&text_of(b)),
    }
}

fn text_of(key: &SortKey) -> String {
    match key {
        SortKey::Number(n) => n.to_string(),
        SortKey::Time(t) => t.to_string(),
        SortKey::Text(s) => s.clone(),
        SortKey::Missing => String::new(),
    }
}

/// Resolves the dotted path against the object. Paths that do not start at
/// a top-level key fall back to the metadata/spec/status shortcuts.
fn extract_key(value: &Value, path: &str) -> SortKey {
    if let Some(found) = resolve_path(value, path) {
        return classify(found);
    }
    for prefix in ["metadata", "spec", "status"] {
        if let Some(section) = value.get(prefix) {
            if let Some(found) = resolve_path(section, path) {
                return classify(found);
            }
        }
    }
    SortKey::Missing
}

fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn classify(value: &Value) -> SortKey {
    match value {
        Value::Number(n) => n.as_f64().map(SortKey::Number).unwrap_or(SortKey::Missing),
        Value::String(s) => {
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                SortKey::Time(ts.timestamp_millis())
            } else {
                SortKey::Text(s.to_lowercase())
            }
        }
        Value::Bool(b) => SortKey::Text(b.to_string()),
        Value::Null => SortKey::Missing,
        _ => SortKey::Missing,
    }
}
