//! Strategic Merge Patch engine.
//!
//! Merge behavior is driven by per-kind patch metadata (merge keys and list
//! strategies). A kind without any strategic metadata falls back to plain
//! RFC 7396 merge-patch semantics, and directives are honored only when
//! metadata is present.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::merge_patch;
use crate::errors::{NetguardError, PatchKind, Result};

const PATCH_DIRECTIVE: &str = "$patch";
const RETAIN_KEYS_DIRECTIVE: &str = "$retainKeys";
const DELETE_FROM_PRIMITIVE_LIST_PREFIX: &str = "$deleteFromPrimitiveList/";

fn invalid(reason: impl Into<String>) -> NetguardError {
    NetguardError::InvalidPatch {
        kind: PatchKind::StrategicMerge,
        reason: reason.into(),
    }
}

/// How a list field merges under a strategic patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStrategy {
    /// Elements merge on the named key field.
    MergeOnKey(String),
    /// The whole list is replaced.
    Replace,
}

/// Static strategic-merge metadata for one kind: list strategies keyed by the
/// dotted field path of the list (indices are not part of the path).
#[derive(Debug, Clone, Default)]
pub struct StrategicMetadata {
    lists: BTreeMap<String, ListStrategy>,
}

impl StrategicMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a merge key for the list at `path`.
    pub fn with_merge_key(mut self, path: &str, key: &str) -> Self {
        self.lists
            .insert(path.to_string(), ListStrategy::MergeOnKey(key.to_string()));
        self
    }

    /// Declares the replace strategy for the list at `path`.
    pub fn with_replace(mut self, path: &str) -> Self {
        self.lists.insert(path.to_string(), ListStrategy::Replace);
        self
    }

    /// True when the kind declares no strategies at all.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    fn list_strategy(&self, path: &str) -> Option<&ListStrategy> {
        self.lists.get(path)
    }
}

/// Applies a strategic merge patch to `doc`.
///
/// Without metadata (None or empty) this is exactly merge-patch.
pub fn apply_strategic_merge_patch(
    doc: &Value,
    patch: &[u8],
    metadata: Option<&StrategicMetadata>,
) -> Result<Value> {
    let patch = parse_strategic_merge_patch(patch)?;
    match metadata {
        Some(meta) if !meta.is_empty() => strategic_merge(doc, &patch, meta, ""),
        _ => Ok(merge_patch::merge_value(doc, &patch)),
    }
}

/// Validates a strategic merge patch without applying it.
pub fn validate_strategic_merge_patch(patch: &[u8]) -> Result<()> {
    parse_strategic_merge_patch(patch).map(|_| ())
}

fn parse_strategic_merge_patch(patch: &[u8]) -> Result<Value> {
    if patch.is_empty() {
        return Err(invalid("empty patch document"));
    }
    let parsed: Value =
        serde_json::from_slice(patch).map_err(|e| invalid(format!("invalid JSON: {}", e)))?;
    if !parsed.is_object() {
        return Err(invalid("document root must be a JSON object"));
    }
    Ok(parsed)
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn strategic_merge(
    target: &Value,
    patch: &Value,
    meta: &StrategicMetadata,
    path: &str,
) -> Result<Value> {
    let Value::Object(patch_map) = patch else {
        return Ok(patch.clone());
    };

    // $patch: replace swaps in the patch body wholesale
    if patch_map.get(PATCH_DIRECTIVE).and_then(Value::as_str) == Some("replace") {
        return Ok(strip_directives(patch));
    }

    let mut result = match target {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for (key, patch_value) in patch_map {
        if key == PATCH_DIRECTIVE || key == RETAIN_KEYS_DIRECTIVE {
            continue;
        }
        if let Some(list_name) = key.strip_prefix(DELETE_FROM_PRIMITIVE_LIST_PREFIX) {
            delete_from_primitive_list(&mut result, list_name, patch_value)?;
            continue;
        }
        match patch_value {
            Value::Null => {
                result.remove(key);
            }
            Value::Array(patch_items) => {
                let merged = match (
                    meta.list_strategy(&child_path(path, key)),
                    result.get(key).and_then(Value::as_array),
                ) {
                    (Some(ListStrategy::MergeOnKey(merge_key)), Some(existing)) => {
                        merge_list_on_key(
                            existing,
                            patch_items,
                            merge_key,
                            meta,
                            &child_path(path, key),
                        )?
                    }
                    (Some(ListStrategy::MergeOnKey(_)), None) => {
                        Value::Array(patch_items.iter().map(strip_directives).collect())
                    }
                    _ => Value::Array(patch_items.iter().map(strip_directives).collect()),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(_) => {
                let existing = result.get(key).cloned().unwrap_or(Value::Null);
                let merged = strategic_merge(&existing, patch_value, meta, &child_path(path, key))?;
                result.insert(key.clone(), merged);
            }
            _ => {
                result.insert(key.clone(), patch_value.clone());
            }
        }
    }

    // $retainKeys restricts the merged key set
    if let Some(retain) = patch_map.get(RETAIN_KEYS_DIRECTIVE) {
        let retain = retain
            .as_array()
            .ok_or_else(|| invalid("$retainKeys must be a list of key names"))?;
        let keep: Vec<&str> = retain.iter().filter_map(Value::as_str).collect();
        result.retain(|k, _| keep.contains(&k.as_str()));
    }

    Ok(Value::Object(result))
}

fn merge_list_on_key(
    existing: &[Value],
    patch_items: &[Value],
    merge_key: &str,
    meta: &StrategicMetadata,
    path: &str,
) -> Result<Value> {
    let mut result: Vec<Value> = existing.to_vec();
    for item in patch_items {
        let Value::Object(item_map) = item else {
            return Err(invalid(format!(
                "list at {:?} merges on key {:?} but contains a non-object element",
                path, merge_key
            )));
        };
        let Some(key_value) = item_map.get(merge_key) else {
            return Err(invalid(format!(
                "element of list at {:?} is missing merge key {:?}",
                path, merge_key
            )));
        };
        let position = result.iter().position(|candidate| {
            candidate
                .as_object()
                .and_then(|m| m.get(merge_key))
                .is_some_and(|v| v == key_value)
        });
        if item_map.get(PATCH_DIRECTIVE).and_then(Value::as_str) == Some("delete") {
            if let Some(idx) = position {
                result.remove(idx);
            }
            continue;
        }
        match position {
            Some(idx) => {
                let merged = strategic_merge(&result[idx], item, meta, path)?;
                result[idx] = merged;
            }
            None => result.push(strip_directives(item)),
        }
    }
    Ok(Value::Array(result))
}

fn delete_from_primitive_list(
    result: &mut Map<String, Value>,
    list_name: &str,
    to_delete: &Value,
) -> Result<()> {
    let deletions = to_delete
        .as_array()
        .ok_or_else(|| invalid("$deleteFromPrimitiveList value must be a list"))?;
    if let Some(Value::Array(items)) = result.get_mut(list_name) {
        items.retain(|item| !deletions.contains(item));
    }
    Ok(())
}

fn strip_directives(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| {
                    k.as_str() != PATCH_DIRECTIVE
                        && k.as_str() != RETAIN_KEYS_DIRECTIVE
                        && !k.starts_with(DELETE_FROM_PRIMITIVE_LIST_PREFIX)
                })
                .map(|(k, v)| (k.clone(), strip_directives(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_directives).collect()),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ports_meta() -> StrategicMetadata {
        StrategicMetadata::new().with_merge_key("spec.ingressPorts", "port")
    }

    #[test]
    fn test_without_metadata_behaves_like_merge_patch() {
        let doc = json!({"spec": {"ports": [1, 2], "description": "d1"}});
        let patch = br#"{"spec": {"ports": [9]}}"#;
        let strategic = apply_strategic_merge_patch(&doc, patch, None).unwrap();
        let merged = merge_patch::apply_merge_patch(&doc, patch).unwrap();
        assert_eq!(strategic, merged);

        let empty = StrategicMetadata::new();
        let strategic = apply_strategic_merge_patch(&doc, patch, Some(&empty)).unwrap();
        assert_eq!(strategic, merged);
    }

    #[test]
    fn test_list_merges_on_declared_key() {
        let doc = json!({"spec": {"ingressPorts": [
            {"port": "80", "protocol": "TCP"},
            {"port": "443", "protocol": "TCP"}
        ]}});
        let patch = br#"{"spec": {"ingressPorts": [
            {"port": "80", "description": "http"},
            {"port": "8080", "protocol": "TCP"}
        ]}}"#;
        let patched = apply_strategic_merge_patch(&doc, patch, Some(&ports_meta())).unwrap();
        assert_eq!(
            patched["spec"]["ingressPorts"],
            json!([
                {"port": "80", "protocol": "TCP", "description": "http"},
                {"port": "443", "protocol": "TCP"},
                {"port": "8080", "protocol": "TCP"}
            ])
        );
    }

    #[test]
    fn test_delete_directive_removes_element() {
        let doc = json!({"spec": {"ingressPorts": [
            {"port": "80"},
            {"port": "443"}
        ]}});
        let patch = br#"{"spec": {"ingressPorts": [
            {"port": "80", "$patch": "delete"}
        ]}}"#;
        let patched = apply_strategic_merge_patch(&doc, patch, Some(&ports_meta())).unwrap();
        assert_eq!(patched["spec"]["ingressPorts"], json!([{"port": "443"}]));
    }

    #[test]
    fn test_replace_directive() {
        let doc = json!({"spec": {"a": 1, "b": 2}});
        let patch = br#"{"spec": {"$patch": "replace", "c": 3}}"#;
        let meta = StrategicMetadata::new().with_merge_key("unused", "k");
        let patched = apply_strategic_merge_patch(&doc, patch, Some(&meta)).unwrap();
        assert_eq!(patched["spec"], json!({"c": 3}));
    }

    #[test]
    fn test_retain_keys() {
        let doc = json!({"spec": {"a": 1, "b": 2, "c": 3}});
        let patch = br#"{"spec": {"$retainKeys": ["a", "b"], "b": 9}}"#;
        let meta = StrategicMetadata::new().with_merge_key("unused", "k");
        let patched = apply_strategic_merge_patch(&doc, patch, Some(&meta)).unwrap();
        assert_eq!(patched["spec"], json!({"a": 1, "b": 9}));
    }

    #[test]
    fn test_delete_from_primitive_list() {
        let doc = json!({"spec": {"finalizers": ["a", "b", "c"]}});
        let patch = br#"{"spec": {"$deleteFromPrimitiveList/finalizers": ["b"]}}"#;
        let meta = StrategicMetadata::new().with_merge_key("unused", "k");
        let patched = apply_strategic_merge_patch(&doc, patch, Some(&meta)).unwrap();
        assert_eq!(patched["spec"]["finalizers"], json!(["a", "c"]));
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(validate_strategic_merge_patch(b"[]").is_err());
        assert!(validate_strategic_merge_patch(b"").is_err());
        assert!(validate_strategic_merge_patch(b"{}").is_ok());
    }
}
