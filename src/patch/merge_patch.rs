//! JSON Merge Patch (RFC 7396) engine.

use serde_json::Value;

use crate::errors::{NetguardError, PatchKind, Result};

fn invalid(reason: impl Into<String>) -> NetguardError {
    NetguardError::InvalidPatch {
        kind: PatchKind::Merge,
        reason: reason.into(),
    }
}

/// Applies an RFC 7396 merge patch to `doc`.
///
/// For each key in the patch: `null` deletes the key in the target; an object
/// value merges recursively iff the corresponding target value is also an
/// object, else replaces; every other value replaces. Arrays always replace
/// wholesale.
pub fn apply_merge_patch(doc: &Value, patch: &[u8]) -> Result<Value> {
    let patch = parse_merge_patch(patch)?;
    Ok(merge_value(doc, &patch))
}

/// Validates an RFC 7396 merge patch without applying it.
pub fn validate_merge_patch(patch: &[u8]) -> Result<()> {
    parse_merge_patch(patch).map(|_| ())
}

fn parse_merge_patch(patch: &[u8]) -> Result<Value> {
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

/// Recursive merge of one patch node into one target node.
pub(crate) fn merge_value(target: &Value, patch: &Value) -> Value {
    let Value::Object(patch_map) = patch else {
        return patch.clone();
    };
    let mut result = match target {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    for (key, patch_value) in patch_map {
        match patch_value {
            Value::Null => {
                result.remove(key);
            }
            _ => {
                let merged = match result.get(key) {
                    Some(existing) => merge_value(existing, patch_value),
                    None => merge_value(&Value::Null, patch_value),
                };
                result.insert(key.clone(), merged);
            }
        }
    }
    Value::Object(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity() {
        let doc = json!({"spec": {"description": "d1", "ports": [1, 2]}});
        assert_eq!(apply_merge_patch(&doc, b"{}").unwrap(), doc);
    }

    #[test]
    fn test_null_deletes_key() {
        let doc = json!({"a": 1, "b": 2});
        assert_eq!(
            apply_merge_patch(&doc, br#"{"a": null}"#).unwrap(),
            json!({"b": 2})
        );
        // deleting a missing key is a no-op
        assert_eq!(
            apply_merge_patch(&doc, br#"{"c": null}"#).unwrap(),
            json!({"a": 1, "b": 2})
        );
    }

    #[test]
    fn test_recursive_object_merge() {
        let doc = json!({"spec": {"description": "d1", "trace": true}});
        let patched = apply_merge_patch(&doc, br#"{"spec": {"description": "d2"}}"#).unwrap();
        assert_eq!(patched, json!({"spec": {"description": "d2", "trace": true}}));
    }

    #[test]
    fn test_object_replaces_scalar() {
        let doc = json!({"spec": "scalar"});
        let patched = apply_merge_patch(&doc, br#"{"spec": {"a": 1}}"#).unwrap();
        assert_eq!(patched, json!({"spec": {"a": 1}}));
    }

    #[test]
    fn test_arrays_replace_wholesale() {
        let doc = json!({"ports": [1, 2, 3]});
        let patched = apply_merge_patch(&doc, br#"{"ports": [9]}"#).unwrap();
        assert_eq!(patched, json!({"ports": [9]}));
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(validate_merge_patch(b"[]").is_err());
        assert!(validate_merge_patch(b"3").is_err());
        assert!(validate_merge_patch(b"").is_err());
        assert!(validate_merge_patch(b"not json").is_err());
        assert!(validate_merge_patch(b"{}").is_ok());
    }
}
