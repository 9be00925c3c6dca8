//! JSON Patch (RFC 6902) engine.
//!
//! Operates on generic JSON trees; typed objects are reconstructed by the
//! caller through the converter round-trip.

use serde_json::Value;

use crate::errors::{NetguardError, PatchKind, Result};

/// One RFC 6902 operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOperation {
    pub op: OpKind,
    pub path: String,
    pub from: Option<String>,
    pub value: Option<Value>,
}

/// The RFC 6902 operation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

fn invalid(reason: impl Into<String>) -> NetguardError {
    NetguardError::InvalidPatch {
        kind: PatchKind::Json,
        reason: reason.into(),
    }
}

/// Applies a JSON patch document to `doc`, returning the patched tree.
pub fn apply_json_patch(doc: &Value, patch: &[u8]) -> Result<Value> {
    let operations = parse_json_patch(patch)?;
    let mut result = doc.clone();
    for (i, op) in operations.iter().enumerate() {
        apply_operation(&mut result, op)
            .map_err(|e| invalid(format!("operation {} ({:?}): {}", i, op.op, e)))?;
    }
    Ok(result)
}

/// Validates a JSON patch document without applying it.
pub fn validate_json_patch(patch: &[u8]) -> Result<()> {
    parse_json_patch(patch).map(|_| ())
}

/// Parses and structurally validates the operation array.
pub fn parse_json_patch(patch: &[u8]) -> Result<Vec<PatchOperation>> {
    if patch.is_empty() {
        return Err(invalid("empty patch document"));
    }
    let parsed: Value =
        serde_json::from_slice(patch).map_err(|e| invalid(format!("invalid JSON: {}", e)))?;
    let array = parsed
        .as_array()
        .ok_or_else(|| invalid("document root must be an array of operations"))?;

    let mut operations = Vec::with_capacity(array.len());
    for (i, entry) in array.iter().enumerate() {
        let obj = entry
            .as_object()
            .ok_or_else(|| invalid(format!("operation {} is not an object", i)))?;
        let op = match obj.get("op").and_then(Value::as_str) {
            Some("add") => OpKind::Add,
            Some("remove") => OpKind::Remove,
            Some("replace") => OpKind::Replace,
            Some("move") => OpKind::Move,
            Some("copy") => OpKind::Copy,
            Some("test") => OpKind::Test,
            Some(other) => return Err(invalid(format!("operation {}: unknown op {:?}", i, other))),
            None => return Err(invalid(format!("operation {}: missing op", i))),
        };
        let path = obj
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid(format!("operation {}: missing path", i)))?
            .to_string();
        if !path.is_empty() && !path.starts_with('/') {
            return Err(invalid(format!(
                "operation {}: path must start with '/': {:?}",
                i, path
            )));
        }
        let from = obj.get("from").and_then(Value::as_str).map(str::to_string);
        if matches!(op, OpKind::Move | OpKind::Copy) && from.is_none() {
            return Err(invalid(format!("operation {}: missing from", i)));
        }
        let value = obj.get("value").cloned();
        if matches!(op, OpKind::Add | OpKind::Replace | OpKind::Test) && value.is_none() {
            return Err(invalid(format!("operation {}: missing value", i)));
        }
        operations.push(PatchOperation {
            op,
            path,
            from,
            value,
        });
    }
    Ok(operations)
}

fn apply_operation(doc: &mut Value, op: &PatchOperation) -> std::result::Result<(), String> {
    let tokens = split_pointer(&op.path)?;
    match op.op {
        OpKind::Add => add(doc, &tokens, op.value.clone().expect("validated")),
        OpKind::Remove => remove(doc, &tokens).map(|_| ()),
        OpKind::Replace => {
            // RFC 6902: the target location must exist
            resolve(doc, &tokens)?;
            remove_or_root(doc, &tokens)?;
            add(doc, &tokens, op.value.clone().expect("validated"))
        }
        OpKind::Move => {
            let from = split_pointer(op.from.as_deref().expect("validated"))?;
            if tokens.len() > from.len() && tokens[..from.len()] == from[..] {
                return Err("cannot move a value into one of its children".to_string());
            }
            let value = remove(doc, &from)?;
            add(doc, &tokens, value)
        }
        OpKind::Copy => {
            let from = split_pointer(op.from.as_deref().expect("validated"))?;
            let value = resolve(doc, &from)?.clone();
            add(doc, &tokens, value)
        }
        OpKind::Test => {
            let current = resolve(doc, &tokens)?;
            let expected = op.value.as_ref().expect("validated");
            if current != expected {
                return Err(format!(
                    "test failed: expected {}, found {}",
                    expected, current
                ));
            }
            Ok(())
        }
    }
}

/// Splits a JSON pointer into unescaped reference tokens.
fn split_pointer(pointer: &str) -> std::result::Result<Vec<String>, String> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(format!("pointer must start with '/': {:?}", pointer));
    }
    Ok(pointer[1..]
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

fn resolve<'a>(doc: &'a Value, tokens: &[String]) -> std::result::Result<&'a Value, String> {
    let mut current = doc;
    for token in tokens {
        current = match current {
            Value::Object(map) => map
                .get(token)
                .ok_or_else(|| format!("path not found: {:?}", token))?,
            Value::Array(items) => {
                let idx = parse_index(token, items.len())?;
                &items[idx]
            }
            _ => return Err(format!("cannot traverse into scalar at {:?}", token)),
        };
    }
    Ok(current)
}

fn parse_index(token: &str, len: usize) -> std::result::Result<usize, String> {
    if token == "-" {
        return Err("index '-' does not reference an existing element".to_string());
    }
    if token.len() > 1 && token.starts_with('0') {
        return Err(format!("invalid array index {:?}", token));
    }
    let idx: usize = token
        .parse()
        .map_err(|_| format!("invalid array index {:?}", token))?;
    if idx >= len {
        return Err(format!("array index {} out of bounds (len {})", idx, len));
    }
    Ok(idx)
}

fn add(doc: &mut Value, tokens: &[String], value: Value) -> std::result::Result<(), String> {
    let Some((last, parents)) = tokens.split_last() else {
        *doc = value;
        return Ok(());
    };
    let parent = resolve_mut(doc, parents)?;
    match parent {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            if last == "-" {
                items.push(value);
            } else {
                if last.len() > 1 && last.starts_with('0') {
                    return Err(format!("invalid array index {:?}", last));
                }
                let idx: usize = last
                    .parse()
                    .map_err(|_| format!("invalid array index {:?}", last))?;
                if idx > items.len() {
                    return Err(format!(
                        "array index {} out of bounds (len {})",
                        idx,
                        items.len()
                    ));
                }
                items.insert(idx, value);
            }
            Ok(())
        }
        _ => Err("add target parent is a scalar".to_string()),
    }
}

fn remove(doc: &mut Value, tokens: &[String]) -> std::result::Result<Value, String> {
    let Some((last, parents)) = tokens.split_last() else {
        return Err("cannot remove the document root".to_string());
    };
    let parent = resolve_mut(doc, parents)?;
    match parent {
        Value::Object(map) => map
            .remove(last)
            .ok_or_else(|| format!("path not found: {:?}", last)),
        Value::Array(items) => {
            let idx = parse_index(last, items.len())?;
            Ok(items.remove(idx))
        }
        _ => Err("remove target parent is a scalar".to_string()),
    }
}

// Replace at the root swaps the whole document; elsewhere it is remove+add.
fn remove_or_root(doc: &mut Value, tokens: &[String]) -> std::result::Result<(), String> {
    if tokens.is_empty() {
        *doc = Value::Null;
        return Ok(());
    }
    remove(doc, tokens).map(|_| ())
}

fn resolve_mut<'a>(
    doc: &'a mut Value,
    tokens: &[String],
) -> std::result::Result<&'a mut Value, String> {
    let mut current = doc;
    for token in tokens {
        current = match current {
            Value::Object(map) => map
                .get_mut(token)
                .ok_or_else(|| format!("path not found: {:?}", token))?,
            Value::Array(items) => {
                let idx = parse_index(token, items.len())?;
                &mut items[idx]
            }
            _ => return Err(format!("cannot traverse into scalar at {:?}", token)),
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_replace_remove() {
        let doc = json!({"spec": {"description": "d1", "ports": [1, 2]}});

        let patched = apply_json_patch(
            &doc,
            br#"[{"op": "add", "path": "/spec/ports/-", "value": 3}]"#,
        )
        .unwrap();
        assert_eq!(patched["spec"]["ports"], json!([1, 2, 3]));

        let patched = apply_json_patch(
            &doc,
            br#"[{"op": "replace", "path": "/spec/description", "value": "d2"}]"#,
        )
        .unwrap();
        assert_eq!(patched["spec"]["description"], "d2");

        let patched =
            apply_json_patch(&doc, br#"[{"op": "remove", "path": "/spec/ports/0"}]"#).unwrap();
        assert_eq!(patched["spec"]["ports"], json!([2]));
    }

    #[test]
    fn test_add_then_remove_restores_document() {
        let doc = json!({"spec": {"ports": [1]}});
        let patched = apply_json_patch(
            &doc,
            br#"[
                {"op": "add", "path": "/spec/trace", "value": true},
                {"op": "remove", "path": "/spec/trace"}
            ]"#,
        )
        .unwrap();
        assert_eq!(patched, doc);
    }

    #[test]
    fn test_move_and_copy() {
        let doc = json!({"a": {"x": 1}, "b": {}});
        let patched = apply_json_patch(
            &doc,
            br#"[{"op": "move", "path": "/b/x", "from": "/a/x"}]"#,
        )
        .unwrap();
        assert_eq!(patched, json!({"a": {}, "b": {"x": 1}}));

        let patched = apply_json_patch(
            &doc,
            br#"[{"op": "copy", "path": "/b/x", "from": "/a/x"}]"#,
        )
        .unwrap();
        assert_eq!(patched, json!({"a": {"x": 1}, "b": {"x": 1}}));
    }

    #[test]
    fn test_move_into_own_child_rejected() {
        let doc = json!({"a": {"x": 1}});
        let err = apply_json_patch(
            &doc,
            br#"[{"op": "move", "path": "/a/x/y", "from": "/a/x"}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("children"));
    }

    #[test]
    fn test_test_op() {
        let doc = json!({"spec": {"description": "d1"}});
        assert!(
            apply_json_patch(
                &doc,
                br#"[{"op": "test", "path": "/spec/description", "value": "d1"}]"#,
            )
            .is_ok()
        );
        assert!(
            apply_json_patch(
                &doc,
                br#"[{"op": "test", "path": "/spec/description", "value": "d2"}]"#,
            )
            .is_err()
        );
    }

    #[test]
    fn test_escaped_pointer_tokens() {
        let doc = json!({"metadata": {"labels": {"a/b": "v", "c~d": "w"}}});
        let patched = apply_json_patch(
            &doc,
            br#"[{"op": "remove", "path": "/metadata/labels/a~1b"}]"#,
        )
        .unwrap();
        assert_eq!(patched["metadata"]["labels"], json!({"c~d": "w"}));
    }

    #[test]
    fn test_malformed_documents_rejected() {
        assert!(validate_json_patch(b"").is_err());
        assert!(validate_json_patch(b"{}").is_err());
        assert!(validate_json_patch(br#"[{"op": "sing", "path": "/a"}]"#).is_err());
        assert!(validate_json_patch(br#"[{"op": "add", "path": "a", "value": 1}]"#).is_err());
        assert!(validate_json_patch(br#"[{"op": "add", "path": "/a"}]"#).is_err());
        assert!(validate_json_patch(br#"[{"op": "move", "path": "/a"}]"#).is_err());
        assert!(validate_json_patch(br#"[{"op": "add", "path": "/a", "value": 1}]"#).is_ok());
    }

    #[test]
    fn test_unresolvable_path() {
        let doc = json!({"a": 1});
        assert!(
            apply_json_patch(&doc, br#"[{"op": "replace", "path": "/b", "value": 2}]"#).is_err()
        );
    }
}
