//! FieldsV1 trie operations.
//!
//! Ownership is serialized as a nested JSON object where every owned path
//! materializes as a chain of `{ "segment": {…} }` down to an empty object at
//! the leaf. Conflict math flattens the trie to a set of dotted leaf paths.
//! Keys are compared as-is; no case-folding.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Builds the field tree implied by an apply patch: every nested mapping
/// becomes a node; primitives and arrays become leaf markers.
pub fn fields_from_patch_shape(patch: &Value) -> Value {
    match patch {
        Value::Object(map) => {
            let mut node = Map::new();
            for (key, value) in map {
                node.insert(key.clone(), fields_from_patch_shape(value));
            }
            Value::Object(node)
        }
        _ => Value::Object(Map::new()),
    }
}

/// Builds the field tree an Update operation owns: the object's top-level
/// keys, refined to the tracked metadata subfields labels and annotations.
pub fn fields_from_object(obj: &Value) -> Value {
    let mut node = Map::new();
    if let Value::Object(map) = obj {
        for (key, value) in map {
            if key == "metadata" {
                let mut meta_node = Map::new();
                if let Value::Object(meta_map) = value {
                    for tracked in ["labels", "annotations"] {
                        if meta_map.contains_key(tracked) {
                            meta_node.insert(tracked.to_string(), Value::Object(Map::new()));
                        }
                    }
                }
                node.insert(key.clone(), Value::Object(meta_node));
            } else {
                node.insert(key.clone(), Value::Object(Map::new()));
            }
        }
    }
    Value::Object(node)
}

/// Flattens a field tree to its set of dotted leaf paths.
pub fn flatten(fields: &Value) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    collect_paths(fields, String::new(), &mut paths);
    paths
}

fn collect_paths(node: &Value, prefix: String, out: &mut BTreeSet<String>) {
    let Value::Object(map) = node else {
        return;
    };
    if map.is_empty() {
        if !prefix.is_empty() {
            out.insert(prefix);
        }
        return;
    }
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        collect_paths(value, path, out);
    }
}

/// Rebuilds a field tree from a set of dotted leaf paths.
pub fn trie_from_paths(paths: &BTreeSet<String>) -> Value {
    let mut root = Map::new();
    for path in paths {
        let mut node = &mut root;
        for segment in path.split('.') {
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match entry {
                Value::Object(map) => map,
                _ => unreachable!("trie nodes are always objects"),
            };
        }
    }
    Value::Object(root)
}

/// Removes the given leaf paths from a field tree and prunes empty
/// intermediate nodes. Returns true when anything remains.
pub fn remove_paths(fields: &mut Value, paths: &BTreeSet<String>) -> bool {
    let owned = flatten(fields);
    let remaining: BTreeSet<String> = owned.difference(paths).cloned().collect();
    *fields = trie_from_paths(&remaining);
    !remaining.is_empty()
}

/// The leaf paths present in both sets.
pub fn intersection(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.intersection(b).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_from_patch_shape() {
        let patch = json!({
            "spec": {
                "description": "d1",
                "ingressPorts": [{"protocol": "TCP", "port": "8080"}]
            }
        });
        assert_eq!(
            fields_from_patch_shape(&patch),
            json!({"spec": {"description": {}, "ingressPorts": {}}})
        );
    }

    #[test]
    fn test_fields_from_object_tracks_metadata_subfields() {
        let obj = json!({
            "apiVersion": "netguard.sgroups.io/v1beta1",
            "metadata": {"name": "api", "labels": {"app": "web"}},
            "spec": {"description": "d1"}
        });
        assert_eq!(
            fields_from_object(&obj),
            json!({
                "apiVersion": {},
                "metadata": {"labels": {}},
                "spec": {}
            })
        );
    }

    #[test]
    fn test_flatten_and_rebuild() {
        let fields = json!({"spec": {"description": {}, "ingressPorts": {}}, "kind": {}});
        let paths = flatten(&fields);
        assert_eq!(
            paths.iter().cloned().collect::<Vec<_>>(),
            vec!["kind", "spec.description", "spec.ingressPorts"]
        );
        assert_eq!(trie_from_paths(&paths), fields);
    }

    #[test]
    fn test_remove_paths_prunes_empty_nodes() {
        let mut fields = json!({"spec": {"description": {}, "ingressPorts": {}}});
        let mut remove = BTreeSet::new();
        remove.insert("spec.description".to_string());
        assert!(remove_paths(&mut fields, &remove));
        assert_eq!(fields, json!({"spec": {"ingressPorts": {}}}));

        remove.insert("spec.ingressPorts".to_string());
        assert!(!remove_paths(&mut fields, &remove));
        assert_eq!(fields, json!({}));
    }
}
