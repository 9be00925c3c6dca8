//! Managed-fields state machine.
//!
//! Maintains the ordered ManagedFieldsEntry sequence on object metadata:
//! Update and Apply transitions, conflict detection between competing
//! managers, forced ownership reassignment, and the preservation merge used
//! when objects round-trip through converters.

use serde_json::Value;
use std::collections::BTreeSet;

use super::fieldpath;
use crate::common::meta::{FIELDS_TYPE_V1, ManagedFieldsEntry, ObjectMeta, managed_fields_operation};
use crate::common::time::Timestamp;
use crate::errors::{FieldConflict, NetguardError, PatchKind, Result};
use crate::patch::{StrategicMetadata, apply_strategic_merge_patch};

/// Records an Update operation: the manager owns the object's top-level keys
/// plus the tracked metadata subfields, under the (manager, Update, "") key.
pub fn track_update(meta: &mut ObjectMeta, obj: &Value, manager: &str, api_version: &str) {
    let fields = fieldpath::fields_from_object(obj);
    upsert_entry(
        &mut meta.managed_fields,
        ManagedFieldsEntry {
            manager: Some(manager.to_string()),
            operation: Some(managed_fields_operation::UPDATE.to_string()),
            api_version: Some(api_version.to_string()),
            time: Some(Timestamp::now()),
            fields_type: Some(FIELDS_TYPE_V1.to_string()),
            fields_v1: Some(fields),
            subresource: None,
        },
    );
}

/// Outcome of a server-side Apply: the merged object tree.
#[derive(Debug)]
pub struct ApplyResult {
    pub object: Value,
}

/// Applies an apply-patch (YAML or JSON) on behalf of `manager`.
///
/// With `force` unset, leaf paths owned by any other Apply manager fail the
/// call with the full conflict list and leave the object untouched. With
/// `force` set, contested paths are reassigned: they are removed from every
/// other Apply entry's tree, empty entries are dropped, and the requester's
/// entry is upserted with the requested set.
pub fn apply(
    meta: &mut ObjectMeta,
    current: &Value,
    patch: &[u8],
    manager: &str,
    api_version: &str,
    force: bool,
    strategic: Option<&StrategicMetadata>,
) -> Result<ApplyResult> {
    let patch_value = parse_apply_patch(patch)?;
    let requested = fieldpath::flatten(&fieldpath::fields_from_patch_shape(&patch_value));

    let conflicts = detect_conflicts(&meta.managed_fields, manager, &requested);
    if !conflicts.is_empty() {
        if !force {
            return Err(NetguardError::PatchConflicts { conflicts });
        }
        reassign_ownership(&mut meta.managed_fields, manager, &requested);
    }

    let patch_bytes = serde_json::to_vec(&patch_value)
        .map_err(|e| NetguardError::Internal(format!("reserializing apply patch: {}", e)))?;
    let object = apply_strategic_merge_patch(current, &patch_bytes, strategic)?;

    upsert_entry(
        &mut meta.managed_fields,
        ManagedFieldsEntry {
            manager: Some(manager.to_string()),
            operation: Some(managed_fields_operation::APPLY.to_string()),
            api_version: Some(api_version.to_string()),
            time: Some(Timestamp::now()),
            fields_type: Some(FIELDS_TYPE_V1.to_string()),
            fields_v1: Some(fieldpath::trie_from_paths(&requested)),
            subresource: None,
        },
    );

    Ok(ApplyResult { object })
}

/// Read-only preflight: the conflicts an Apply by `requester` over
/// `requested` leaf paths would produce against every other Apply entry.
pub fn detect_conflicts(
    entries: &[ManagedFieldsEntry],
    requester: &str,
    requested: &BTreeSet<String>,
) -> Vec<FieldConflict> {
    let mut conflicts = Vec::new();
    for entry in entries {
        if entry.operation.as_deref() != Some(managed_fields_operation::APPLY) {
            continue;
        }
        let owner = entry.manager.as_deref().unwrap_or("");
        if owner == requester {
            continue;
        }
        let owned = entry
            .fields_v1
            .as_ref()
            .map(fieldpath::flatten)
            .unwrap_or_default();
        for field in fieldpath::intersection(requested, &owned) {
            conflicts.push(FieldConflict {
                manager: owner.to_string(),
                field: field.clone(),
                message: format!("field {} is owned by {}", field, owner),
            });
        }
    }
    conflicts
}

fn reassign_ownership(
    entries: &mut Vec<ManagedFieldsEntry>,
    requester: &str,
    requested: &BTreeSet<String>,
) {
    entries.retain_mut(|entry| {
        if entry.operation.as_deref() != Some(managed_fields_operation::APPLY) {
            return true;
        }
        if entry.manager.as_deref() == Some(requester) {
            return true;
        }
        let Some(fields) = entry.fields_v1.as_mut() else {
            return true;
        };
        fieldpath::remove_paths(fields, requested)
    });
}

/// Upserts an entry into the sequence, deduplicating on the
/// (manager, operation, subresource) key.
pub fn upsert_entry(entries: &mut Vec<ManagedFieldsEntry>, entry: ManagedFieldsEntry) {
    match entries.iter_mut().find(|e| e.key() == entry.key()) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

/// Merges managed fields from a source object onto a destination, used when
/// the facade converts domain → wire and back: source-wins on the
/// (manager, operation, subresource) key, destination-only entries preserved.
/// A nil source leaves the destination unchanged.
pub fn merge_managed_fields(
    source: Option<&[ManagedFieldsEntry]>,
    destination: &mut Vec<ManagedFieldsEntry>,
) {
    let Some(source) = source else {
        return;
    };
    for entry in deep_copy_entries(source) {
        upsert_entry(destination, entry);
    }
}

/// Copies an entry slice: the slice itself is rebuilt shallowly while each
/// entry's FieldsV1 tree is cloned deeply, so later trie edits never alias.
pub fn deep_copy_entries(entries: &[ManagedFieldsEntry]) -> Vec<ManagedFieldsEntry> {
    entries
        .iter()
        .map(|entry| {
            let mut copy = entry.clone();
            copy.fields_v1 = entry.fields_v1.clone();
            copy
        })
        .collect()
}

fn parse_apply_patch(patch: &[u8]) -> Result<Value> {
    let invalid = |reason: String| NetguardError::InvalidPatch {
        kind: PatchKind::Apply,
        reason,
    };
    if patch.is_empty() {
        return Err(invalid("empty patch document".to_string()));
    }
    // YAML is a superset of JSON, so one parser covers both accepted forms.
    let value: Value =
        serde_yaml::from_slice(patch).map_err(|e| invalid(format!("invalid YAML: {}", e)))?;
    if !value.is_object() {
        return Err(invalid("document root must be a mapping".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply_patch(
        meta: &mut ObjectMeta,
        current: &Value,
        patch: &str,
        manager: &str,
        force: bool,
    ) -> Result<ApplyResult> {
        apply(
            meta,
            current,
            patch.as_bytes(),
            manager,
            "netguard.sgroups.io/v1beta1",
            force,
            None,
        )
    }

    fn owned_paths(meta: &ObjectMeta, manager: &str) -> BTreeSet<String> {
        meta.managed_fields
            .iter()
            .find(|e| e.manager.as_deref() == Some(manager))
            .and_then(|e| e.fields_v1.as_ref())
            .map(fieldpath::flatten)
            .unwrap_or_default()
    }

    #[test]
    fn test_first_apply_records_ownership() {
        let mut meta = ObjectMeta::default();
        let result = apply_patch(
            &mut meta,
            &json!({}),
            r#"{"spec": {"description": "d1", "ingressPorts": [{"protocol": "TCP", "port": "8080"}]}}"#,
            "kubectl",
            false,
        )
        .unwrap();

        assert_eq!(result.object["spec"]["description"], "d1");
        assert_eq!(meta.managed_fields.len(), 1);
        let entry = &meta.managed_fields[0];
        assert_eq!(entry.manager.as_deref(), Some("kubectl"));
        assert_eq!(entry.operation.as_deref(), Some("Apply"));
        let owned = owned_paths(&meta, "kubectl");
        assert!(owned.contains("spec.description"));
        assert!(owned.contains("spec.ingressPorts"));
    }

    #[test]
    fn test_conflicting_apply_fails_without_force() {
        let mut meta = ObjectMeta::default();
        let current = apply_patch(
            &mut meta,
            &json!({}),
            r#"{"spec": {"description": "d1"}}"#,
            "kubectl",
            false,
        )
        .unwrap()
        .object;

        let err = apply_patch(
            &mut meta,
            &current,
            r#"{"spec": {"description": "d2"}}"#,
            "controller",
            false,
        )
        .unwrap_err();

        match err {
            NetguardError::PatchConflicts { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].manager, "kubectl");
                assert_eq!(conflicts[0].field, "spec.description");
            }
            other => panic!("expected PatchConflicts, got {:?}", other),
        }
        // ownership unchanged
        assert!(owned_paths(&meta, "kubectl").contains("spec.description"));
        assert!(owned_paths(&meta, "controller").is_empty());
    }

    #[test]
    fn test_forced_apply_reassigns_ownership() {
        let mut meta = ObjectMeta::default();
        let current = apply_patch(
            &mut meta,
            &json!({}),
            r#"{"spec": {"description": "d1", "trace": true}}"#,
            "kubectl",
            false,
        )
        .unwrap()
        .object;

        let result = apply_patch(
            &mut meta,
            &current,
            r#"{"spec": {"description": "d2"}}"#,
            "controller",
            true,
        )
        .unwrap();

        assert_eq!(result.object["spec"]["description"], "d2");
        assert_eq!(result.object["spec"]["trace"], true);

        let kubectl = owned_paths(&meta, "kubectl");
        let controller = owned_paths(&meta, "controller");
        assert!(!kubectl.contains("spec.description"));
        assert!(kubectl.contains("spec.trace"));
        assert!(controller.contains("spec.description"));
    }

    #[test]
    fn test_forced_apply_drops_fully_stripped_entries() {
        let mut meta = ObjectMeta::default();
        apply_patch(
            &mut meta,
            &json!({}),
            r#"{"spec": {"description": "d1"}}"#,
            "kubectl",
            false,
        )
        .unwrap();

        apply_patch(
            &mut meta,
            &json!({"spec": {"description": "d1"}}),
            r#"{"spec": {"description": "d2"}}"#,
            "controller",
            true,
        )
        .unwrap();

        assert!(
            meta.managed_fields
                .iter()
                .all(|e| e.manager.as_deref() != Some("kubectl"))
        );
    }

    #[test]
    fn test_same_manager_reapply_is_not_a_conflict() {
        let mut meta = ObjectMeta::default();
        let current = apply_patch(
            &mut meta,
            &json!({}),
            r#"{"spec": {"description": "d1"}}"#,
            "kubectl",
            false,
        )
        .unwrap()
        .object;

        let result = apply_patch(
            &mut meta,
            &current,
            r#"{"spec": {"description": "d3"}}"#,
            "kubectl",
            false,
        )
        .unwrap();
        assert_eq!(result.object["spec"]["description"], "d3");
        assert_eq!(meta.managed_fields.len(), 1);
    }

    #[test]
    fn test_apply_accepts_yaml() {
        let mut meta = ObjectMeta::default();
        let result = apply_patch(
            &mut meta,
            &json!({}),
            "spec:\n  description: d1\n",
            "kubectl",
            false,
        )
        .unwrap();
        assert_eq!(result.object["spec"]["description"], "d1");
    }

    #[test]
    fn test_update_does_not_conflict_with_apply() {
        let mut meta = ObjectMeta::default();
        track_update(
            &mut meta,
            &json!({"spec": {"description": "d0"}}),
            "legacy",
            "netguard.sgroups.io/v1beta1",
        );
        // Update entries never participate in apply conflicts
        let result = apply_patch(
            &mut meta,
            &json!({"spec": {"description": "d0"}}),
            r#"{"spec": {"description": "d1"}}"#,
            "kubectl",
            false,
        )
        .unwrap();
        assert_eq!(result.object["spec"]["description"], "d1");
        assert_eq!(meta.managed_fields.len(), 2);
    }

    #[test]
    fn test_track_update_dedupes_on_key() {
        let mut meta = ObjectMeta::default();
        let obj = json!({"spec": {}});
        track_update(&mut meta, &obj, "writer", "netguard.sgroups.io/v1beta1");
        track_update(&mut meta, &obj, "writer", "netguard.sgroups.io/v1beta1");
        assert_eq!(meta.managed_fields.len(), 1);
    }

    #[test]
    fn test_merge_managed_fields_source_wins() {
        let mk = |manager: &str, op: &str, fields: Value| ManagedFieldsEntry {
            manager: Some(manager.to_string()),
            operation: Some(op.to_string()),
            api_version: Some("netguard.sgroups.io/v1beta1".to_string()),
            time: None,
            fields_type: Some(FIELDS_TYPE_V1.to_string()),
            fields_v1: Some(fields),
            subresource: None,
        };

        let source = vec![mk("kubectl", "Apply", json!({"spec": {}}))];
        let mut destination = vec![
            mk("kubectl", "Apply", json!({"old": {}})),
            mk("writer", "Update", json!({"status": {}})),
        ];

        merge_managed_fields(Some(&source), &mut destination);
        assert_eq!(destination.len(), 2);
        assert_eq!(destination[0].fields_v1, Some(json!({"spec": {}})));
        assert_eq!(destination[1].manager.as_deref(), Some("writer"));

        // nil source leaves destination untouched
        merge_managed_fields(None, &mut destination);
        assert_eq!(destination.len(), 2);
    }

    #[test]
    fn test_malformed_apply_patch_rejected() {
        let mut meta = ObjectMeta::default();
        assert!(apply_patch(&mut meta, &json!({}), "", "m", false).is_err());
        assert!(apply_patch(&mut meta, &json!({}), "- a\n- b\n", "m", false).is_err());
    }
}
