//! Common metadata types
//!
//! This module contains the fundamental metadata types shared by every
//! persisted netguard resource: type/object/list metadata, managed fields
//! and conditions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::time::Timestamp;

/// TypeMeta describes an individual object in an API response or request
/// with Kind and Version fields.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Hash, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// Kind is a string value representing the REST resource this object represents.
    ///
    /// Servers may infer this from the endpoint the client submits requests to.
    /// Cannot be updated.
    /// In CamelCase.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// APIVersion defines the versioned schema of this representation of an object.
    /// Servers should convert recognized schemas to the latest internal value,
    /// and may reject unrecognized values.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
}

/// ListMeta describes metadata that synthetic resources must have, including lists.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    /// continue may be set if the user set a limit on the number of items returned.
    #[serde(rename = "continue", default, skip_serializing_if = "Option::is_none")]
    pub continue_: Option<String>,

    /// remainingItemCount is the number of subsequent items in the list which are
    /// not included in this list response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_item_count: Option<i64>,

    /// resourceVersion identifies the server's internal version of the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

/// ObjectMeta is metadata that all persisted resources must have.
///
/// Unlike upstream apimachinery, conditions live on the metadata here: the
/// backend persists them in the shared metadata table so that reconcilers
/// can update them through the condition-only side-channel without touching
/// the resource row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Name must be unique within a namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// GenerateName is an optional prefix, used by the server, to generate a unique
    /// name ONLY IF the Name field has not been provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,

    /// Namespace defines the space within which each name must be unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// UID is the unique in time and space value for this object.
    /// Generated by the backend on first write, immutable afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// An opaque value that represents the internal version of this object.
    /// Minted by the versioning store on every non-condition-only write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    /// A sequence number representing a specific generation of the desired state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,

    /// ObservedGeneration is the generation most recently observed by the reconciler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Map of string keys and values that can be used to organize and categorize objects.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Annotations is an unstructured key value map stored with a resource.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Must be empty before the object is deleted from the registry. Each entry
    /// is an identifier for the responsible component that will remove the entry
    /// from the list. If the deletionTimestamp of the object is non-nil, entries
    /// in this list can only be removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,

    /// Conditions represent the latest available observations of the object's state,
    /// keyed by type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// ManagedFields maps workflow-id and version to the set of fields that are
    /// managed by that workflow.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managed_fields: Vec<ManagedFieldsEntry>,

    /// CreationTimestamp is a timestamp representing the server time when this
    /// object was created. It is represented in RFC3339 form and is UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Timestamp>,

    /// DeletionTimestamp is the RFC3339 time at which this resource will be deleted.
    /// Set by the server when a graceful deletion is initiated; once set it is
    /// monotone non-decreasing until the row disappears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<Timestamp>,
}

impl ObjectMeta {
    /// Get name, returns empty string if not set (Go-style zero value).
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Get namespace, returns empty string if not set (Go-style zero value).
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }

    /// Get generate_name, returns empty string if not set (Go-style zero value).
    pub fn generate_name(&self) -> &str {
        self.generate_name.as_deref().unwrap_or("")
    }

    /// Get uid, returns empty string if not set (Go-style zero value).
    pub fn uid(&self) -> &str {
        self.uid.as_deref().unwrap_or("")
    }

    /// Get resource_version, returns empty string if not set (Go-style zero value).
    pub fn resource_version(&self) -> &str {
        self.resource_version.as_deref().unwrap_or("")
    }

    /// Get generation, returns 0 if not set (Go-style zero value).
    pub fn generation(&self) -> i64 {
        self.generation.unwrap_or(0)
    }

    /// Get observed_generation, returns 0 if not set (Go-style zero value).
    pub fn observed_generation(&self) -> i64 {
        self.observed_generation.unwrap_or(0)
    }

    /// Stamps the fields minted exactly once, at creation: a fresh uid,
    /// generation 1, observedGeneration 0 and the creation timestamp.
    pub fn touch_on_create(&mut self) {
        self.uid = Some(Uuid::new_v4().to_string());
        self.generation = Some(1);
        self.observed_generation = Some(0);
        self.creation_timestamp = Some(Timestamp::now());
    }

    /// Stamps the resource version minted by the versioning store for this write.
    pub fn touch_on_write(&mut self, version: i64) {
        self.resource_version = Some(version.to_string());
    }

    /// Advances the generation counter. Called for every non-condition-only
    /// write of an existing object; condition-only updates never advance it.
    pub fn bump_generation(&mut self) {
        self.generation = Some(self.generation() + 1);
    }

    /// Upserts a condition keyed by type. The lastTransitionTime is preserved
    /// when the status did not change.
    pub fn set_condition(&mut self, mut condition: Condition) {
        if condition.last_transition_time.is_none() {
            condition.last_transition_time = Some(Timestamp::now());
        }
        if let Some(existing) = self
            .conditions
            .iter_mut()
            .find(|c| c.type_ == condition.type_)
        {
            if existing.status == condition.status {
                condition.last_transition_time = existing.last_transition_time.clone();
            }
            *existing = condition;
        } else {
            self.conditions.push(condition);
        }
    }

    /// Looks up a condition by type.
    pub fn condition(&self, type_: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.type_ == type_)
    }
}

/// Operation values recorded on a ManagedFieldsEntry.
pub mod managed_fields_operation {
    /// The entry was produced by a server-side Apply.
    pub const APPLY: &str = "Apply";
    /// The entry was produced by a regular Update.
    pub const UPDATE: &str = "Update";
}

/// FieldsType discriminator for the managed-fields serialization format.
pub const FIELDS_TYPE_V1: &str = "FieldsV1";

/// ManagedFieldsEntry is a workflow-id, a FieldSet and the group version of the
/// resource that the fieldset applies to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagedFieldsEntry {
    /// Manager is an identifier of the workflow managing these fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,

    /// Operation is the type of operation which lead to this ManagedFieldsEntry
    /// being merged, one of Apply or Update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// APIVersion defines the version of this resource that this field set applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Time is the timestamp of when the ManagedFieldsEntry was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Timestamp>,

    /// FieldsType is the discriminator for the different fields format and version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_type: Option<String>,

    /// FieldsV1 holds the first JSON version of the fields: a trie whose leaf
    /// paths denote the fields owned by this manager; leaves are empty objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_v1: Option<serde_json::Value>,

    /// Subresource is the name of the subresource used to update that object,
    /// or empty string if the object was updated through the main resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subresource: Option<String>,
}

impl ManagedFieldsEntry {
    /// The (manager, operation, subresource) key entries are merged and
    /// deduplicated on.
    pub fn key(&self) -> (String, String, String) {
        (
            self.manager.clone().unwrap_or_default(),
            self.operation.clone().unwrap_or_default(),
            self.subresource.clone().unwrap_or_default(),
        )
    }
}

/// Condition defines an observation of a resource's state.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition in CamelCase or in foo.example.com/CamelCase.
    #[serde(rename = "type")]
    pub type_: String,

    /// Status of the condition, one of True, False, Unknown.
    pub status: String,

    /// ObservedGeneration represents the .metadata.generation that the condition
    /// was set based upon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// LastTransitionTime is the last time the condition transitioned from one
    /// status to another.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Timestamp>,

    /// Reason contains a programmatic identifier indicating the reason for the
    /// condition's last transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Message is a human readable message indicating details about the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Condition status constants
pub mod condition_status {
    pub const TRUE: &str = "True";
    pub const FALSE: &str = "False";
    pub const UNKNOWN: &str = "Unknown";
}

/// GroupResource identifies a resource by group and resource name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupResource {
    /// Group is the API group.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    /// Resource is the resource name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource: String,
}

impl std::fmt::Display for GroupResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// LabelSelector is a label query over a set of resources.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    /// matchLabels is a map of {key,value} pairs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,

    /// matchExpressions is a list of label selector requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

/// LabelSelectorRequirement is a selector that contains values, a key, and an operator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelectorRequirement {
    /// key is the label key that the selector applies to.
    pub key: String,

    /// operator represents a key's relationship to a set of values.
    pub operator: String,

    /// values is an array of string values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Label selector operator constants
pub mod label_selector_operator {
    /// In means the label must match one of the values
    pub const IN: &str = "In";
    /// NotIn means the label must not match any of the values
    pub const NOT_IN: &str = "NotIn";
    /// Exists means the label must exist (values must be empty)
    pub const EXISTS: &str = "Exists";
    /// DoesNotExist means the label must not exist
    pub const DOES_NOT_EXIST: &str = "DoesNotExist";
}

impl LabelSelector {
    /// Evaluates the selector against a label map.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        for (k, v) in &self.match_labels {
            if labels.get(k) != Some(v) {
                return false;
            }
        }
        for req in &self.match_expressions {
            let value = labels.get(&req.key);
            let ok = match req.operator.as_str() {
                label_selector_operator::IN => {
                    value.is_some_and(|v| req.values.iter().any(|c| c == v))
                }
                label_selector_operator::NOT_IN => {
                    value.is_none_or(|v| !req.values.iter().any(|c| c == v))
                }
                label_selector_operator::EXISTS => value.is_some(),
                label_selector_operator::DOES_NOT_EXIST => value.is_none(),
                _ => false,
            };
            if !ok {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_on_create_mints_identity() {
        let mut meta = ObjectMeta::default();
        meta.touch_on_create();
        assert!(!meta.uid().is_empty());
        assert_eq!(meta.generation(), 1);
        assert_eq!(meta.observed_generation(), 0);
        assert!(meta.creation_timestamp.is_some());
    }

    #[test]
    fn test_touch_on_write_stamps_version_only() {
        let mut meta = ObjectMeta::default();
        meta.touch_on_create();
        let uid = meta.uid().to_string();
        meta.touch_on_write(42);
        assert_eq!(meta.resource_version(), "42");
        assert_eq!(meta.uid(), uid);
        assert_eq!(meta.generation(), 1);
    }

    #[test]
    fn test_set_condition_preserves_transition_time_on_same_status() {
        let mut meta = ObjectMeta::default();
        let t0 = Timestamp::from_str("2024-01-15T10:00:00Z").unwrap();
        meta.set_condition(Condition {
            type_: "Synced".to_string(),
            status: condition_status::TRUE.to_string(),
            observed_generation: None,
            last_transition_time: Some(t0.clone()),
            reason: Some("Ok".to_string()),
            message: None,
        });
        meta.set_condition(Condition {
            type_: "Synced".to_string(),
            status: condition_status::TRUE.to_string(),
            observed_generation: Some(2),
            last_transition_time: None,
            reason: Some("StillOk".to_string()),
            message: None,
        });
        let cond = meta.condition("Synced").unwrap();
        assert_eq!(cond.last_transition_time.as_ref(), Some(&t0));
        assert_eq!(cond.reason.as_deref(), Some("StillOk"));
        assert_eq!(meta.conditions.len(), 1);
    }

    #[test]
    fn test_set_condition_resets_transition_time_on_status_change() {
        let mut meta = ObjectMeta::default();
        let t0 = Timestamp::from_str("2024-01-15T10:00:00Z").unwrap();
        meta.set_condition(Condition {
            type_: "Synced".to_string(),
            status: condition_status::TRUE.to_string(),
            observed_generation: None,
            last_transition_time: Some(t0.clone()),
            reason: None,
            message: None,
        });
        meta.set_condition(Condition {
            type_: "Synced".to_string(),
            status: condition_status::FALSE.to_string(),
            observed_generation: None,
            last_transition_time: None,
            reason: Some("Drift".to_string()),
            message: None,
        });
        let cond = meta.condition("Synced").unwrap();
        assert_ne!(cond.last_transition_time.as_ref(), Some(&t0));
        assert_eq!(cond.status, condition_status::FALSE);
    }

    #[test]
    fn test_label_selector_matches() {
        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), "web".to_string());
        labels.insert("tier".to_string(), "front".to_string());

        let mut selector = LabelSelector::default();
        selector
            .match_labels
            .insert("app".to_string(), "web".to_string());
        assert!(selector.matches(&labels));

        selector.match_expressions.push(LabelSelectorRequirement {
            key: "tier".to_string(),
            operator: label_selector_operator::IN.to_string(),
            values: vec!["front".to_string(), "back".to_string()],
        });
        assert!(selector.matches(&labels));

        selector.match_expressions.push(LabelSelectorRequirement {
            key: "env".to_string(),
            operator: label_selector_operator::EXISTS.to_string(),
            values: vec![],
        });
        assert!(!selector.matches(&labels));
    }
}
