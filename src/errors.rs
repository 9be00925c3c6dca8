//! Typed domain errors surfaced across the backend.
//!
//! Driver-level failures are translated at the persistence boundary into the
//! variants below; the storage facade passes typed errors through unchanged
//! and only adds the verb-and-kind wrapper when one is missing.

use thiserror::Error;

use crate::common::GroupResource;
use crate::common::validation::ErrorList;

/// One (manager, field) pair reported by a rejected server-side Apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConflict {
    /// The manager currently owning the field.
    pub manager: String,
    /// Dotted path of the contested field.
    pub field: String,
    /// Human readable explanation.
    pub message: String,
}

impl std::fmt::Display for FieldConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conflict with {} on {}", self.manager, self.field)
    }
}

/// The patch content type a malformed patch was submitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    Json,
    Merge,
    StrategicMerge,
    Apply,
}

impl std::fmt::Display for PatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PatchKind::Json => "application/json-patch+json",
            PatchKind::Merge => "application/merge-patch+json",
            PatchKind::StrategicMerge => "application/strategic-merge-patch+json",
            PatchKind::Apply => "application/apply-patch+yaml",
        };
        write!(f, "{}", s)
    }
}

/// Error taxonomy of the backend.
#[derive(Debug, Error)]
pub enum NetguardError {
    /// The named object does not exist; carries the group+resource+name the
    /// facade presents to clients.
    #[error("{resource} \"{name}\" not found")]
    NotFound {
        resource: GroupResource,
        name: String,
    },

    /// A Network insert collided with an existing CIDR.
    #[error("network \"{network}\" already uses CIDR {cidr}")]
    CidrOverlap { cidr: String, network: String },

    /// A Host insert collided with an existing host UUID.
    #[error("host \"{host}\" already registered with UUID {uuid}")]
    UuidAlreadyExists { uuid: String, host: String },

    /// A HostBinding insert targeted a host that is already bound.
    #[error("host \"{host}\" is already bound to an address group")]
    HostAlreadyBound { host: String },

    /// A bulk operation received a scope shape the writer does not support.
    #[error("unsupported scope type: {0}")]
    UnsupportedScope(String),

    /// A sync call carried an operation the writer does not support.
    #[error("unsupported sync operation: {0}")]
    UnsupportedSyncOp(String),

    /// Optimistic concurrency failure: the submitted resourceVersion no longer
    /// matches the stored one.
    #[error("resource version conflict: expected {expected}, stored {stored}")]
    VersionConflict { expected: String, stored: String },

    /// A non-forced Apply overlapped fields owned by other managers.
    #[error("apply failed with {} conflict(s)", conflicts.len())]
    PatchConflicts { conflicts: Vec<FieldConflict> },

    /// The submitted patch document is malformed for its content type.
    #[error("invalid {kind} patch: {reason}")]
    InvalidPatch { kind: PatchKind, reason: String },

    /// The object failed validation.
    #[error("validation failed: {0}")]
    Invalid(ErrorList),

    /// A verb was rejected for the given identifier or scope shape.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A bounded side-channel round-trip exceeded its budget.
    #[error("{operation} timed out after {}ms", timeout.as_millis())]
    Timeout {
        operation: String,
        timeout: std::time::Duration,
    },

    /// Any unmatched driver error, wrapped with operation context.
    #[error("{context}: {source}")]
    Database {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// Internal invariant failure outside the driver.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NetguardError {
    /// Builds the NotFound error for a kind's group/resource and object name.
    pub fn not_found(group: &str, resource: &str, name: &str) -> Self {
        NetguardError::NotFound {
            resource: GroupResource {
                group: group.to_string(),
                resource: resource.to_string(),
            },
            name: name.to_string(),
        }
    }

    /// Wraps a driver error with "operation on namespace/name" context.
    pub fn database(context: impl Into<String>, source: sqlx::Error) -> Self {
        NetguardError::Database {
            context: context.into(),
            source,
        }
    }

    /// True for the NotFound variant; used by the facade for translation.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NetguardError::NotFound { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetguardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_carries_group_resource_name() {
        let err = NetguardError::not_found("netguard.sgroups.io", "networks", "n1");
        assert_eq!(
            err.to_string(),
            "networks.netguard.sgroups.io \"n1\" not found"
        );
    }

    #[test]
    fn test_cidr_overlap_names_conflicting_attribute() {
        let err = NetguardError::CidrOverlap {
            cidr: "10.0.0.0/24".to_string(),
            network: "n1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("10.0.0.0/24"));
        assert!(msg.contains("n1"));
    }

    #[test]
    fn test_patch_conflicts_counts() {
        let err = NetguardError::PatchConflicts {
            conflicts: vec![FieldConflict {
                manager: "kubectl".to_string(),
                field: "spec.description".to_string(),
                message: "owned by kubectl".to_string(),
            }],
        };
        assert!(err.to_string().contains("1 conflict"));
    }
}
