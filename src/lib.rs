//! Netguard backend - aggregated control-plane API over PostgreSQL
//!
//! This library serves the declarative netguard network-security model
//! (services, address groups, bindings, cross-service rules, networks,
//! hosts) through the standard cluster resource verbs, persisting
//! authoritative state in a transactional relational store with monotonic
//! resource versioning, server-side apply and field-manager tracking.

pub mod common;
pub mod errors;
pub mod fieldmanager;
pub mod netguard;
pub mod patch;
pub mod pg;
pub mod storage;

pub use common::{
    Condition, GroupResource, LabelSelector, ListMeta, ManagedFieldsEntry, ObjectMeta,
    ResourceIdentifier, Scope, Timestamp, TypeMeta,
};
pub use errors::{FieldConflict, NetguardError, PatchKind};
pub use pg::{PgConfig, Registry, SyncOp, SyncOpts};
pub use storage::{PatchOptions, RequestContext, ResourceStorage};
