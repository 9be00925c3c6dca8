//! Common types shared across the backend.
//!
//! This module contains the fundamental metadata, identifier and trait
//! machinery every persisted kind builds on.

pub mod ident;
pub mod meta;
#[cfg(test)]
pub mod test_utils;
pub mod time;
pub mod traits;
pub mod validation;

pub use ident::{ResourceIdentifier, Scope};
pub use meta::{
    Condition, FIELDS_TYPE_V1, GroupResource, LabelSelector, LabelSelectorRequirement, ListMeta,
    ManagedFieldsEntry, ObjectMeta, TypeMeta, condition_status, managed_fields_operation,
};
pub use time::Timestamp;
pub use traits::*;
