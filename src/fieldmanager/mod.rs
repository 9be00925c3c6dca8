//! Server-side-apply field management.
//!
//! Tracks which manager owns which field paths, detects ownership conflicts
//! between competing managers and resolves them on forced applies.

pub mod fieldpath;
pub mod manager;

pub use fieldpath::{fields_from_object, fields_from_patch_shape, flatten, trie_from_paths};
pub use manager::{
    ApplyResult, apply, deep_copy_entries, detect_conflicts, merge_managed_fields, track_update,
    upsert_entry,
};
