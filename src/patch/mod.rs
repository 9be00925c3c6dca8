//! Content-type dispatch for the patch engines.
//!
//! The engines are tree-only and type-agnostic: callers materialize the
//! current object as a generic JSON tree, apply, and reconstruct the typed
//! object through the converter round-trip.

pub mod json_patch;
pub mod merge_patch;
pub mod strategic;

use serde_json::Value;

pub use crate::errors::PatchKind;
use crate::errors::Result;
pub use json_patch::{apply_json_patch, parse_json_patch, validate_json_patch};
pub use merge_patch::{apply_merge_patch, validate_merge_patch};
pub use strategic::{
    ListStrategy, StrategicMetadata, apply_strategic_merge_patch, validate_strategic_merge_patch,
};

/// Applies a patch of the given content type to `doc`.
///
/// Apply-patch bytes are handled by the field manager, which layers manager
/// tracking on top of the strategic engine; routing them here applies the
/// same merge without ownership bookkeeping.
pub fn apply(
    doc: &Value,
    kind: PatchKind,
    patch: &[u8],
    metadata: Option<&StrategicMetadata>,
) -> Result<Value> {
    match kind {
        PatchKind::Json => apply_json_patch(doc, patch),
        PatchKind::Merge => apply_merge_patch(doc, patch),
        PatchKind::StrategicMerge | PatchKind::Apply => {
            apply_strategic_merge_patch(doc, patch, metadata)
        }
    }
}

/// Validates patch bytes for the given content type without applying them.
pub fn validate(kind: PatchKind, patch: &[u8]) -> Result<()> {
    match kind {
        PatchKind::Json => validate_json_patch(patch),
        PatchKind::Merge => validate_merge_patch(patch),
        PatchKind::StrategicMerge | PatchKind::Apply => validate_strategic_merge_patch(patch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch() {
        let doc = json!({"a": 1});
        assert_eq!(
            apply(&doc, PatchKind::Merge, br#"{"b": 2}"#, None).unwrap(),
            json!({"a": 1, "b": 2})
        );
        assert_eq!(
            apply(
                &doc,
                PatchKind::Json,
                br#"[{"op": "add", "path": "/b", "value": 2}]"#,
                None
            )
            .unwrap(),
            json!({"a": 1, "b": 2})
        );
        assert!(validate(PatchKind::StrategicMerge, b"{}").is_ok());
        assert!(validate(PatchKind::Apply, b"[]").is_err());
    }
}
