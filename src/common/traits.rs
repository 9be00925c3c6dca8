//! Core API machinery traits
//!
//! Maps the API semantics onto Rust seams: static schema identity, the
//! external (versioned, wire) representation, and the internal (domain)
//! representation the persistence engine works over.

use crate::common::ident::ResourceIdentifier;
use crate::common::{ObjectMeta, TypeMeta};

// ============================================================================
// 1. Static identity (Resource Schema)
// ============================================================================

/// Group-Version-Kind-Resource identity of a kind.
///
/// All netguard kinds are statically known, so the schema is a set of
/// associated functions rather than per-instance state.
pub trait ResourceSchema: Send + Sync {
    /// API group (e.g. "netguard.sgroups.io")
    fn group() -> &'static str;

    /// API version (e.g. "v1beta1")
    fn version() -> &'static str;

    /// Kind (e.g. "Service", "AddressGroup")
    fn kind() -> &'static str;

    /// Resource name (e.g. "services", "addressgroups")
    fn resource() -> &'static str;

    /// The `group/version` string stamped on TypeMeta.
    fn api_version() -> String {
        if Self::group().is_empty() {
            Self::version().to_string()
        } else {
            format!("{}/{}", Self::group(), Self::version())
        }
    }
}

// ============================================================================
// 2. External version (Versioned Object)
// ============================================================================

/// Access to the TypeMeta fields.
pub trait HasTypeMeta {
    /// TypeMeta reference
    fn type_meta(&self) -> &TypeMeta;

    /// Mutable TypeMeta reference
    fn type_meta_mut(&mut self) -> &mut TypeMeta;
}

/// A versioned (external) API object.
///
/// The wire `metadata` field is `Option<ObjectMeta>`; implementations handle
/// the None case and provide Go-style zero-value access.
pub trait VersionedObject: Send + Sync {
    /// ObjectMeta reference; a default ObjectMeta when metadata is None
    fn metadata(&self) -> &ObjectMeta;

    /// Mutable ObjectMeta reference; inserts a default ObjectMeta when None
    fn metadata_mut(&mut self) -> &mut ObjectMeta;
}

/// Fills resource defaults: TypeMeta (apiVersion, kind) and computed spec fields.
pub trait ApplyDefault {
    /// Fill default values
    fn apply_default(&mut self);
}

// ============================================================================
// 3. Internal version (Domain Object)
// ============================================================================

/// Access to ObjectMeta on internal objects, where metadata is never optional.
pub trait HasObjectMeta: Send + Sync {
    /// ObjectMeta reference
    fn meta(&self) -> &ObjectMeta;

    /// Mutable ObjectMeta reference
    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// The (namespace, name) identifier of the object.
    fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.meta().namespace(), self.meta().name())
    }
}

// ============================================================================
// 4. Version conversion
// ============================================================================

/// External to internal conversion (normalization).
///
/// Consumes the versioned instance, drops the version information and
/// produces the internal representation.
pub trait ToInternal<I: HasObjectMeta> {
    /// Convert to the internal version
    fn to_internal(self) -> I;
}

/// Internal to external conversion (versioning).
///
/// Builds the versioned instance; callers run `apply_default()` afterwards to
/// restamp TypeMeta.
pub trait FromInternal<I: HasObjectMeta>: Sized {
    /// Construct from the internal version
    fn from_internal(internal: I) -> Self;
}

// ============================================================================
// Trait implementation macros
// ============================================================================

/// Implements `VersionedObject` for an external type whose `metadata` field
/// is `Option<ObjectMeta>`.
#[macro_export]
macro_rules! impl_versioned_object {
    ($type:ty) => {
        impl $crate::common::traits::VersionedObject for $type {
            fn metadata(&self) -> &$crate::common::ObjectMeta {
                use std::sync::OnceLock;
                self.metadata.as_ref().unwrap_or_else(|| {
                    static DEFAULT: OnceLock<$crate::common::ObjectMeta> = OnceLock::new();
                    DEFAULT.get_or_init($crate::common::ObjectMeta::default)
                })
            }

            fn metadata_mut(&mut self) -> &mut $crate::common::ObjectMeta {
                self.metadata
                    .get_or_insert_with($crate::common::ObjectMeta::default)
            }
        }
    };
}

/// Implements `HasObjectMeta` for an internal type whose `metadata` field is
/// a plain `ObjectMeta`.
#[macro_export]
macro_rules! impl_has_object_meta {
    ($type:ty) => {
        impl $crate::common::traits::HasObjectMeta for $type {
            fn meta(&self) -> &$crate::common::ObjectMeta {
                &self.metadata
            }

            fn meta_mut(&mut self) -> &mut $crate::common::ObjectMeta {
                &mut self.metadata
            }
        }
    };
}

/// Implements `ResourceSchema`, `HasTypeMeta` and `ApplyDefault` for an
/// external type and its list type in one go.
#[macro_export]
macro_rules! impl_resource_schema {
    ($type:ty, $list:ty, $group:literal, $version:literal, $kind:literal, $resource:literal) => {
        impl $crate::common::traits::ResourceSchema for $type {
            fn group() -> &'static str {
                $group
            }

            fn version() -> &'static str {
                $version
            }

            fn kind() -> &'static str {
                $kind
            }

            fn resource() -> &'static str {
                $resource
            }
        }

        impl $crate::common::traits::ResourceSchema for $list {
            fn group() -> &'static str {
                $group
            }

            fn version() -> &'static str {
                $version
            }

            fn kind() -> &'static str {
                concat!($kind, "List")
            }

            fn resource() -> &'static str {
                $resource
            }
        }

        impl $crate::common::traits::HasTypeMeta for $type {
            fn type_meta(&self) -> &$crate::common::TypeMeta {
                &self.type_meta
            }

            fn type_meta_mut(&mut self) -> &mut $crate::common::TypeMeta {
                &mut self.type_meta
            }
        }

        impl $crate::common::traits::ApplyDefault for $type {
            fn apply_default(&mut self) {
                if self.type_meta.api_version.is_empty() {
                    self.type_meta.api_version = concat!($group, "/", $version).to_string();
                }
                if self.type_meta.kind.is_empty() {
                    self.type_meta.kind = $kind.to_string();
                }
            }
        }

        impl $crate::common::traits::ApplyDefault for $list {
            fn apply_default(&mut self) {
                if self.type_meta.api_version.is_empty() {
                    self.type_meta.api_version = concat!($group, "/", $version).to_string();
                }
                if self.type_meta.kind.is_empty() {
                    self.type_meta.kind = concat!($kind, "List").to_string();
                }
            }
        }
    };
}
