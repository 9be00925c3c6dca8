//! Generic resource storage facade.
//!
//! Per kind, [`ResourceStorage`] binds a [`BackendOperations`] implementation
//! over the domain type to the wire type's conversion seams
//! (`ToInternal`/`FromInternal`) and a [`Validator`], and serves the standard
//! verb set: get, list, create, update, delete, patch and watch.

pub mod lists;
pub mod request;
pub mod sort;
pub mod validators;
pub mod watch;

use std::future::Future;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::common::ident::{ResourceIdentifier, Scope};
use crate::common::validation::ErrorList;
use crate::common::{
    ApplyDefault, FromInternal, HasObjectMeta, ResourceSchema, ToInternal, VersionedObject,
};
use crate::errors::{NetguardError, PatchKind, Result};
use crate::fieldmanager;
use crate::patch::{self, StrategicMetadata};

pub use request::{FieldSelector, RequestContext};
pub use watch::{EventType, WatchBroadcaster, WatchEvent};

/// The backend contract the facade drives, expressed over the domain type.
pub trait BackendOperations<D>: Send + Sync {
    fn get(&self, id: &ResourceIdentifier) -> impl Future<Output = Result<D>> + Send;
    fn list(&self, scope: &Scope) -> impl Future<Output = Result<Vec<D>>> + Send;
    fn create(&self, obj: D) -> impl Future<Output = Result<D>> + Send;
    fn update(&self, obj: D) -> impl Future<Output = Result<D>> + Send;
    fn delete(&self, id: &ResourceIdentifier) -> impl Future<Output = Result<()>> + Send;
}

/// Per-kind validation hooks.
pub trait Validator<K>: Send + Sync {
    fn validate_create(&self, obj: &K) -> ErrorList;
    fn validate_update(&self, new_obj: &K, old_obj: &K) -> ErrorList;
    fn validate_delete(&self, _obj: &K) -> ErrorList {
        ErrorList::new()
    }
}

/// Construction of a kind's list wire type.
pub trait ResourceList<K>: Sized {
    fn from_items(items: Vec<K>, resource_version: Option<String>) -> Self;
}

/// Options accepted by the patch verb.
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    /// The field manager on whose behalf an Apply runs.
    pub field_manager: String,
    /// Reassign contested field ownership instead of failing.
    pub force: bool,
}

/// Generic storage for one kind.
pub struct ResourceStorage<K, D, B, V, L> {
    backend: B,
    validator: V,
    watch: WatchBroadcaster<K>,
    strategic: Option<StrategicMetadata>,
    _marker: PhantomData<fn() -> (D, L)>,
}

impl<K, D, B, V, L> ResourceStorage<K, D, B, V, L>
where
    K: VersionedObject
        + ResourceSchema
        + ApplyDefault
        + ToInternal<D>
        + FromInternal<D>
        + Serialize
        + DeserializeOwned
        + Clone,
    D: HasObjectMeta,
    B: BackendOperations<D>,
    V: Validator<K>,
    L: ResourceList<K>,
{
    pub fn new(backend: B, validator: V) -> Self {
        Self {
            backend,
            validator,
            watch: WatchBroadcaster::new(),
            strategic: None,
            _marker: PhantomData,
        }
    }

    /// Declares strategic-merge metadata for this kind. Without it,
    /// strategic patches fall back to merge-patch semantics.
    pub fn with_strategic_metadata(mut self, metadata: StrategicMetadata) -> Self {
        self.strategic = Some(metadata);
        self
    }

    /// Opens a watch subscription for this kind.
    pub fn watch(&self) -> tokio::sync::broadcast::Receiver<WatchEvent<K>> {
        self.watch.subscribe()
    }

    fn identifier(ctx: &RequestContext, name: &str) -> ResourceIdentifier {
        ResourceIdentifier::new(ctx.effective_namespace().unwrap_or(""), name)
    }

    fn to_wire(&self, domain: D) -> K {
        let mut wire = K::from_internal(domain);
        wire.apply_default();
        wire
    }

    fn not_found(name: &str) -> NetguardError {
        NetguardError::not_found(K::group(), K::resource(), name)
    }

    /// Fetches one object by name within the request's namespace.
    pub async fn get(&self, ctx: &RequestContext, name: &str) -> Result<K> {
        let id = Self::identifier(ctx, name);
        let domain = self.backend.get(&id).await.map_err(|err| {
            if err.is_not_found() {
                Self::not_found(name)
            } else {
                err
            }
        })?;
        Ok(self.to_wire(domain))
    }

    /// Lists objects in the request's scope, filtered by the request
    /// selectors and ordered deterministically.
    pub async fn list(&self, ctx: &RequestContext) -> Result<L> {
        let scope = ctx.scope();
        let mut domains = self.backend.list(&scope).await?;
        domains.retain(|d| {
            let meta = d.meta();
            request::labels_match(ctx.label_selector.as_ref(), &meta.labels)
                && ctx
                    .field_selector
                    .as_ref()
                    .is_none_or(|fs| fs.matches(meta.namespace(), meta.name()))
        });

        let list_version = domains
            .iter()
            .filter_map(|d| d.meta().resource_version().parse::<i64>().ok())
            .max()
            .map(|v| v.to_string());

        let mut items: Vec<K> = domains.into_iter().map(|d| self.to_wire(d)).collect();
        if let Some(sort_by) = ctx.sort_by.as_deref() {
            sort::sort_objects(&mut items, sort_by);
        }
        Ok(L::from_items(items, list_version))
    }

    /// Creates a new object; an empty name with a generateName prefix gets a
    /// unique server-assigned name.
    pub async fn create(&self, ctx: &RequestContext, mut obj: K) -> Result<K> {
        obj.apply_default();
        let meta = obj.metadata_mut();
        if meta.namespace().is_empty() {
            meta.namespace = ctx.effective_namespace().map(str::to_string);
        }
        if meta.name().is_empty() && !meta.generate_name().is_empty() {
            meta.name = Some(generate_name(meta.generate_name()));
        }

        let errors = self.validator.validate_create(&obj);
        if !errors.is_empty() {
            return Err(NetguardError::Invalid(errors));
        }

        let created = self.backend.create(obj.to_internal()).await?;
        let wire = self.to_wire(created);
        self.watch.broadcast(EventType::Added, wire.clone());
        debug!(kind = K::kind(), name = wire.metadata().name(), "created");
        Ok(wire)
    }

    /// Updates an object through the caller-supplied hook, which receives
    /// the current state. A stale resourceVersion on the result is a
    /// conflict.
    pub async fn update<F>(&self, ctx: &RequestContext, name: &str, update_fn: F) -> Result<K>
    where
        F: FnOnce(K) -> Result<K>,
    {
        let current = self.get(ctx, name).await?;
        let mut updated = update_fn(current.clone())?;
        updated.apply_default();

        let submitted = updated.metadata().resource_version();
        let stored = current.metadata().resource_version();
        if !submitted.is_empty() && submitted != stored {
            return Err(NetguardError::VersionConflict {
                expected: submitted.to_string(),
                stored: stored.to_string(),
            });
        }

        let errors = self.validator.validate_update(&updated, &current);
        if !errors.is_empty() {
            return Err(NetguardError::Invalid(errors));
        }

        let written = self.backend.update(updated.to_internal()).await?;
        let wire = self.to_wire(written);
        self.watch.broadcast(EventType::Modified, wire.clone());
        Ok(wire)
    }

    /// Deletes an object. With finalizers present the object is only marked:
    /// its deletionTimestamp is stamped and the updated object is returned
    /// with `false`; otherwise the row is removed and `true` returned.
    pub async fn delete(&self, ctx: &RequestContext, name: &str) -> Result<(K, bool)> {
        let current = self.get(ctx, name).await?;
        let errors = self.validator.validate_delete(&current);
        if !errors.is_empty() {
            return Err(NetguardError::Invalid(errors));
        }

        if !current.metadata().finalizers.is_empty() {
            let mut marked = current.clone();
            let meta = marked.metadata_mut();
            if meta.deletion_timestamp.is_none() {
                meta.deletion_timestamp = Some(crate::common::Timestamp::now());
            }
            let written = self.backend.update(marked.to_internal()).await?;
            let wire = self.to_wire(written);
            self.watch.broadcast(EventType::Modified, wire.clone());
            return Ok((wire, false));
        }

        let id = Self::identifier(ctx, name);
        self.backend.delete(&id).await?;
        self.watch.broadcast(EventType::Deleted, current.clone());
        debug!(kind = K::kind(), name, "deleted");
        Ok((current, true))
    }

    /// Patches an object. Apply patches route through the field manager;
    /// the other content types route through the patch engine. Subresource
    /// patches are not supported on base kinds.
    pub async fn patch(
        &self,
        ctx: &RequestContext,
        name: &str,
        kind: PatchKind,
        data: &[u8],
        options: &PatchOptions,
        subresources: &[&str],
    ) -> Result<K> {
        if !subresources.is_empty() {
            return Err(NetguardError::Forbidden(format!(
                "subresource patch is not supported on {}",
                K::resource()
            )));
        }

        // An Apply against a missing object creates it; every other patch
        // content type requires the object to exist.
        let (current, exists) = match self.get(ctx, name).await {
            Ok(obj) => (obj, true),
            Err(err) if err.is_not_found() && kind == PatchKind::Apply => {
                let mut fresh: K = serde_json::from_value(serde_json::Value::Object(
                    serde_json::Map::new(),
                ))
                .map_err(|e| NetguardError::Internal(format!("build fresh object: {}", e)))?;
                fresh.apply_default();
                let meta = fresh.metadata_mut();
                meta.name = Some(name.to_string());
                meta.namespace = ctx.effective_namespace().map(str::to_string);
                (fresh, false)
            }
            Err(err) => return Err(err),
        };
        let current_value = serde_json::to_value(&current)
            .map_err(|e| NetguardError::Internal(format!("serialize current object: {}", e)))?;

        let (patched_value, managed_fields) = match kind {
            PatchKind::Apply => {
                let mut meta = current.metadata().clone();
                let result = fieldmanager::apply(
                    &mut meta,
                    &current_value,
                    data,
                    &options.field_manager,
                    &K::api_version(),
                    options.force,
                    self.strategic.as_ref(),
                )?;
                (result.object, Some(meta.managed_fields))
            }
            _ => (
                patch::apply(&current_value, kind, data, self.strategic.as_ref())?,
                None,
            ),
        };

        let mut patched: K = serde_json::from_value(patched_value)
            .map_err(|e| NetguardError::Internal(format!("rebuild patched object: {}", e)))?;
        patched.apply_default();

        // identity is never patchable
        {
            let current_meta = current.metadata().clone();
            let meta = patched.metadata_mut();
            meta.name = current_meta.name;
            meta.namespace = current_meta.namespace;
            meta.uid = current_meta.uid;
            meta.resource_version = current_meta.resource_version;
            meta.creation_timestamp = current_meta.creation_timestamp;
            if let Some(managed_fields) = managed_fields {
                meta.managed_fields = managed_fields;
            }
        }

        let errors = if exists {
            self.validator.validate_update(&patched, &current)
        } else {
            self.validator.validate_create(&patched)
        };
        if !errors.is_empty() {
            return Err(NetguardError::Invalid(errors));
        }

        let written = if exists {
            self.backend.update(patched.clone().to_internal()).await?
        } else {
            self.backend.create(patched.clone().to_internal()).await?
        };
        let mut wire = self.to_wire(written);
        // ownership recorded during the merge survives the converter
        // round-trip
        fieldmanager::merge_managed_fields(
            Some(&patched.metadata().managed_fields),
            &mut wire.metadata_mut().managed_fields,
        );
        let event = if exists {
            EventType::Modified
        } else {
            EventType::Added
        };
        self.watch.broadcast(event, wire.clone());
        Ok(wire)
    }
}

/// Builds a server-assigned name: the prefix, the millisecond timestamp and
/// a random component, both in lower hex. The random component keeps
/// concurrent batches distinct.
pub fn generate_name(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random: u32 = rand::random();
    format!("{}{:x}{:08x}", prefix, millis, random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_name_has_prefix() {
        let name = generate_name("api-");
        assert!(name.starts_with("api-"));
        assert!(name.len() > "api-".len());
    }

    #[test]
    fn test_generate_name_unique_across_batch() {
        let names: HashSet<String> = (0..1000).map(|_| generate_name("api-")).collect();
        assert_eq!(names.len(), 1000);
    }
}
