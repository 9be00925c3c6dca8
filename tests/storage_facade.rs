//! End-to-end storage facade tests over an in-memory backend.
//!
//! The backend double mirrors the persistence engine's upsert semantics:
//! uid adoption, generation advancement and monotonic version minting.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use netguard_backend::common::{HasObjectMeta, VersionedObject};
use netguard_backend::errors::Result;
use netguard_backend::netguard::internal;
use netguard_backend::netguard::v1beta1;
use netguard_backend::storage::validators::ServiceValidator;
use netguard_backend::storage::{BackendOperations, EventType, ResourceStorage};
use netguard_backend::{NetguardError, PatchKind, PatchOptions, RequestContext};
use netguard_backend::{ResourceIdentifier, Scope};

#[derive(Default)]
struct MemBackend {
    store: Mutex<BTreeMap<ResourceIdentifier, internal::Service>>,
    version: AtomicI64,
}

impl MemBackend {
    fn write(&self, mut obj: internal::Service) -> internal::Service {
        let id = obj.identifier();
        let mut store = self.store.lock().unwrap();
        match store.get(&id) {
            Some(existing) => {
                if obj.meta().uid().is_empty() {
                    obj.meta_mut().uid = existing.meta().uid.clone();
                }
                obj.meta_mut().generation = Some(existing.meta().generation() + 1);
            }
            None => {
                if obj.meta().uid().is_empty() {
                    obj.meta_mut().touch_on_create();
                }
            }
        }
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        obj.meta_mut().touch_on_write(version);
        store.insert(id, obj.clone());
        obj
    }

    fn not_found(id: &ResourceIdentifier) -> NetguardError {
        NetguardError::not_found("netguard.sgroups.io", "services", &id.name)
    }
}

impl BackendOperations<internal::Service> for MemBackend {
    async fn get(&self, id: &ResourceIdentifier) -> Result<internal::Service> {
        self.store
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list(&self, scope: &Scope) -> Result<Vec<internal::Service>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|obj| scope.is_empty() || scope.matches(&obj.identifier()))
            .cloned()
            .collect())
    }

    async fn create(&self, obj: internal::Service) -> Result<internal::Service> {
        Ok(self.write(obj))
    }

    async fn update(&self, obj: internal::Service) -> Result<internal::Service> {
        Ok(self.write(obj))
    }

    async fn delete(&self, id: &ResourceIdentifier) -> Result<()> {
        self.store
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}

type ServiceStorage =
    ResourceStorage<v1beta1::Service, internal::Service, MemBackend, ServiceValidator, v1beta1::ServiceList>;

fn storage() -> ServiceStorage {
    ResourceStorage::new(MemBackend::default(), ServiceValidator)
}

fn ctx() -> RequestContext {
    RequestContext::namespaced("app")
}

fn service(name: &str, description: &str) -> v1beta1::Service {
    v1beta1::Service {
        type_meta: Default::default(),
        metadata: Some(netguard_backend::ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("app".to_string()),
            ..Default::default()
        }),
        spec: Some(v1beta1::ServiceSpec {
            description: description.to_string(),
            ingress_ports: vec![],
            address_groups: vec![],
        }),
    }
}

fn owned_fields(obj: &v1beta1::Service, manager: &str) -> Vec<String> {
    obj.metadata()
        .managed_fields
        .iter()
        .find(|e| e.manager.as_deref() == Some(manager))
        .and_then(|e| e.fields_v1.as_ref())
        .map(|f| {
            netguard_backend::fieldmanager::flatten(f)
                .into_iter()
                .collect()
        })
        .unwrap_or_default()
}

const APPLY_S1: &str = r#"{
    "apiVersion": "netguard.sgroups.io/v1beta1",
    "kind": "Service",
    "metadata": {"namespace": "app", "name": "api"},
    "spec": {"description": "d1", "ingressPorts": [{"protocol": "TCP", "port": "8080"}]}
}"#;

#[tokio::test]
async fn test_apply_creates_object_with_ownership() {
    let storage = storage();
    let applied = storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Apply,
            APPLY_S1.as_bytes(),
            &PatchOptions {
                field_manager: "kubectl".to_string(),
                force: false,
            },
            &[],
        )
        .await
        .unwrap();

    let meta = applied.metadata();
    assert!(!meta.uid().is_empty());
    assert_eq!(meta.generation(), 1);
    assert_eq!(applied.spec.as_ref().unwrap().description, "d1");

    let entry = &meta.managed_fields[0];
    assert_eq!(entry.manager.as_deref(), Some("kubectl"));
    assert_eq!(entry.operation.as_deref(), Some("Apply"));
    let owned = owned_fields(&applied, "kubectl");
    assert!(owned.contains(&"spec.description".to_string()));
    assert!(owned.contains(&"spec.ingressPorts".to_string()));
}

#[tokio::test]
async fn test_conflicting_apply_fails_and_preserves_state() {
    let storage = storage();
    storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Apply,
            APPLY_S1.as_bytes(),
            &PatchOptions {
                field_manager: "kubectl".to_string(),
                force: false,
            },
            &[],
        )
        .await
        .unwrap();

    let err = storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Apply,
            br#"{"spec": {"description": "d2"}}"#,
            &PatchOptions {
                field_manager: "controller".to_string(),
                force: false,
            },
            &[],
        )
        .await
        .unwrap_err();

    match err {
        NetguardError::PatchConflicts { conflicts } => {
            assert!(
                conflicts
                    .iter()
                    .any(|c| c.manager == "kubectl" && c.field == "spec.description")
            );
        }
        other => panic!("expected PatchConflicts, got {:?}", other),
    }

    let stored = storage.get(&ctx(), "api").await.unwrap();
    assert_eq!(stored.spec.as_ref().unwrap().description, "d1");
}

#[tokio::test]
async fn test_forced_apply_reassigns_ownership() {
    let storage = storage();
    storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Apply,
            APPLY_S1.as_bytes(),
            &PatchOptions {
                field_manager: "kubectl".to_string(),
                force: false,
            },
            &[],
        )
        .await
        .unwrap();

    let forced = storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Apply,
            br#"{"spec": {"description": "d2"}}"#,
            &PatchOptions {
                field_manager: "controller".to_string(),
                force: true,
            },
            &[],
        )
        .await
        .unwrap();

    assert_eq!(forced.spec.as_ref().unwrap().description, "d2");
    let kubectl = owned_fields(&forced, "kubectl");
    let controller = owned_fields(&forced, "controller");
    assert!(!kubectl.contains(&"spec.description".to_string()));
    assert!(kubectl.contains(&"spec.ingressPorts".to_string()));
    assert!(controller.contains(&"spec.description".to_string()));
}

#[tokio::test]
async fn test_non_apply_patch_on_missing_object_is_not_found() {
    let storage = storage();
    for kind in [PatchKind::Json, PatchKind::Merge, PatchKind::StrategicMerge] {
        let err = storage
            .patch(
                &ctx(),
                "ghost",
                kind,
                br#"{"spec": {"description": "x"}}"#,
                &PatchOptions::default(),
                &[],
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "expected NotFound for {:?}", kind);
    }
}

#[tokio::test]
async fn test_strategic_without_metadata_equals_merge_patch() {
    let storage = storage();
    storage.create(&ctx(), service("api", "d1")).await.unwrap();
    let patch = br#"{"spec": {"description": "d2"}}"#;

    let strategic = storage
        .patch(
            &ctx(),
            "api",
            PatchKind::StrategicMerge,
            patch,
            &PatchOptions::default(),
            &[],
        )
        .await
        .unwrap();
    let merged = storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Merge,
            patch,
            &PatchOptions::default(),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(strategic.spec, merged.spec);
}

#[tokio::test]
async fn test_json_patch_routes_through_engine() {
    let storage = storage();
    storage.create(&ctx(), service("api", "d1")).await.unwrap();
    let patched = storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Json,
            br#"[{"op": "replace", "path": "/spec/description", "value": "patched"}]"#,
            &PatchOptions::default(),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(patched.spec.as_ref().unwrap().description, "patched");
}

#[tokio::test]
async fn test_subresource_patch_forbidden() {
    let storage = storage();
    storage.create(&ctx(), service("api", "d1")).await.unwrap();
    let err = storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Merge,
            b"{}",
            &PatchOptions::default(),
            &["status"],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NetguardError::Forbidden(_)));
}

#[tokio::test]
async fn test_create_with_generate_name() {
    let storage = storage();
    let mut obj = service("", "d1");
    obj.metadata.as_mut().unwrap().name = None;
    obj.metadata.as_mut().unwrap().generate_name = Some("api-".to_string());

    let created = storage.create(&ctx(), obj).await.unwrap();
    let name = created.metadata().name().to_string();
    assert!(name.starts_with("api-"));
    assert!(name.len() > "api-".len());
}

#[tokio::test]
async fn test_concurrent_generate_name_creates_are_distinct() {
    let storage = std::sync::Arc::new(storage());
    let mut handles = Vec::new();
    for _ in 0..1000 {
        let storage = std::sync::Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            let mut obj = service("", "d");
            obj.metadata.as_mut().unwrap().name = None;
            obj.metadata.as_mut().unwrap().generate_name = Some("api-".to_string());
            storage
                .create(&RequestContext::namespaced("app"), obj)
                .await
                .unwrap()
                .metadata()
                .name()
                .to_string()
        }));
    }
    let mut names = std::collections::HashSet::new();
    for handle in handles {
        names.insert(handle.await.unwrap());
    }
    assert_eq!(names.len(), 1000);
}

#[tokio::test]
async fn test_uid_stable_and_versions_monotonic() {
    let storage = storage();
    let created = storage.create(&ctx(), service("api", "d1")).await.unwrap();
    let uid = created.metadata().uid().to_string();
    let v1: i64 = created.metadata().resource_version().parse().unwrap();

    let updated = storage
        .update(&ctx(), "api", |mut current| {
            current.spec.as_mut().unwrap().description = "d2".to_string();
            Ok(current)
        })
        .await
        .unwrap();
    let v2: i64 = updated.metadata().resource_version().parse().unwrap();
    assert_eq!(updated.metadata().uid(), uid);
    assert!(v2 > v1);
    assert_eq!(updated.metadata().generation(), 2);
}

#[tokio::test]
async fn test_stale_resource_version_conflicts() {
    let storage = storage();
    storage.create(&ctx(), service("api", "d1")).await.unwrap();
    let err = storage
        .update(&ctx(), "api", |mut current| {
            current.metadata_mut().resource_version = Some("999999".to_string());
            Ok(current)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, NetguardError::VersionConflict { .. }));
}

#[tokio::test]
async fn test_delete_with_finalizers_marks_instead_of_removing() {
    let storage = storage();
    let mut obj = service("api", "d1");
    obj.metadata.as_mut().unwrap().finalizers = vec!["netguard.sgroups.io/cleanup".to_string()];
    storage.create(&ctx(), obj).await.unwrap();

    let (marked, removed) = storage.delete(&ctx(), "api").await.unwrap();
    assert!(!removed);
    assert!(marked.metadata().deletion_timestamp.is_some());
    assert!(storage.get(&ctx(), "api").await.is_ok());
}

#[tokio::test]
async fn test_delete_broadcasts_and_removes() {
    let storage = storage();
    storage.create(&ctx(), service("api", "d1")).await.unwrap();
    let mut watch = storage.watch();

    let (_, removed) = storage.delete(&ctx(), "api").await.unwrap();
    assert!(removed);
    assert!(storage.get(&ctx(), "api").await.unwrap_err().is_not_found());

    let event = watch.recv().await.unwrap();
    assert_eq!(event.event_type, EventType::Deleted);
}

#[tokio::test]
async fn test_list_scope_selectors_and_sorting() {
    let storage = storage();
    let mut labeled = service("api", "bbb");
    labeled
        .metadata
        .as_mut()
        .unwrap()
        .labels
        .insert("tier".to_string(), "front".to_string());
    storage.create(&ctx(), labeled).await.unwrap();
    storage.create(&ctx(), service("db", "aaa")).await.unwrap();
    storage
        .create(&RequestContext::namespaced("other"), service("x", "zzz"))
        .await
        .unwrap();

    // namespace scope
    let list = storage.list(&ctx()).await.unwrap();
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].metadata().name(), "api");

    // sortBy a spec field
    let mut sorted_ctx = ctx();
    sorted_ctx.sort_by = Some("spec.description".to_string());
    let list = storage.list(&sorted_ctx).await.unwrap();
    assert_eq!(list.items[0].metadata().name(), "db");

    // label selector
    let mut selector_ctx = ctx();
    let mut selector = netguard_backend::LabelSelector::default();
    selector
        .match_labels
        .insert("tier".to_string(), "front".to_string());
    selector_ctx.label_selector = Some(selector);
    let list = storage.list(&selector_ctx).await.unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].metadata().name(), "api");

    // field selector
    let mut field_ctx = ctx();
    field_ctx.field_selector =
        Some(netguard_backend::storage::FieldSelector::parse("metadata.name=db").unwrap());
    let list = storage.list(&field_ctx).await.unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].metadata().name(), "db");

    // list carries the newest resource version
    let all = storage.list(&RequestContext::default()).await.unwrap();
    assert_eq!(all.items.len(), 3);
    let newest: i64 = all
        .items
        .iter()
        .map(|i| i.metadata().resource_version().parse::<i64>().unwrap())
        .max()
        .unwrap();
    assert_eq!(
        all.metadata.unwrap().resource_version.as_deref(),
        Some(newest.to_string().as_str())
    );
}

#[tokio::test]
async fn test_watch_sees_create_and_patch() {
    let storage = storage();
    let mut watch = storage.watch();

    storage.create(&ctx(), service("api", "d1")).await.unwrap();
    storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Merge,
            br#"{"spec": {"description": "d2"}}"#,
            &PatchOptions::default(),
            &[],
        )
        .await
        .unwrap();

    let first = watch.recv().await.unwrap();
    assert_eq!(first.event_type, EventType::Added);
    let second = watch.recv().await.unwrap();
    assert_eq!(second.event_type, EventType::Modified);
    assert_eq!(second.object.spec.as_ref().unwrap().description, "d2");
}

#[tokio::test]
async fn test_validation_failure_rejects_create() {
    let storage = storage();
    let mut obj = service("Bad Name", "d1");
    obj.metadata.as_mut().unwrap().name = Some("Bad Name".to_string());
    let err = storage.create(&ctx(), obj).await.unwrap_err();
    assert!(matches!(err, NetguardError::Invalid(_)));
}

#[tokio::test]
async fn test_managed_fields_survive_converter_roundtrip() {
    let storage = storage();
    let applied = storage
        .patch(
            &ctx(),
            "api",
            PatchKind::Apply,
            APPLY_S1.as_bytes(),
            &PatchOptions {
                field_manager: "kubectl".to_string(),
                force: false,
            },
            &[],
        )
        .await
        .unwrap();
    assert_eq!(applied.metadata().managed_fields.len(), 1);

    // a later read returns the persisted entries untouched
    let fetched = storage.get(&ctx(), "api").await.unwrap();
    assert_eq!(fetched.metadata().managed_fields.len(), 1);
    assert_eq!(
        fetched.metadata().managed_fields[0].manager.as_deref(),
        Some("kubectl")
    );
}
