//! [`BackendOperations`](crate::storage::BackendOperations) adapters over
//! the registry, one per kind.
//!
//! Each verb owns one transaction: writes run a sync with empty scope (no
//! pre-clean), commit on success and roll back on error.

use std::sync::Arc;

use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;
use crate::pg::writer::SyncOpts;
use crate::pg::Registry;
use crate::storage::BackendOperations;

macro_rules! impl_pg_backend {
    ($name:ident, $ty:ty, $sync:ident, $delete:ident, $get:ident, $list:ident) => {
        /// Registry-backed operations for this kind.
        pub struct $name {
            registry: Arc<Registry>,
        }

        impl $name {
            pub fn new(registry: Arc<Registry>) -> Self {
                Self { registry }
            }

            async fn write(&self, obj: $ty) -> Result<$ty> {
                let mut writer = self.registry.writer().await?;
                match writer
                    .$sync(vec![obj], &Scope::Empty, &SyncOpts::default())
                    .await
                {
                    Ok(mut items) => {
                        writer.commit().await?;
                        items.pop().ok_or_else(|| {
                            NetguardError::Internal("sync returned no items".to_string())
                        })
                    }
                    Err(err) => {
                        writer.abort().await;
                        Err(err)
                    }
                }
            }
        }

        impl BackendOperations<$ty> for $name {
            async fn get(&self, id: &ResourceIdentifier) -> Result<$ty> {
                let mut reader = self.registry.reader();
                reader.$get(id).await
            }

            async fn list(&self, scope: &Scope) -> Result<Vec<$ty>> {
                let mut reader = self.registry.reader();
                reader.$list(scope).await
            }

            async fn create(&self, obj: $ty) -> Result<$ty> {
                self.write(obj).await
            }

            async fn update(&self, obj: $ty) -> Result<$ty> {
                self.write(obj).await
            }

            async fn delete(&self, id: &ResourceIdentifier) -> Result<()> {
                let mut writer = self.registry.writer().await?;
                match writer.$delete(std::slice::from_ref(id)).await {
                    Ok(()) => writer.commit().await,
                    Err(err) => {
                        writer.abort().await;
                        Err(err)
                    }
                }
            }
        }
    };
}

impl_pg_backend!(
    ServiceBackend,
    internal::Service,
    sync_services,
    delete_services_by_ids,
    get_service_by_id,
    list_services
);
impl_pg_backend!(
    ServiceAliasBackend,
    internal::ServiceAlias,
    sync_service_aliases,
    delete_service_aliases_by_ids,
    get_service_alias_by_id,
    list_service_aliases
);
impl_pg_backend!(
    AddressGroupBackend,
    internal::AddressGroup,
    sync_address_groups,
    delete_address_groups_by_ids,
    get_address_group_by_id,
    list_address_groups
);
impl_pg_backend!(
    AddressGroupBindingBackend,
    internal::AddressGroupBinding,
    sync_address_group_bindings,
    delete_address_group_bindings_by_ids,
    get_address_group_binding_by_id,
    list_address_group_bindings
);
impl_pg_backend!(
    AddressGroupPortMappingBackend,
    internal::AddressGroupPortMapping,
    sync_address_group_port_mappings,
    delete_address_group_port_mappings_by_ids,
    get_address_group_port_mapping_by_id,
    list_address_group_port_mappings
);
impl_pg_backend!(
    AddressGroupBindingPolicyBackend,
    internal::AddressGroupBindingPolicy,
    sync_address_group_binding_policies,
    delete_address_group_binding_policies_by_ids,
    get_address_group_binding_policy_by_id,
    list_address_group_binding_policies
);
impl_pg_backend!(
    RuleS2SBackend,
    internal::RuleS2S,
    sync_rules_s2s,
    delete_rules_s2s_by_ids,
    get_rule_s2s_by_id,
    list_rules_s2s
);
impl_pg_backend!(
    IEAgAgRuleBackend,
    internal::IEAgAgRule,
    sync_ie_ag_ag_rules,
    delete_ie_ag_ag_rules_by_ids,
    get_ie_ag_ag_rule_by_id,
    list_ie_ag_ag_rules
);
impl_pg_backend!(
    NetworkBackend,
    internal::Network,
    sync_networks,
    delete_networks_by_ids,
    get_network_by_id,
    list_networks
);
impl_pg_backend!(
    NetworkBindingBackend,
    internal::NetworkBinding,
    sync_network_bindings,
    delete_network_bindings_by_ids,
    get_network_binding_by_id,
    list_network_bindings
);
impl_pg_backend!(
    HostBackend,
    internal::Host,
    sync_hosts,
    delete_hosts_by_ids,
    get_host_by_id,
    list_hosts
);
impl_pg_backend!(
    HostBindingBackend,
    internal::HostBinding,
    sync_host_bindings,
    delete_host_bindings_by_ids,
    get_host_binding_by_id,
    list_host_bindings
);
