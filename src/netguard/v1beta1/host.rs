//! Host types from the netguard API
//!
//! A Host registers a machine by UUID; a HostBinding attaches it to an
//! AddressGroup. UUIDs are globally unique and a host is bound to at most
//! one group.

use crate::common::{ListMeta, ObjectMeta, TypeMeta};
use crate::{impl_resource_schema, impl_versioned_object};
use serde::{Deserialize, Serialize};

use super::reference::{NamespacedObjectReference, ObjectReference};

// ============================================================================
// Host
// ============================================================================

/// Host registers a machine under a globally unique UUID.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec identifies the machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<HostSpec>,
    /// status reflects the binding state, denormalized by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HostStatus>,
}
impl_versioned_object!(Host);

/// HostList is a list of Host objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of Host objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Host>,
}

/// HostSpec identifies the registered machine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostSpec {
    /// uuid is the machine identity, globally unique across namespaces.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    /// hostName is the machine's reported hostname.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host_name: String,
}

/// HostStatus reflects the binding state of a Host.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostStatus {
    /// isBound is true while a HostBinding references this host.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_bound: bool,
    /// addressGroupRef names the AddressGroup this host was bound into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_group_ref: Option<ObjectReference>,
}

impl_resource_schema!(
    Host,
    HostList,
    "netguard.sgroups.io",
    "v1beta1",
    "Host",
    "hosts"
);

// ============================================================================
// HostBinding
// ============================================================================

/// HostBinding attaches a Host to an AddressGroup. A host may be bound to at
/// most one group.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostBinding {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec names the bound pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<HostBindingSpec>,
}
impl_versioned_object!(HostBinding);

/// HostBindingList is a list of HostBinding objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostBindingList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of HostBinding objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<HostBinding>,
}

/// HostBindingSpec names the Host and the AddressGroup it joins.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostBindingSpec {
    /// hostRef is the bound Host.
    #[serde(default)]
    pub host_ref: NamespacedObjectReference,
    /// addressGroupRef is the AddressGroup the host joins.
    #[serde(default)]
    pub address_group_ref: NamespacedObjectReference,
}

impl_resource_schema!(
    HostBinding,
    HostBindingList,
    "netguard.sgroups.io",
    "v1beta1",
    "HostBinding",
    "hostbindings"
);

#[cfg(test)]
mod tests {}
