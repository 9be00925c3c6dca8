//! Network types from the netguard API
//!
//! A Network is a CIDR registered with the system; a NetworkBinding attaches
//! it to an AddressGroup.

use crate::common::{ListMeta, ObjectMeta, TypeMeta};
use crate::{impl_resource_schema, impl_versioned_object};
use serde::{Deserialize, Serialize};

use super::reference::ObjectReference;

// ============================================================================
// Network
// ============================================================================

/// Network registers a CIDR. CIDRs are globally unique across namespaces.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec carries the registered CIDR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<NetworkSpec>,
    /// status reflects the binding state, denormalized by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NetworkStatus>,
}
impl_versioned_object!(Network);

/// NetworkList is a list of Network objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of Network objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Network>,
}

/// NetworkSpec provides the specification of a Network.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// cidr is the registered block, e.g. "10.0.0.0/24".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cidr: String,
}

/// NetworkStatus reflects the binding state of a Network.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    /// isBound is true while a NetworkBinding references this network.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_bound: bool,
    /// bindingRef names the binding that bound this network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_ref: Option<ObjectReference>,
    /// addressGroupRef names the AddressGroup this network was bound into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_group_ref: Option<ObjectReference>,
}

impl_resource_schema!(
    Network,
    NetworkList,
    "netguard.sgroups.io",
    "v1beta1",
    "Network",
    "networks"
);

// ============================================================================
// NetworkBinding
// ============================================================================

/// NetworkBinding attaches a Network to an AddressGroup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBinding {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec names the bound pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<NetworkBindingSpec>,
}
impl_versioned_object!(NetworkBinding);

/// NetworkBindingList is a list of NetworkBinding objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBindingList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of NetworkBinding objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NetworkBinding>,
}

/// NetworkBindingSpec names the Network and the AddressGroup it joins.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBindingSpec {
    /// networkRef is the bound Network.
    #[serde(default)]
    pub network_ref: ObjectReference,
    /// addressGroupRef is the AddressGroup the network joins.
    #[serde(default)]
    pub address_group_ref: ObjectReference,
}

impl_resource_schema!(
    NetworkBinding,
    NetworkBindingList,
    "netguard.sgroups.io",
    "v1beta1",
    "NetworkBinding",
    "networkbindings"
);
