//! Network internal types.

use crate::common::ObjectMeta;
use crate::impl_has_object_meta;
use serde::{Deserialize, Serialize};

use super::reference::ObjectReference;

/// Network registers a CIDR, globally unique across namespaces.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec carries the registered CIDR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<NetworkSpec>,
    /// status reflects the binding state, denormalized by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NetworkStatus>,
}
impl_has_object_meta!(Network);

/// NetworkSpec provides the specification of a Network.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cidr: String,
}

/// NetworkStatus reflects the binding state of a Network.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_bound: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_ref: Option<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_group_ref: Option<ObjectReference>,
}

/// NetworkBinding attaches a Network to an AddressGroup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBinding {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec names the bound pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<NetworkBindingSpec>,
}
impl_has_object_meta!(NetworkBinding);

/// NetworkBindingSpec names the Network and the AddressGroup it joins.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBindingSpec {
    #[serde(default)]
    pub network_ref: ObjectReference,
    #[serde(default)]
    pub address_group_ref: ObjectReference,
}
