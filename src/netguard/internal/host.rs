//! Host internal types.

use crate::common::ObjectMeta;
use crate::impl_has_object_meta;
use serde::{Deserialize, Serialize};

use super::reference::{NamespacedObjectReference, ObjectReference};

/// Host registers a machine under a globally unique UUID.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec identifies the machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<HostSpec>,
    /// status reflects the binding state, denormalized by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HostStatus>,
}
impl_has_object_meta!(Host);

/// HostSpec identifies the registered machine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host_name: String,
}

/// HostStatus reflects the binding state of a Host.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostStatus {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_bound: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_group_ref: Option<ObjectReference>,
}

/// HostBinding attaches a Host to an AddressGroup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostBinding {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec names the bound pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<HostBindingSpec>,
}
impl_has_object_meta!(HostBinding);

/// HostBindingSpec names the Host and the AddressGroup it joins.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostBindingSpec {
    #[serde(default)]
    pub host_ref: NamespacedObjectReference,
    #[serde(default)]
    pub address_group_ref: NamespacedObjectReference,
}
