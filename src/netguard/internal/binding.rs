//! Binding internal types.

use crate::common::ObjectMeta;
use crate::impl_has_object_meta;
use serde::{Deserialize, Serialize};

use super::reference::{NamespacedObjectReference, ObjectReference};

/// AddressGroupBinding grants an AddressGroup access to a Service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBinding {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec names the bound pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<AddressGroupBindingSpec>,
}
impl_has_object_meta!(AddressGroupBinding);

/// AddressGroupBindingSpec names the Service and the AddressGroup it binds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBindingSpec {
    #[serde(default)]
    pub service_ref: ObjectReference,
    #[serde(default)]
    pub address_group_ref: NamespacedObjectReference,
}

/// AddressGroupPortMapping materializes the ports granted per AddressGroup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupPortMapping {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// accessPorts lists the granted services and their ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_ports: Vec<ServicePortsRef>,
}
impl_has_object_meta!(AddressGroupPortMapping);

/// ServicePortsRef pairs a Service reference with the ports granted from it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServicePortsRef {
    #[serde(default)]
    pub service_ref: NamespacedObjectReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ProtocolPorts>,
}

/// ProtocolPorts is the set of granted ports for one protocol.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolPorts {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
}

/// AddressGroupBindingPolicy authorizes cross-namespace bindings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBindingPolicy {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec names the authorized pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<AddressGroupBindingPolicySpec>,
}
impl_has_object_meta!(AddressGroupBindingPolicy);

/// AddressGroupBindingPolicySpec names the authorized pair.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBindingPolicySpec {
    #[serde(default)]
    pub service_ref: NamespacedObjectReference,
    #[serde(default)]
    pub address_group_ref: NamespacedObjectReference,
}
