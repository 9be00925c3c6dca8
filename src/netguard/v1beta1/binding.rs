//! Binding types from the netguard API
//!
//! Bindings attach Services to AddressGroups: the binding itself, the port
//! mapping it materializes, and the policy that authorizes cross-namespace
//! bindings.

use crate::common::{ListMeta, ObjectMeta, TypeMeta};
use crate::{impl_resource_schema, impl_versioned_object};
use serde::{Deserialize, Serialize};

use super::reference::{NamespacedObjectReference, ObjectReference};

// ============================================================================
// AddressGroupBinding
// ============================================================================

/// AddressGroupBinding grants an AddressGroup access to a Service's ingress
/// ports.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBinding {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec names the bound pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<AddressGroupBindingSpec>,
}
impl_versioned_object!(AddressGroupBinding);

/// AddressGroupBindingList is a list of AddressGroupBinding objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBindingList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of AddressGroupBinding objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AddressGroupBinding>,
}

/// AddressGroupBindingSpec names the Service and the AddressGroup it binds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBindingSpec {
    /// serviceRef is the Service granted to the group.
    #[serde(default)]
    pub service_ref: ObjectReference,
    /// addressGroupRef is the AddressGroup being granted access.
    #[serde(default)]
    pub address_group_ref: NamespacedObjectReference,
}

impl_resource_schema!(
    AddressGroupBinding,
    AddressGroupBindingList,
    "netguard.sgroups.io",
    "v1beta1",
    "AddressGroupBinding",
    "addressgroupbindings"
);

// ============================================================================
// AddressGroupPortMapping
// ============================================================================

/// AddressGroupPortMapping materializes, per AddressGroup, the service ports
/// its bindings granted access to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupPortMapping {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// accessPorts lists the granted services and their ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_ports: Vec<ServicePortsRef>,
}
impl_versioned_object!(AddressGroupPortMapping);

/// AddressGroupPortMappingList is a list of AddressGroupPortMapping objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupPortMappingList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of AddressGroupPortMapping objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AddressGroupPortMapping>,
}

/// ServicePortsRef pairs a Service reference with the ports granted from it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServicePortsRef {
    /// serviceRef is the granted Service.
    #[serde(default)]
    pub service_ref: NamespacedObjectReference,
    /// ports are the granted ports grouped by protocol.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ProtocolPorts>,
}

/// ProtocolPorts is the set of granted ports for one protocol.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolPorts {
    /// protocol of the ports, TCP or UDP.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    /// ports are port numbers or dash-separated ranges, as strings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
}

impl_resource_schema!(
    AddressGroupPortMapping,
    AddressGroupPortMappingList,
    "netguard.sgroups.io",
    "v1beta1",
    "AddressGroupPortMapping",
    "addressgroupportmappings"
);

// ============================================================================
// AddressGroupBindingPolicy
// ============================================================================

/// AddressGroupBindingPolicy authorizes bindings between a Service and an
/// AddressGroup living in different namespaces.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBindingPolicy {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec names the authorized pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<AddressGroupBindingPolicySpec>,
}
impl_versioned_object!(AddressGroupBindingPolicy);

/// AddressGroupBindingPolicyList is a list of AddressGroupBindingPolicy objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBindingPolicyList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of AddressGroupBindingPolicy objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AddressGroupBindingPolicy>,
}

/// AddressGroupBindingPolicySpec names the Service and AddressGroup pair the
/// policy authorizes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupBindingPolicySpec {
    /// serviceRef is the Service side of the authorized pair.
    #[serde(default)]
    pub service_ref: NamespacedObjectReference,
    /// addressGroupRef is the AddressGroup side of the authorized pair.
    #[serde(default)]
    pub address_group_ref: NamespacedObjectReference,
}

impl_resource_schema!(
    AddressGroupBindingPolicy,
    AddressGroupBindingPolicyList,
    "netguard.sgroups.io",
    "v1beta1",
    "AddressGroupBindingPolicy",
    "addressgroupbindingpolicies"
);

#[cfg(test)]
mod tests {}
