//! Service and ServiceAlias types from the netguard API
//!
//! A Service names a set of ingress ports exposed to bound address groups;
//! a ServiceAlias is an indirection other namespaces reference instead of
//! the Service itself.

use crate::common::{ListMeta, ObjectMeta, TypeMeta};
use crate::{impl_resource_schema, impl_versioned_object};
use serde::{Deserialize, Serialize};

use super::reference::{NamespacedObjectReference, ObjectReference};

// ============================================================================
// Service
// ============================================================================

/// Service describes a named set of ingress ports that address groups can be
/// granted access to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec represents the desired ingress surface of this Service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ServiceSpec>,
}
impl_versioned_object!(Service);

/// ServiceList is a list of Service objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of Service objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Service>,
}

/// ServiceSpec describes the ingress ports of a Service and the address
/// groups currently bound to it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// description is a free-form operator note.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// ingressPorts lists the ports the service accepts traffic on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingress_ports: Vec<IngressPort>,
    /// addressGroups are the address groups bound to this service,
    /// denormalized from the bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_groups: Vec<NamespacedObjectReference>,
}

/// IngressPort is one (protocol, port) pair accepted by a Service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IngressPort {
    /// protocol of the port, TCP or UDP.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    /// port number or dash-separated range, as a string.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub port: String,
    /// description is a free-form operator note.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl_resource_schema!(
    Service,
    ServiceList,
    "netguard.sgroups.io",
    "v1beta1",
    "Service",
    "services"
);

// ============================================================================
// ServiceAlias
// ============================================================================

/// ServiceAlias is a named indirection to a Service; cross-service rules
/// reference aliases rather than services.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAlias {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec names the aliased Service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ServiceAliasSpec>,
}
impl_versioned_object!(ServiceAlias);

/// ServiceAliasList is a list of ServiceAlias objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAliasList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of ServiceAlias objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ServiceAlias>,
}

/// ServiceAliasSpec names the aliased Service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAliasSpec {
    /// serviceRef is the Service this alias stands for.
    #[serde(default)]
    pub service_ref: ObjectReference,
}

impl_resource_schema!(
    ServiceAlias,
    ServiceAliasList,
    "netguard.sgroups.io",
    "v1beta1",
    "ServiceAlias",
    "servicealiases"
);
