//! Service and ServiceAlias internal types.

use crate::common::ObjectMeta;
use crate::impl_has_object_meta;
use serde::{Deserialize, Serialize};

use super::reference::{NamespacedObjectReference, ObjectReference};

/// Service describes a named set of ingress ports.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec represents the desired ingress surface of this Service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ServiceSpec>,
}
impl_has_object_meta!(Service);

/// ServiceSpec describes the ingress ports and bound address groups.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingress_ports: Vec<IngressPort>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_groups: Vec<NamespacedObjectReference>,
}

/// IngressPort is one (protocol, port) pair accepted by a Service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IngressPort {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub port: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// ServiceAlias is a named indirection to a Service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAlias {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec names the aliased Service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ServiceAliasSpec>,
}
impl_has_object_meta!(ServiceAlias);

/// ServiceAliasSpec names the aliased Service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAliasSpec {
    #[serde(default)]
    pub service_ref: ObjectReference,
}
