//! Rule internal types.

use crate::common::ObjectMeta;
use crate::impl_has_object_meta;
use serde::{Deserialize, Serialize};

use super::reference::NamespacedObjectReference;

/// Traffic is the direction a rule applies to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Traffic {
    #[serde(rename = "INGRESS")]
    #[default]
    Ingress,
    #[serde(rename = "EGRESS")]
    Egress,
}

/// TransportProtocol is the transport a rule matches.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransportProtocol {
    #[serde(rename = "TCP")]
    #[default]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
}

/// RuleAction is the verdict a matching rule applies.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RuleAction {
    #[serde(rename = "ACCEPT")]
    #[default]
    Accept,
    #[serde(rename = "DROP")]
    Drop,
}

/// RuleS2S declares allowed traffic from one service to another.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleS2S {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec represents the desired traffic declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<RuleS2SSpec>,
}
impl_has_object_meta!(RuleS2S);

/// RuleS2SSpec provides the specification of a RuleS2S.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleS2SSpec {
    #[serde(default)]
    pub traffic: Traffic,
    #[serde(default)]
    pub service_local_ref: NamespacedObjectReference,
    #[serde(default)]
    pub service_ref: NamespacedObjectReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ie_ag_ag_rule_refs: Vec<NamespacedObjectReference>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trace: bool,
}

/// IEAgAgRule is a generated ingress/egress rule between two address groups.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IEAgAgRule {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec represents the generated rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<IEAgAgRuleSpec>,
}
impl_has_object_meta!(IEAgAgRule);

/// IEAgAgRuleSpec provides the specification of an IEAgAgRule.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IEAgAgRuleSpec {
    #[serde(default)]
    pub transport: TransportProtocol,
    #[serde(default)]
    pub traffic: Traffic,
    #[serde(default)]
    pub address_group_local: NamespacedObjectReference,
    #[serde(default)]
    pub address_group: NamespacedObjectReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortSpec>,
    #[serde(default)]
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trace: bool,
}

/// PortSpec is one matched (source, destination) port pair.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub destination: String,
}
