//! Rule types from the netguard API
//!
//! RuleS2S declares traffic between two services through their aliases;
//! IEAgAgRule is the generated ingress/egress rule between two address
//! groups it compiles down to.

use crate::common::{ListMeta, ObjectMeta, TypeMeta};
use crate::{impl_resource_schema, impl_versioned_object};
use serde::{Deserialize, Serialize};

use super::reference::NamespacedObjectReference;

// ============================================================================
// Traffic / Transport / RuleAction
// ============================================================================

/// Traffic is the direction a rule applies to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Traffic {
    /// The rule applies to incoming traffic.
    #[serde(rename = "INGRESS")]
    #[default]
    Ingress,
    /// The rule applies to outgoing traffic.
    #[serde(rename = "EGRESS")]
    Egress,
}

pub mod traffic {
    pub const INGRESS: &str = "INGRESS";
    pub const EGRESS: &str = "EGRESS";
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

pub mod transport_protocol {
    pub const TCP: &str = "TCP";
    pub const UDP: &str = "UDP";
}

/// RuleAction is the verdict a matching rule applies.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RuleAction {
    /// Accept matching traffic.
    #[serde(rename = "ACCEPT")]
    #[default]
    Accept,
    /// Drop matching traffic.
    #[serde(rename = "DROP")]
    Drop,
}

// ============================================================================
// RuleS2S
// ============================================================================

/// RuleS2S declares allowed traffic from one service to another. Both ends
/// are referenced through ServiceAlias objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleS2S {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec represents the desired traffic declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<RuleS2SSpec>,
}
impl_versioned_object!(RuleS2S);

/// RuleS2SList is a list of RuleS2S objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleS2SList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of RuleS2S objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RuleS2S>,
}

/// RuleS2SSpec provides the specification of a RuleS2S.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleS2SSpec {
    /// traffic is the direction of the declared flow.
    #[serde(default)]
    pub traffic: Traffic,
    /// serviceLocalRef is the alias of the service on the local side.
    /// Must reference a ServiceAlias.
    #[serde(default)]
    pub service_local_ref: NamespacedObjectReference,
    /// serviceRef is the alias of the service on the remote side.
    /// Must reference a ServiceAlias.
    #[serde(default)]
    pub service_ref: NamespacedObjectReference,
    /// ieAgAgRuleRefs are the generated IEAgAgRule objects this rule
    /// compiled down to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ie_ag_ag_rule_refs: Vec<NamespacedObjectReference>,
    /// trace enables packet tracing for the generated rules.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trace: bool,
}

impl_resource_schema!(
    RuleS2S,
    RuleS2SList,
    "netguard.sgroups.io",
    "v1beta1",
    "RuleS2S",
    "rules2s"
);

// ============================================================================
// IEAgAgRule
// ============================================================================

/// IEAgAgRule is a generated ingress/egress rule between two address groups.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IEAgAgRule {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec represents the generated rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<IEAgAgRuleSpec>,
}
impl_versioned_object!(IEAgAgRule);

/// IEAgAgRuleList is a list of IEAgAgRule objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IEAgAgRuleList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of IEAgAgRule objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<IEAgAgRule>,
}

/// IEAgAgRuleSpec provides the specification of an IEAgAgRule.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IEAgAgRuleSpec {
    /// transport is the matched transport protocol.
    #[serde(default)]
    pub transport: TransportProtocol,
    /// traffic is the direction of the rule.
    #[serde(default)]
    pub traffic: Traffic,
    /// addressGroupLocal is the local side of the rule.
    #[serde(default)]
    pub address_group_local: NamespacedObjectReference,
    /// addressGroup is the remote side of the rule.
    #[serde(default)]
    pub address_group: NamespacedObjectReference,
    /// ports are the matched port specs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortSpec>,
    /// action is the verdict for matching traffic.
    #[serde(default)]
    pub action: RuleAction,
    /// trace enables packet tracing for this rule.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trace: bool,
}

/// PortSpec is one matched (source, destination) port pair; either side may
/// be empty to match any port.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    /// source port or range, empty for any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// destination port or range, empty for any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub destination: String,
}

impl_resource_schema!(
    IEAgAgRule,
    IEAgAgRuleList,
    "netguard.sgroups.io",
    "v1beta1",
    "IEAgAgRule",
    "ieagagrules"
);

#[cfg(test)]
mod tests {}
