//! AddressGroup internal types.

use crate::common::ObjectMeta;
use crate::impl_has_object_meta;
use serde::{Deserialize, Serialize};

/// DefaultAction is the verdict applied to unmatched traffic.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DefaultAction {
    #[serde(rename = "ACCEPT")]
    Accept,
    #[serde(rename = "DROP")]
    #[default]
    Drop,
}

/// AddressGroup describes a named set of networks sharing a default action.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroup {
    /// Standard object's metadata.
    pub metadata: ObjectMeta,
    /// spec represents the desired behavior of this AddressGroup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<AddressGroupSpec>,
}
impl_has_object_meta!(AddressGroup);

/// AddressGroupSpec provides the specification of an AddressGroup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupSpec {
    #[serde(default)]
    pub default_action: DefaultAction,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub logs: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trace: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<NetworkItem>,
}

/// NetworkItem is one denormalized member network of an AddressGroup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cidr: String,
}
