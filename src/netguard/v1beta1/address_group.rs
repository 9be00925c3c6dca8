//! AddressGroup types from the netguard API
//!
//! An AddressGroup is a named set of networks with a default firewall action.

use crate::common::{ListMeta, ObjectMeta, TypeMeta};
use crate::{impl_resource_schema, impl_versioned_object};
use serde::{Deserialize, Serialize};

// ============================================================================
// DefaultAction
// ============================================================================

/// DefaultAction is the verdict applied to traffic not matched by any rule.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DefaultAction {
    /// Accept unmatched traffic.
    #[serde(rename = "ACCEPT")]
    Accept,
    /// Drop unmatched traffic.
    #[serde(rename = "DROP")]
    #[default]
    Drop,
}

pub mod default_action {
    pub const ACCEPT: &str = "ACCEPT";
    pub const DROP: &str = "DROP";
}

// ============================================================================
// AddressGroup
// ============================================================================

/// AddressGroup describes a named set of networks sharing a default action
/// and logging settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroup {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// spec represents the desired behavior of this AddressGroup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<AddressGroupSpec>,
}
impl_versioned_object!(AddressGroup);

/// AddressGroupList is a list of AddressGroup objects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard list metadata.
    #[serde(default)]
    pub metadata: Option<ListMeta>,
    /// Items is a list of AddressGroup objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AddressGroup>,
}

/// AddressGroupSpec provides the specification of an AddressGroup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressGroupSpec {
    /// defaultAction is the verdict for traffic not matched by any rule.
    #[serde(default)]
    pub default_action: DefaultAction,
    /// logs enables verdict logging for this group.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub logs: bool,
    /// trace enables packet tracing for this group.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trace: bool,
    /// networks are the member networks, denormalized from their bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<NetworkItem>,
}

/// NetworkItem is one denormalized member network of an AddressGroup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkItem {
    /// name is the namespaced key of the member Network.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// cidr is the member Network's CIDR, copied for fast lookup.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cidr: String,
}

impl_resource_schema!(
    AddressGroup,
    AddressGroupList,
    "netguard.sgroups.io",
    "v1beta1",
    "AddressGroup",
    "addressgroups"
);
