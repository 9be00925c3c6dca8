//! netguard.sgroups.io/v1beta1 versioned (wire) types.

pub mod address_group;
pub mod binding;
pub mod conversion;
pub mod host;
pub mod network;
pub mod reference;
pub mod rule;
#[cfg(test)]
mod serde_roundtrip_tests;
pub mod service;
pub mod validation;

pub use address_group::{
    AddressGroup, AddressGroupList, AddressGroupSpec, DefaultAction, NetworkItem,
};
pub use binding::{
    AddressGroupBinding, AddressGroupBindingList, AddressGroupBindingPolicy,
    AddressGroupBindingPolicyList, AddressGroupBindingPolicySpec, AddressGroupBindingSpec,
    AddressGroupPortMapping, AddressGroupPortMappingList, ProtocolPorts, ServicePortsRef,
};
pub use host::{Host, HostBinding, HostBindingList, HostBindingSpec, HostList, HostSpec, HostStatus};
pub use network::{
    Network, NetworkBinding, NetworkBindingList, NetworkBindingSpec, NetworkList, NetworkSpec,
    NetworkStatus,
};
pub use reference::{NamespacedObjectReference, ObjectReference};
pub use rule::{
    IEAgAgRule, IEAgAgRuleList, IEAgAgRuleSpec, PortSpec, RuleAction, RuleS2S, RuleS2SList,
    RuleS2SSpec, Traffic, TransportProtocol,
};
pub use service::{
    IngressPort, Service, ServiceAlias, ServiceAliasList, ServiceAliasSpec, ServiceList,
    ServiceSpec,
};
