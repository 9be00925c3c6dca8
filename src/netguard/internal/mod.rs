//! Internal (domain) types for the netguard API group.
//!
//! The persistence engine and the backend operations work over these types;
//! the versioned types in `v1beta1` convert to and from them at the facade
//! boundary.

pub mod address_group;
pub mod binding;
pub mod host;
pub mod network;
pub mod reference;
pub mod rule;
pub mod service;

pub use address_group::{AddressGroup, AddressGroupSpec, DefaultAction, NetworkItem};
pub use binding::{
    AddressGroupBinding, AddressGroupBindingPolicy, AddressGroupBindingPolicySpec,
    AddressGroupBindingSpec, AddressGroupPortMapping, ProtocolPorts, ServicePortsRef,
};
pub use host::{Host, HostBinding, HostBindingSpec, HostSpec, HostStatus};
pub use network::{Network, NetworkBinding, NetworkBindingSpec, NetworkSpec, NetworkStatus};
pub use reference::{NamespacedObjectReference, ObjectReference};
pub use rule::{
    IEAgAgRule, IEAgAgRuleSpec, PortSpec, RuleAction, RuleS2S, RuleS2SSpec, Traffic,
    TransportProtocol,
};
pub use service::{IngressPort, Service, ServiceAlias, ServiceAliasSpec, ServiceSpec};
