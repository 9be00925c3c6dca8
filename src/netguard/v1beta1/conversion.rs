//! Conversions between netguard v1beta1 and internal types
//!
//! The facade normalizes incoming versioned objects to the internal form the
//! persistence engine works over, and versions internal objects back on the
//! way out.

use crate::common::{FromInternal, ObjectMeta, ToInternal};
use crate::netguard::internal;
use crate::netguard::v1beta1::{
    address_group, binding, host, network, reference, rule, service,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn is_empty_object_meta(meta: &ObjectMeta) -> bool {
    meta == &ObjectMeta::default()
}

fn meta_to_option_object_meta(meta: ObjectMeta) -> Option<ObjectMeta> {
    if is_empty_object_meta(&meta) {
        None
    } else {
        Some(meta)
    }
}

fn convert_ref_v1beta1_to_internal(r: reference::ObjectReference) -> internal::ObjectReference {
    internal::ObjectReference {
        api_version: r.api_version,
        kind: r.kind,
        name: r.name,
    }
}

fn convert_ref_internal_to_v1beta1(r: internal::ObjectReference) -> reference::ObjectReference {
    reference::ObjectReference {
        api_version: r.api_version,
        kind: r.kind,
        name: r.name,
    }
}

fn convert_ns_ref_v1beta1_to_internal(
    r: reference::NamespacedObjectReference,
) -> internal::NamespacedObjectReference {
    internal::NamespacedObjectReference {
        api_version: r.api_version,
        kind: r.kind,
        name: r.name,
        namespace: r.namespace,
    }
}

fn convert_ns_ref_internal_to_v1beta1(
    r: internal::NamespacedObjectReference,
) -> reference::NamespacedObjectReference {
    reference::NamespacedObjectReference {
        api_version: r.api_version,
        kind: r.kind,
        name: r.name,
        namespace: r.namespace,
    }
}

// ============================================================================
// Service
// ============================================================================

fn convert_service_spec_v1beta1_to_internal(
    spec: service::ServiceSpec,
) -> internal::service::ServiceSpec {
    internal::service::ServiceSpec {
        description: spec.description,
        ingress_ports: spec
            .ingress_ports
            .into_iter()
            .map(|p| internal::service::IngressPort {
                protocol: p.protocol,
                port: p.port,
                description: p.description,
            })
            .collect(),
        address_groups: spec
            .address_groups
            .into_iter()
            .map(convert_ns_ref_v1beta1_to_internal)
            .collect(),
    }
}

fn convert_service_spec_internal_to_v1beta1(
    spec: internal::service::ServiceSpec,
) -> service::ServiceSpec {
    service::ServiceSpec {
        description: spec.description,
        ingress_ports: spec
            .ingress_ports
            .into_iter()
            .map(|p| service::IngressPort {
                protocol: p.protocol,
                port: p.port,
                description: p.description,
            })
            .collect(),
        address_groups: spec
            .address_groups
            .into_iter()
            .map(convert_ns_ref_internal_to_v1beta1)
            .collect(),
    }
}

impl ToInternal<internal::Service> for service::Service {
    fn to_internal(self) -> internal::Service {
        internal::Service {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(convert_service_spec_v1beta1_to_internal),
        }
    }
}

impl FromInternal<internal::Service> for service::Service {
    fn from_internal(obj: internal::Service) -> Self {
        service::Service {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(convert_service_spec_internal_to_v1beta1),
        }
    }
}

impl ToInternal<internal::ServiceAlias> for service::ServiceAlias {
    fn to_internal(self) -> internal::ServiceAlias {
        internal::ServiceAlias {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::service::ServiceAliasSpec {
                service_ref: convert_ref_v1beta1_to_internal(s.service_ref),
            }),
        }
    }
}

impl FromInternal<internal::ServiceAlias> for service::ServiceAlias {
    fn from_internal(obj: internal::ServiceAlias) -> Self {
        service::ServiceAlias {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| service::ServiceAliasSpec {
                service_ref: convert_ref_internal_to_v1beta1(s.service_ref),
            }),
        }
    }
}

// ============================================================================
// AddressGroup
// ============================================================================

fn convert_default_action_v1beta1_to_internal(
    action: address_group::DefaultAction,
) -> internal::DefaultAction {
    match action {
        address_group::DefaultAction::Accept => internal::DefaultAction::Accept,
        address_group::DefaultAction::Drop => internal::DefaultAction::Drop,
    }
}

fn convert_default_action_internal_to_v1beta1(
    action: internal::DefaultAction,
) -> address_group::DefaultAction {
    match action {
        internal::DefaultAction::Accept => address_group::DefaultAction::Accept,
        internal::DefaultAction::Drop => address_group::DefaultAction::Drop,
    }
}

impl ToInternal<internal::AddressGroup> for address_group::AddressGroup {
    fn to_internal(self) -> internal::AddressGroup {
        internal::AddressGroup {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::AddressGroupSpec {
                default_action: convert_default_action_v1beta1_to_internal(s.default_action),
                logs: s.logs,
                trace: s.trace,
                networks: s
                    .networks
                    .into_iter()
                    .map(|n| internal::NetworkItem {
                        name: n.name,
                        cidr: n.cidr,
                    })
                    .collect(),
            }),
        }
    }
}

impl FromInternal<internal::AddressGroup> for address_group::AddressGroup {
    fn from_internal(obj: internal::AddressGroup) -> Self {
        address_group::AddressGroup {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| address_group::AddressGroupSpec {
                default_action: convert_default_action_internal_to_v1beta1(s.default_action),
                logs: s.logs,
                trace: s.trace,
                networks: s
                    .networks
                    .into_iter()
                    .map(|n| address_group::NetworkItem {
                        name: n.name,
                        cidr: n.cidr,
                    })
                    .collect(),
            }),
        }
    }
}

// ============================================================================
// Bindings
// ============================================================================

impl ToInternal<internal::AddressGroupBinding> for binding::AddressGroupBinding {
    fn to_internal(self) -> internal::AddressGroupBinding {
        internal::AddressGroupBinding {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::AddressGroupBindingSpec {
                service_ref: convert_ref_v1beta1_to_internal(s.service_ref),
                address_group_ref: convert_ns_ref_v1beta1_to_internal(s.address_group_ref),
            }),
        }
    }
}

impl FromInternal<internal::AddressGroupBinding> for binding::AddressGroupBinding {
    fn from_internal(obj: internal::AddressGroupBinding) -> Self {
        binding::AddressGroupBinding {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| binding::AddressGroupBindingSpec {
                service_ref: convert_ref_internal_to_v1beta1(s.service_ref),
                address_group_ref: convert_ns_ref_internal_to_v1beta1(s.address_group_ref),
            }),
        }
    }
}

fn convert_service_ports_ref_v1beta1_to_internal(
    r: binding::ServicePortsRef,
) -> internal::ServicePortsRef {
    internal::ServicePortsRef {
        service_ref: convert_ns_ref_v1beta1_to_internal(r.service_ref),
        ports: r
            .ports
            .into_iter()
            .map(|p| internal::ProtocolPorts {
                protocol: p.protocol,
                ports: p.ports,
            })
            .collect(),
    }
}

fn convert_service_ports_ref_internal_to_v1beta1(
    r: internal::ServicePortsRef,
) -> binding::ServicePortsRef {
    binding::ServicePortsRef {
        service_ref: convert_ns_ref_internal_to_v1beta1(r.service_ref),
        ports: r
            .ports
            .into_iter()
            .map(|p| binding::ProtocolPorts {
                protocol: p.protocol,
                ports: p.ports,
            })
            .collect(),
    }
}

impl ToInternal<internal::AddressGroupPortMapping> for binding::AddressGroupPortMapping {
    fn to_internal(self) -> internal::AddressGroupPortMapping {
        internal::AddressGroupPortMapping {
            metadata: self.metadata.unwrap_or_default(),
            access_ports: self
                .access_ports
                .into_iter()
                .map(convert_service_ports_ref_v1beta1_to_internal)
                .collect(),
        }
    }
}

impl FromInternal<internal::AddressGroupPortMapping> for binding::AddressGroupPortMapping {
    fn from_internal(obj: internal::AddressGroupPortMapping) -> Self {
        binding::AddressGroupPortMapping {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            access_ports: obj
                .access_ports
                .into_iter()
                .map(convert_service_ports_ref_internal_to_v1beta1)
                .collect(),
        }
    }
}

impl ToInternal<internal::AddressGroupBindingPolicy> for binding::AddressGroupBindingPolicy {
    fn to_internal(self) -> internal::AddressGroupBindingPolicy {
        internal::AddressGroupBindingPolicy {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::AddressGroupBindingPolicySpec {
                service_ref: convert_ns_ref_v1beta1_to_internal(s.service_ref),
                address_group_ref: convert_ns_ref_v1beta1_to_internal(s.address_group_ref),
            }),
        }
    }
}

impl FromInternal<internal::AddressGroupBindingPolicy> for binding::AddressGroupBindingPolicy {
    fn from_internal(obj: internal::AddressGroupBindingPolicy) -> Self {
        binding::AddressGroupBindingPolicy {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| binding::AddressGroupBindingPolicySpec {
                service_ref: convert_ns_ref_internal_to_v1beta1(s.service_ref),
                address_group_ref: convert_ns_ref_internal_to_v1beta1(s.address_group_ref),
            }),
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

fn convert_traffic_v1beta1_to_internal(traffic: rule::Traffic) -> internal::Traffic {
    match traffic {
        rule::Traffic::Ingress => internal::Traffic::Ingress,
        rule::Traffic::Egress => internal::Traffic::Egress,
    }
}

fn convert_traffic_internal_to_v1beta1(traffic: internal::Traffic) -> rule::Traffic {
    match traffic {
        internal::Traffic::Ingress => rule::Traffic::Ingress,
        internal::Traffic::Egress => rule::Traffic::Egress,
    }
}

impl ToInternal<internal::RuleS2S> for rule::RuleS2S {
    fn to_internal(self) -> internal::RuleS2S {
        internal::RuleS2S {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::RuleS2SSpec {
                traffic: convert_traffic_v1beta1_to_internal(s.traffic),
                service_local_ref: convert_ns_ref_v1beta1_to_internal(s.service_local_ref),
                service_ref: convert_ns_ref_v1beta1_to_internal(s.service_ref),
                ie_ag_ag_rule_refs: s
                    .ie_ag_ag_rule_refs
                    .into_iter()
                    .map(convert_ns_ref_v1beta1_to_internal)
                    .collect(),
                trace: s.trace,
            }),
        }
    }
}

impl FromInternal<internal::RuleS2S> for rule::RuleS2S {
    fn from_internal(obj: internal::RuleS2S) -> Self {
        rule::RuleS2S {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| rule::RuleS2SSpec {
                traffic: convert_traffic_internal_to_v1beta1(s.traffic),
                service_local_ref: convert_ns_ref_internal_to_v1beta1(s.service_local_ref),
                service_ref: convert_ns_ref_internal_to_v1beta1(s.service_ref),
                ie_ag_ag_rule_refs: s
                    .ie_ag_ag_rule_refs
                    .into_iter()
                    .map(convert_ns_ref_internal_to_v1beta1)
                    .collect(),
                trace: s.trace,
            }),
        }
    }
}

impl ToInternal<internal::IEAgAgRule> for rule::IEAgAgRule {
    fn to_internal(self) -> internal::IEAgAgRule {
        internal::IEAgAgRule {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::IEAgAgRuleSpec {
                transport: match s.transport {
                    rule::TransportProtocol::Tcp => internal::TransportProtocol::Tcp,
                    rule::TransportProtocol::Udp => internal::TransportProtocol::Udp,
                },
                traffic: convert_traffic_v1beta1_to_internal(s.traffic),
                address_group_local: convert_ns_ref_v1beta1_to_internal(s.address_group_local),
                address_group: convert_ns_ref_v1beta1_to_internal(s.address_group),
                ports: s
                    .ports
                    .into_iter()
                    .map(|p| internal::PortSpec {
                        source: p.source,
                        destination: p.destination,
                    })
                    .collect(),
                action: match s.action {
                    rule::RuleAction::Accept => internal::RuleAction::Accept,
                    rule::RuleAction::Drop => internal::RuleAction::Drop,
                },
                trace: s.trace,
            }),
        }
    }
}

impl FromInternal<internal::IEAgAgRule> for rule::IEAgAgRule {
    fn from_internal(obj: internal::IEAgAgRule) -> Self {
        rule::IEAgAgRule {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| rule::IEAgAgRuleSpec {
                transport: match s.transport {
                    internal::TransportProtocol::Tcp => rule::TransportProtocol::Tcp,
                    internal::TransportProtocol::Udp => rule::TransportProtocol::Udp,
                },
                traffic: convert_traffic_internal_to_v1beta1(s.traffic),
                address_group_local: convert_ns_ref_internal_to_v1beta1(s.address_group_local),
                address_group: convert_ns_ref_internal_to_v1beta1(s.address_group),
                ports: s
                    .ports
                    .into_iter()
                    .map(|p| rule::PortSpec {
                        source: p.source,
                        destination: p.destination,
                    })
                    .collect(),
                action: match s.action {
                    internal::RuleAction::Accept => rule::RuleAction::Accept,
                    internal::RuleAction::Drop => rule::RuleAction::Drop,
                },
                trace: s.trace,
            }),
        }
    }
}

// ============================================================================
// Network / Host
// ============================================================================

impl ToInternal<internal::Network> for network::Network {
    fn to_internal(self) -> internal::Network {
        internal::Network {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::NetworkSpec { cidr: s.cidr }),
            status: self.status.map(|s| internal::NetworkStatus {
                is_bound: s.is_bound,
                binding_ref: s.binding_ref.map(convert_ref_v1beta1_to_internal),
                address_group_ref: s.address_group_ref.map(convert_ref_v1beta1_to_internal),
            }),
        }
    }
}

impl FromInternal<internal::Network> for network::Network {
    fn from_internal(obj: internal::Network) -> Self {
        network::Network {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| network::NetworkSpec { cidr: s.cidr }),
            status: obj.status.map(|s| network::NetworkStatus {
                is_bound: s.is_bound,
                binding_ref: s.binding_ref.map(convert_ref_internal_to_v1beta1),
                address_group_ref: s.address_group_ref.map(convert_ref_internal_to_v1beta1),
            }),
        }
    }
}

impl ToInternal<internal::NetworkBinding> for network::NetworkBinding {
    fn to_internal(self) -> internal::NetworkBinding {
        internal::NetworkBinding {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::NetworkBindingSpec {
                network_ref: convert_ref_v1beta1_to_internal(s.network_ref),
                address_group_ref: convert_ref_v1beta1_to_internal(s.address_group_ref),
            }),
        }
    }
}

impl FromInternal<internal::NetworkBinding> for network::NetworkBinding {
    fn from_internal(obj: internal::NetworkBinding) -> Self {
        network::NetworkBinding {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| network::NetworkBindingSpec {
                network_ref: convert_ref_internal_to_v1beta1(s.network_ref),
                address_group_ref: convert_ref_internal_to_v1beta1(s.address_group_ref),
            }),
        }
    }
}

impl ToInternal<internal::Host> for host::Host {
    fn to_internal(self) -> internal::Host {
        internal::Host {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::HostSpec {
                uuid: s.uuid,
                host_name: s.host_name,
            }),
            status: self.status.map(|s| internal::HostStatus {
                is_bound: s.is_bound,
                address_group_ref: s.address_group_ref.map(convert_ref_v1beta1_to_internal),
            }),
        }
    }
}

impl FromInternal<internal::Host> for host::Host {
    fn from_internal(obj: internal::Host) -> Self {
        host::Host {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| host::HostSpec {
                uuid: s.uuid,
                host_name: s.host_name,
            }),
            status: obj.status.map(|s| host::HostStatus {
                is_bound: s.is_bound,
                address_group_ref: s.address_group_ref.map(convert_ref_internal_to_v1beta1),
            }),
        }
    }
}

impl ToInternal<internal::HostBinding> for host::HostBinding {
    fn to_internal(self) -> internal::HostBinding {
        internal::HostBinding {
            metadata: self.metadata.unwrap_or_default(),
            spec: self.spec.map(|s| internal::HostBindingSpec {
                host_ref: convert_ns_ref_v1beta1_to_internal(s.host_ref),
                address_group_ref: convert_ns_ref_v1beta1_to_internal(s.address_group_ref),
            }),
        }
    }
}

impl FromInternal<internal::HostBinding> for host::HostBinding {
    fn from_internal(obj: internal::HostBinding) -> Self {
        host::HostBinding {
            type_meta: Default::default(),
            metadata: meta_to_option_object_meta(obj.metadata),
            spec: obj.spec.map(|s| host::HostBindingSpec {
                host_ref: convert_ns_ref_internal_to_v1beta1(s.host_ref),
                address_group_ref: convert_ns_ref_internal_to_v1beta1(s.address_group_ref),
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::common::test_utils::assert_conversion_roundtrip;
    use crate::common::{ObjectMeta, TypeMeta};
    use crate::netguard::internal;
    use crate::netguard::v1beta1::reference::{NamespacedObjectReference, ObjectReference};
    use crate::netguard::v1beta1::{network, rule, service};

    fn object_meta(namespace: &str, name: &str) -> Option<ObjectMeta> {
        Some(ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_service_conversion_roundtrip() {
        assert_conversion_roundtrip::<_, internal::Service>(service::Service {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "api"),
            spec: Some(service::ServiceSpec {
                description: "edge api".to_string(),
                ingress_ports: vec![service::IngressPort {
                    protocol: "TCP".to_string(),
                    port: "8080".to_string(),
                    description: String::new(),
                }],
                address_groups: vec![],
            }),
        });
    }

    #[test]
    fn test_rule_conversion_roundtrip() {
        assert_conversion_roundtrip::<_, internal::RuleS2S>(rule::RuleS2S {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "api-to-db"),
            spec: Some(rule::RuleS2SSpec {
                traffic: rule::Traffic::Egress,
                service_local_ref: NamespacedObjectReference {
                    api_version: "netguard.sgroups.io/v1beta1".to_string(),
                    kind: "ServiceAlias".to_string(),
                    name: "api".to_string(),
                    namespace: "app".to_string(),
                },
                service_ref: NamespacedObjectReference {
                    api_version: "netguard.sgroups.io/v1beta1".to_string(),
                    kind: "ServiceAlias".to_string(),
                    name: "db".to_string(),
                    namespace: "data".to_string(),
                },
                ie_ag_ag_rule_refs: vec![],
                trace: true,
            }),
        });
    }

    #[test]
    fn test_network_conversion_roundtrip() {
        assert_conversion_roundtrip::<_, internal::Network>(network::Network {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "n1"),
            spec: Some(network::NetworkSpec {
                cidr: "10.0.0.0/24".to_string(),
            }),
            status: Some(network::NetworkStatus {
                is_bound: true,
                binding_ref: Some(ObjectReference {
                    api_version: "netguard.sgroups.io/v1beta1".to_string(),
                    kind: "NetworkBinding".to_string(),
                    name: "b1".to_string(),
                }),
                address_group_ref: None,
            }),
        });
    }
}
