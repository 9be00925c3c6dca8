//! Validation for netguard API v1beta1 types

use std::net::IpAddr;

use crate::common::validation::{
    BadValue, ErrorList, Path, invalid, name_is_dns_subdomain, not_supported, required,
    validate_object_meta, validate_object_meta_update,
};
use crate::common::{ObjectMeta, VersionedObject};
use crate::netguard::v1beta1::binding::{
    AddressGroupBinding, AddressGroupBindingPolicy, AddressGroupPortMapping,
};
use crate::netguard::v1beta1::host::{Host, HostBinding};
use crate::netguard::v1beta1::network::{Network, NetworkBinding};
use crate::netguard::v1beta1::reference::{NamespacedObjectReference, ObjectReference};
use crate::netguard::v1beta1::rule::{IEAgAgRule, RuleS2S};
use crate::netguard::v1beta1::service::{IngressPort, Service, ServiceAlias};

const SUPPORTED_PROTOCOLS: [&str; 2] = ["TCP", "UDP"];

// ============================================================================
// Helper Functions
// ============================================================================

fn validate_meta(meta: &ObjectMeta) -> ErrorList {
    validate_object_meta(meta, true, name_is_dns_subdomain, &Path::new("metadata"))
}

fn validate_meta_update(new_meta: &ObjectMeta, old_meta: &ObjectMeta) -> ErrorList {
    validate_object_meta_update(new_meta, old_meta, &Path::new("metadata"))
}

fn validate_reference(reference: &ObjectReference, expected_kind: &str, path: &Path) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if reference.name.is_empty() {
        all_errs.push(required(&path.child("name"), ""));
    }
    if !reference.kind.is_empty() && reference.kind != expected_kind {
        all_errs.push(invalid(
            &path.child("kind"),
            BadValue::String(reference.kind.clone()),
            &format!("must reference a {}", expected_kind),
        ));
    }
    all_errs
}

fn validate_namespaced_reference(
    reference: &NamespacedObjectReference,
    expected_kind: &str,
    path: &Path,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if reference.name.is_empty() {
        all_errs.push(required(&path.child("name"), ""));
    }
    if !reference.kind.is_empty() && reference.kind != expected_kind {
        all_errs.push(invalid(
            &path.child("kind"),
            BadValue::String(reference.kind.clone()),
            &format!("must reference a {}", expected_kind),
        ));
    }
    all_errs
}

fn validate_port_string(port: &str, path: &Path) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if port.is_empty() {
        all_errs.push(required(path, ""));
        return all_errs;
    }
    let valid = match port.split_once('-') {
        Some((lo, hi)) => match (parse_port(lo), parse_port(hi)) {
            (Some(lo), Some(hi)) => lo < hi,
            _ => false,
        },
        None => parse_port(port).is_some(),
    };
    if !valid {
        all_errs.push(invalid(
            path,
            BadValue::String(port.to_string()),
            "must be a port number or an ascending port range like \"8000-9000\"",
        ));
    }
    all_errs
}

fn parse_port(s: &str) -> Option<u16> {
    match s.trim().parse::<u32>() {
        Ok(n) if (1..=65535).contains(&n) => Some(n as u16),
        _ => None,
    }
}

fn validate_ingress_port(port: &IngressPort, path: &Path) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if !SUPPORTED_PROTOCOLS.contains(&port.protocol.as_str()) {
        all_errs.push(not_supported(
            &path.child("protocol"),
            BadValue::String(port.protocol.clone()),
            &SUPPORTED_PROTOCOLS,
        ));
    }
    all_errs.extend(validate_port_string(&port.port, &path.child("port")));
    all_errs
}

/// Validates a CIDR of the form `address/prefix`.
pub fn validate_cidr(cidr: &str, path: &Path) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let bad = || invalid(path, BadValue::String(cidr.to_string()), "must be a valid CIDR");
    let Some((addr, prefix)) = cidr.split_once('/') else {
        all_errs.push(bad());
        return all_errs;
    };
    let Ok(addr) = addr.parse::<IpAddr>() else {
        all_errs.push(bad());
        return all_errs;
    };
    let max_prefix = if addr.is_ipv4() { 32 } else { 128 };
    match prefix.parse::<u8>() {
        Ok(p) if p <= max_prefix => {}
        _ => all_errs.push(bad()),
    }
    all_errs
}

// ============================================================================
// Service / ServiceAlias
// ============================================================================

pub fn validate_service(service: &Service) -> ErrorList {
    let mut all_errs = validate_meta(service.metadata());
    if let Some(spec) = &service.spec {
        let spec_path = Path::new("spec");
        for (i, port) in spec.ingress_ports.iter().enumerate() {
            all_errs.extend(validate_ingress_port(
                port,
                &spec_path.child("ingressPorts").index(i),
            ));
        }
        for (i, group) in spec.address_groups.iter().enumerate() {
            all_errs.extend(validate_namespaced_reference(
                group,
                "AddressGroup",
                &spec_path.child("addressGroups").index(i),
            ));
        }
    }
    all_errs
}

pub fn validate_service_update(new_service: &Service, old_service: &Service) -> ErrorList {
    let mut all_errs = validate_meta_update(new_service.metadata(), old_service.metadata());
    all_errs.extend(validate_service(new_service));
    all_errs
}

pub fn validate_service_alias(alias: &ServiceAlias) -> ErrorList {
    let mut all_errs = validate_meta(alias.metadata());
    if let Some(spec) = &alias.spec {
        all_errs.extend(validate_reference(
            &spec.service_ref,
            "Service",
            &Path::new("spec").child("serviceRef"),
        ));
    }
    all_errs
}

pub fn validate_service_alias_update(new_alias: &ServiceAlias, old_alias: &ServiceAlias) -> ErrorList {
    let mut all_errs = validate_meta_update(new_alias.metadata(), old_alias.metadata());
    all_errs.extend(validate_service_alias(new_alias));
    all_errs
}

// ============================================================================
// AddressGroup and bindings
// ============================================================================

pub fn validate_address_group(
    group: &crate::netguard::v1beta1::address_group::AddressGroup,
) -> ErrorList {
    let mut all_errs = validate_meta(group.metadata());
    if let Some(spec) = &group.spec {
        for (i, network) in spec.networks.iter().enumerate() {
            if !network.cidr.is_empty() {
                all_errs.extend(validate_cidr(
                    &network.cidr,
                    &Path::new("spec").child("networks").index(i).child("cidr"),
                ));
            }
        }
    }
    all_errs
}

pub fn validate_address_group_binding(binding: &AddressGroupBinding) -> ErrorList {
    let mut all_errs = validate_meta(binding.metadata());
    if let Some(spec) = &binding.spec {
        let spec_path = Path::new("spec");
        all_errs.extend(validate_reference(
            &spec.service_ref,
            "Service",
            &spec_path.child("serviceRef"),
        ));
        all_errs.extend(validate_namespaced_reference(
            &spec.address_group_ref,
            "AddressGroup",
            &spec_path.child("addressGroupRef"),
        ));
    } else {
        all_errs.push(required(&Path::new("spec"), ""));
    }
    all_errs
}

pub fn validate_address_group_port_mapping(mapping: &AddressGroupPortMapping) -> ErrorList {
    let mut all_errs = validate_meta(mapping.metadata());
    for (i, access) in mapping.access_ports.iter().enumerate() {
        let access_path = Path::new("accessPorts").index(i);
        all_errs.extend(validate_namespaced_reference(
            &access.service_ref,
            "Service",
            &access_path.child("serviceRef"),
        ));
        for (j, ports) in access.ports.iter().enumerate() {
            let ports_path = access_path.child("ports").index(j);
            if !SUPPORTED_PROTOCOLS.contains(&ports.protocol.as_str()) {
                all_errs.push(not_supported(
                    &ports_path.child("protocol"),
                    BadValue::String(ports.protocol.clone()),
                    &SUPPORTED_PROTOCOLS,
                ));
            }
            for (k, port) in ports.ports.iter().enumerate() {
                all_errs.extend(validate_port_string(
                    port,
                    &ports_path.child("ports").index(k),
                ));
            }
        }
    }
    all_errs
}

pub fn validate_address_group_binding_policy(policy: &AddressGroupBindingPolicy) -> ErrorList {
    let mut all_errs = validate_meta(policy.metadata());
    if let Some(spec) = &policy.spec {
        let spec_path = Path::new("spec");
        all_errs.extend(validate_namespaced_reference(
            &spec.service_ref,
            "Service",
            &spec_path.child("serviceRef"),
        ));
        all_errs.extend(validate_namespaced_reference(
            &spec.address_group_ref,
            "AddressGroup",
            &spec_path.child("addressGroupRef"),
        ));
    } else {
        all_errs.push(required(&Path::new("spec"), ""));
    }
    all_errs
}

// ============================================================================
// Rules
// ============================================================================

pub fn validate_rule_s2s(rule: &RuleS2S) -> ErrorList {
    let mut all_errs = validate_meta(rule.metadata());
    if let Some(spec) = &rule.spec {
        let spec_path = Path::new("spec");
        // Both ends must go through ServiceAlias, never directly to a Service
        all_errs.extend(validate_namespaced_reference(
            &spec.service_local_ref,
            "ServiceAlias",
            &spec_path.child("serviceLocalRef"),
        ));
        all_errs.extend(validate_namespaced_reference(
            &spec.service_ref,
            "ServiceAlias",
            &spec_path.child("serviceRef"),
        ));
        for (i, generated) in spec.ie_ag_ag_rule_refs.iter().enumerate() {
            all_errs.extend(validate_namespaced_reference(
                generated,
                "IEAgAgRule",
                &spec_path.child("ieAgAgRuleRefs").index(i),
            ));
        }
    } else {
        all_errs.push(required(&Path::new("spec"), ""));
    }
    all_errs
}

pub fn validate_rule_s2s_update(new_rule: &RuleS2S, old_rule: &RuleS2S) -> ErrorList {
    let mut all_errs = validate_meta_update(new_rule.metadata(), old_rule.metadata());
    all_errs.extend(validate_rule_s2s(new_rule));
    all_errs
}

pub fn validate_ie_ag_ag_rule(rule: &IEAgAgRule) -> ErrorList {
    let mut all_errs = validate_meta(rule.metadata());
    if let Some(spec) = &rule.spec {
        let spec_path = Path::new("spec");
        all_errs.extend(validate_namespaced_reference(
            &spec.address_group_local,
            "AddressGroup",
            &spec_path.child("addressGroupLocal"),
        ));
        all_errs.extend(validate_namespaced_reference(
            &spec.address_group,
            "AddressGroup",
            &spec_path.child("addressGroup"),
        ));
        for (i, port) in spec.ports.iter().enumerate() {
            let port_path = spec_path.child("ports").index(i);
            if !port.source.is_empty() {
                all_errs.extend(validate_port_string(&port.source, &port_path.child("source")));
            }
            if !port.destination.is_empty() {
                all_errs.extend(validate_port_string(
                    &port.destination,
                    &port_path.child("destination"),
                ));
            }
        }
    } else {
        all_errs.push(required(&Path::new("spec"), ""));
    }
    all_errs
}

// ============================================================================
// Network / Host
// ============================================================================

pub fn validate_network(network: &Network) -> ErrorList {
    let mut all_errs = validate_meta(network.metadata());
    match &network.spec {
        Some(spec) if !spec.cidr.is_empty() => {
            all_errs.extend(validate_cidr(&spec.cidr, &Path::new("spec").child("cidr")));
        }
        _ => all_errs.push(required(&Path::new("spec").child("cidr"), "")),
    }
    all_errs
}

pub fn validate_network_update(new_network: &Network, old_network: &Network) -> ErrorList {
    let mut all_errs = validate_meta_update(new_network.metadata(), old_network.metadata());
    all_errs.extend(validate_network(new_network));
    // the registered block cannot be moved; rebinding requires re-creation
    let new_cidr = new_network.spec.as_ref().map(|s| s.cidr.as_str());
    let old_cidr = old_network.spec.as_ref().map(|s| s.cidr.as_str());
    if new_cidr != old_cidr {
        all_errs.push(invalid(
            &Path::new("spec").child("cidr"),
            BadValue::String(new_cidr.unwrap_or_default().to_string()),
            "field is immutable",
        ));
    }
    all_errs
}

pub fn validate_network_binding(binding: &NetworkBinding) -> ErrorList {
    let mut all_errs = validate_meta(binding.metadata());
    if let Some(spec) = &binding.spec {
        let spec_path = Path::new("spec");
        all_errs.extend(validate_reference(
            &spec.network_ref,
            "Network",
            &spec_path.child("networkRef"),
        ));
        all_errs.extend(validate_reference(
            &spec.address_group_ref,
            "AddressGroup",
            &spec_path.child("addressGroupRef"),
        ));
    } else {
        all_errs.push(required(&Path::new("spec"), ""));
    }
    all_errs
}

pub fn validate_host(hst: &Host) -> ErrorList {
    let mut all_errs = validate_meta(hst.metadata());
    match &hst.spec {
        Some(spec) if !spec.uuid.is_empty() => {
            if uuid::Uuid::parse_str(&spec.uuid).is_err() {
                all_errs.push(invalid(
                    &Path::new("spec").child("uuid"),
                    BadValue::String(spec.uuid.clone()),
                    "must be a valid UUID",
                ));
            }
        }
        _ => all_errs.push(required(&Path::new("spec").child("uuid"), "")),
    }
    all_errs
}

pub fn validate_host_update(new_host: &Host, old_host: &Host) -> ErrorList {
    let mut all_errs = validate_meta_update(new_host.metadata(), old_host.metadata());
    all_errs.extend(validate_host(new_host));
    let new_uuid = new_host.spec.as_ref().map(|s| s.uuid.as_str());
    let old_uuid = old_host.spec.as_ref().map(|s| s.uuid.as_str());
    if new_uuid != old_uuid {
        all_errs.push(invalid(
            &Path::new("spec").child("uuid"),
            BadValue::String(new_uuid.unwrap_or_default().to_string()),
            "field is immutable",
        ));
    }
    all_errs
}

pub fn validate_host_binding(binding: &HostBinding) -> ErrorList {
    let mut all_errs = validate_meta(binding.metadata());
    if let Some(spec) = &binding.spec {
        let spec_path = Path::new("spec");
        all_errs.extend(validate_namespaced_reference(
            &spec.host_ref,
            "Host",
            &spec_path.child("hostRef"),
        ));
        all_errs.extend(validate_namespaced_reference(
            &spec.address_group_ref,
            "AddressGroup",
            &spec_path.child("addressGroupRef"),
        ));
    } else {
        all_errs.push(required(&Path::new("spec"), ""));
    }
    all_errs
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ObjectMeta, TypeMeta};
    use crate::netguard::v1beta1::network::NetworkSpec;
    use crate::netguard::v1beta1::rule::RuleS2SSpec;
    use crate::netguard::v1beta1::service::{ServiceSpec, ServiceAliasSpec};

    fn object_meta(namespace: &str, name: &str) -> Option<ObjectMeta> {
        Some(ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_validate_service_valid() {
        let service = Service {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "api"),
            spec: Some(ServiceSpec {
                description: "edge api".to_string(),
                ingress_ports: vec![IngressPort {
                    protocol: "TCP".to_string(),
                    port: "8080".to_string(),
                    description: String::new(),
                }],
                address_groups: vec![],
            }),
        };
        let errors = validate_service(&service);
        assert!(errors.is_empty(), "unexpected errors: {}", errors);
    }

    #[test]
    fn test_validate_service_bad_protocol_and_port() {
        let service = Service {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "api"),
            spec: Some(ServiceSpec {
                description: String::new(),
                ingress_ports: vec![IngressPort {
                    protocol: "ICMP".to_string(),
                    port: "99999".to_string(),
                    description: String::new(),
                }],
                address_groups: vec![],
            }),
        };
        let errors = validate_service(&service);
        assert_eq!(errors.len(), 2, "errors: {}", errors);
    }

    #[test]
    fn test_validate_port_ranges() {
        let path = Path::new("port");
        assert!(validate_port_string("80", &path).is_empty());
        assert!(validate_port_string("8000-9000", &path).is_empty());
        assert!(!validate_port_string("9000-8000", &path).is_empty());
        assert!(!validate_port_string("0", &path).is_empty());
        assert!(!validate_port_string("http", &path).is_empty());
    }

    #[test]
    fn test_validate_rule_s2s_requires_alias_kind() {
        let mut rule = RuleS2S {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "r1"),
            spec: Some(RuleS2SSpec::default()),
        };
        let spec = rule.spec.as_mut().unwrap();
        spec.service_local_ref.name = "api".to_string();
        spec.service_local_ref.kind = "ServiceAlias".to_string();
        spec.service_ref.name = "db".to_string();
        spec.service_ref.kind = "Service".to_string();

        let errors = validate_rule_s2s(&rule);
        assert_eq!(errors.len(), 1, "errors: {}", errors);
        assert!(errors.errors[0].field.contains("serviceRef"));
    }

    #[test]
    fn test_validate_network_cidr() {
        let network = |cidr: &str| Network {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "n1"),
            spec: Some(NetworkSpec {
                cidr: cidr.to_string(),
            }),
            status: None,
        };
        assert!(validate_network(&network("10.0.0.0/24")).is_empty());
        assert!(validate_network(&network("fd00::/64")).is_empty());
        assert!(!validate_network(&network("10.0.0.0")).is_empty());
        assert!(!validate_network(&network("10.0.0.0/33")).is_empty());
        assert!(!validate_network(&network("wat/24")).is_empty());
    }

    #[test]
    fn test_validate_network_update_cidr_immutable() {
        let mk = |cidr: &str| Network {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "n1"),
            spec: Some(NetworkSpec {
                cidr: cidr.to_string(),
            }),
            status: None,
        };
        let errors = validate_network_update(&mk("10.0.1.0/24"), &mk("10.0.0.0/24"));
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_validate_host_uuid() {
        let mk = |uuid: &str| Host {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "h1"),
            spec: Some(crate::netguard::v1beta1::host::HostSpec {
                uuid: uuid.to_string(),
                host_name: String::new(),
            }),
            status: None,
        };
        assert!(validate_host(&mk("6be04613-31ab-4e0a-9d47-37a385e61b29")).is_empty());
        assert!(!validate_host(&mk("not-a-uuid")).is_empty());
    }

    #[test]
    fn test_validate_service_alias() {
        let alias = ServiceAlias {
            type_meta: TypeMeta::default(),
            metadata: object_meta("app", "api-alias"),
            spec: Some(ServiceAliasSpec {
                service_ref: ObjectReference {
                    api_version: "netguard.sgroups.io/v1beta1".to_string(),
                    kind: "Service".to_string(),
                    name: "api".to_string(),
                },
            }),
        };
        assert!(validate_service_alias(&alias).is_empty());
    }
}
