use super::{
    AddressGroup, AddressGroupBinding, AddressGroupBindingSpec, AddressGroupSpec, DefaultAction,
    Host, HostSpec, IngressPort, NamespacedObjectReference, Network, NetworkItem, NetworkSpec,
    ObjectReference, RuleS2S, RuleS2SSpec, Service, ServiceList, ServiceSpec, Traffic,
};
use crate::common::test_utils::assert_serde_roundtrip;
use crate::common::{ListMeta, ObjectMeta, TypeMeta};

fn type_meta(kind: &str) -> TypeMeta {
    TypeMeta {
        api_version: "netguard.sgroups.io/v1beta1".to_string(),
        kind: kind.to_string(),
    }
}

fn object_meta(namespace: &str, name: &str) -> Option<ObjectMeta> {
    Some(ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    })
}

fn service_basic() -> Service {
    Service {
        type_meta: type_meta("Service"),
        metadata: object_meta("app", "api"),
        spec: Some(ServiceSpec {
            description: "edge api".to_string(),
            ingress_ports: vec![IngressPort {
                protocol: "TCP".to_string(),
                port: "8080".to_string(),
                description: "http".to_string(),
            }],
            address_groups: vec![NamespacedObjectReference {
                api_version: "netguard.sgroups.io/v1beta1".to_string(),
                kind: "AddressGroup".to_string(),
                name: "edge".to_string(),
                namespace: "infra".to_string(),
            }],
        }),
    }
}

#[test]
fn test_service_roundtrip() {
    assert_serde_roundtrip(&service_basic());
}

#[test]
fn test_service_list_roundtrip() {
    assert_serde_roundtrip(&ServiceList {
        type_meta: type_meta("ServiceList"),
        metadata: Some(ListMeta {
            resource_version: Some("17".to_string()),
            ..Default::default()
        }),
        items: vec![service_basic()],
    });
}

#[test]
fn test_address_group_roundtrip() {
    assert_serde_roundtrip(&AddressGroup {
        type_meta: type_meta("AddressGroup"),
        metadata: object_meta("infra", "edge"),
        spec: Some(AddressGroupSpec {
            default_action: DefaultAction::Accept,
            logs: true,
            trace: false,
            networks: vec![NetworkItem {
                name: "infra/n1".to_string(),
                cidr: "10.0.0.0/24".to_string(),
            }],
        }),
    });
}

#[test]
fn test_binding_roundtrip() {
    assert_serde_roundtrip(&AddressGroupBinding {
        type_meta: type_meta("AddressGroupBinding"),
        metadata: object_meta("app", "b1"),
        spec: Some(AddressGroupBindingSpec {
            service_ref: ObjectReference {
                api_version: "netguard.sgroups.io/v1beta1".to_string(),
                kind: "Service".to_string(),
                name: "api".to_string(),
            },
            address_group_ref: NamespacedObjectReference {
                api_version: "netguard.sgroups.io/v1beta1".to_string(),
                kind: "AddressGroup".to_string(),
                name: "edge".to_string(),
                namespace: "infra".to_string(),
            },
        }),
    });
}

#[test]
fn test_rule_roundtrip() {
    assert_serde_roundtrip(&RuleS2S {
        type_meta: type_meta("RuleS2S"),
        metadata: object_meta("app", "api-to-db"),
        spec: Some(RuleS2SSpec {
            traffic: Traffic::Egress,
            service_local_ref: NamespacedObjectReference {
                kind: "ServiceAlias".to_string(),
                name: "api".to_string(),
                namespace: "app".to_string(),
                ..Default::default()
            },
            service_ref: NamespacedObjectReference {
                kind: "ServiceAlias".to_string(),
                name: "db".to_string(),
                namespace: "data".to_string(),
                ..Default::default()
            },
            ie_ag_ag_rule_refs: vec![],
            trace: true,
        }),
    });
}

#[test]
fn test_network_and_host_roundtrip() {
    assert_serde_roundtrip(&Network {
        type_meta: type_meta("Network"),
        metadata: object_meta("infra", "n1"),
        spec: Some(NetworkSpec {
            cidr: "10.0.0.0/24".to_string(),
        }),
        status: None,
    });
    assert_serde_roundtrip(&Host {
        type_meta: type_meta("Host"),
        metadata: object_meta("infra", "h1"),
        spec: Some(HostSpec {
            uuid: "6be04613-31ab-4e0a-9d47-37a385e61b29".to_string(),
            host_name: "h1.internal".to_string(),
        }),
        status: None,
    });
}

#[test]
fn test_enum_wire_form() {
    let json = serde_json::to_string(&Traffic::Ingress).unwrap();
    assert_eq!(json, "\"INGRESS\"");
    let json = serde_json::to_string(&DefaultAction::Drop).unwrap();
    assert_eq!(json, "\"DROP\"");
}
