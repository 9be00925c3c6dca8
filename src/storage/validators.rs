//! [`Validator`](super::Validator) wiring for the netguard kinds.

use crate::common::VersionedObject;
use crate::common::validation::{ErrorList, Path, validate_object_meta_update};
use crate::netguard::v1beta1;
use crate::netguard::v1beta1::validation;
use crate::storage::Validator;

macro_rules! impl_validator {
    // kinds with a dedicated update validator
    ($name:ident, $ty:ty, $create:path, $update:path) => {
        /// Validation hooks for this kind's storage.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Validator<$ty> for $name {
            fn validate_create(&self, obj: &$ty) -> ErrorList {
                $create(obj)
            }

            fn validate_update(&self, new_obj: &$ty, old_obj: &$ty) -> ErrorList {
                $update(new_obj, old_obj)
            }
        }
    };
    // kinds whose update is the create validation plus metadata immutability
    ($name:ident, $ty:ty, $create:path) => {
        /// Validation hooks for this kind's storage.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Validator<$ty> for $name {
            fn validate_create(&self, obj: &$ty) -> ErrorList {
                $create(obj)
            }

            fn validate_update(&self, new_obj: &$ty, old_obj: &$ty) -> ErrorList {
                let mut all_errs = validate_object_meta_update(
                    new_obj.metadata(),
                    old_obj.metadata(),
                    &Path::new("metadata"),
                );
                all_errs.extend($create(new_obj));
                all_errs
            }
        }
    };
}

impl_validator!(
    ServiceValidator,
    v1beta1::Service,
    validation::validate_service,
    validation::validate_service_update
);
impl_validator!(
    ServiceAliasValidator,
    v1beta1::ServiceAlias,
    validation::validate_service_alias,
    validation::validate_service_alias_update
);
impl_validator!(
    AddressGroupValidator,
    v1beta1::AddressGroup,
    validation::validate_address_group
);
impl_validator!(
    AddressGroupBindingValidator,
    v1beta1::AddressGroupBinding,
    validation::validate_address_group_binding
);
impl_validator!(
    AddressGroupPortMappingValidator,
    v1beta1::AddressGroupPortMapping,
    validation::validate_address_group_port_mapping
);
impl_validator!(
    AddressGroupBindingPolicyValidator,
    v1beta1::AddressGroupBindingPolicy,
    validation::validate_address_group_binding_policy
);
impl_validator!(
    RuleS2SValidator,
    v1beta1::RuleS2S,
    validation::validate_rule_s2s,
    validation::validate_rule_s2s_update
);
impl_validator!(
    IEAgAgRuleValidator,
    v1beta1::IEAgAgRule,
    validation::validate_ie_ag_ag_rule
);
impl_validator!(
    NetworkValidator,
    v1beta1::Network,
    validation::validate_network,
    validation::validate_network_update
);
impl_validator!(
    NetworkBindingValidator,
    v1beta1::NetworkBinding,
    validation::validate_network_binding
);
impl_validator!(
    HostValidator,
    v1beta1::Host,
    validation::validate_host,
    validation::validate_host_update
);
impl_validator!(
    HostBindingValidator,
    v1beta1::HostBinding,
    validation::validate_host_binding
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ObjectMeta, TypeMeta};

    #[test]
    fn test_update_validator_rejects_name_change() {
        let mk = |name: &str| v1beta1::NetworkBinding {
            type_meta: TypeMeta::default(),
            metadata: Some(ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("app".to_string()),
                ..Default::default()
            }),
            spec: Some(v1beta1::NetworkBindingSpec {
                network_ref: v1beta1::ObjectReference {
                    name: "n1".to_string(),
                    ..Default::default()
                },
                address_group_ref: v1beta1::ObjectReference {
                    name: "g1".to_string(),
                    ..Default::default()
                },
            }),
        };
        let validator = NetworkBindingValidator;
        assert!(validator.validate_update(&mk("b1"), &mk("b1")).is_empty());
        assert!(!validator.validate_update(&mk("b2"), &mk("b1")).is_empty());
    }
}
