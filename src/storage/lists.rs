//! [`ResourceList`](super::ResourceList) wiring for the netguard list types.

use crate::common::{ApplyDefault, ListMeta};
use crate::netguard::v1beta1;
use crate::storage::ResourceList;

macro_rules! impl_resource_list {
    ($list:ty, $item:ty) => {
        impl ResourceList<$item> for $list {
            fn from_items(items: Vec<$item>, resource_version: Option<String>) -> Self {
                let mut list = Self {
                    type_meta: Default::default(),
                    metadata: Some(ListMeta {
                        resource_version,
                        ..Default::default()
                    }),
                    items,
                };
                list.apply_default();
                list
            }
        }
    };
}

impl_resource_list!(v1beta1::ServiceList, v1beta1::Service);
impl_resource_list!(v1beta1::ServiceAliasList, v1beta1::ServiceAlias);
impl_resource_list!(v1beta1::AddressGroupList, v1beta1::AddressGroup);
impl_resource_list!(v1beta1::AddressGroupBindingList, v1beta1::AddressGroupBinding);
impl_resource_list!(
    v1beta1::AddressGroupPortMappingList,
    v1beta1::AddressGroupPortMapping
);
impl_resource_list!(
    v1beta1::AddressGroupBindingPolicyList,
    v1beta1::AddressGroupBindingPolicy
);
impl_resource_list!(v1beta1::RuleS2SList, v1beta1::RuleS2S);
impl_resource_list!(v1beta1::IEAgAgRuleList, v1beta1::IEAgAgRule);
impl_resource_list!(v1beta1::NetworkList, v1beta1::Network);
impl_resource_list!(v1beta1::NetworkBindingList, v1beta1::NetworkBinding);
impl_resource_list!(v1beta1::HostList, v1beta1::Host);
impl_resource_list!(v1beta1::HostBindingList, v1beta1::HostBinding);
