//! Read-side accessors.
//!
//! A reader either draws connections from the pool or rides the transaction
//! of an open writer, in which case it observes that writer's uncommitted
//! changes.

use sqlx::{PgConnection, PgPool};

use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;
use crate::pg::tables;
use crate::pg::writer::Writer;

enum ReaderConn<'a> {
    Pool(&'a PgPool),
    Writer(&'a mut Writer),
}

/// A reader over committed state, or over a writer's transaction when built
/// with [`crate::pg::Registry::reader_from_writer`].
pub struct Reader<'a> {
    conn: ReaderConn<'a>,
}

impl<'a> Reader<'a> {
    pub(crate) fn from_pool(pool: &'a PgPool) -> Self {
        Self {
            conn: ReaderConn::Pool(pool),
        }
    }

    pub(crate) fn from_writer(writer: &'a mut Writer) -> Self {
        Self {
            conn: ReaderConn::Writer(writer),
        }
    }

    async fn acquire(&mut self) -> Result<Conn<'_>> {
        match &mut self.conn {
            ReaderConn::Pool(pool) => {
                let conn = pool
                    .acquire()
                    .await
                    .map_err(|e| NetguardError::database("acquire connection", e))?;
                Ok(Conn::Pooled(conn))
            }
            ReaderConn::Writer(writer) => Ok(Conn::Borrowed(writer.conn()?)),
        }
    }
}

enum Conn<'c> {
    Pooled(sqlx::pool::PoolConnection<sqlx::Postgres>),
    Borrowed(&'c mut PgConnection),
}

impl Conn<'_> {
    fn as_mut(&mut self) -> &mut PgConnection {
        match self {
            Conn::Pooled(conn) => &mut *conn,
            Conn::Borrowed(conn) => conn,
        }
    }
}

macro_rules! impl_read_kind {
    ($list_fn:ident, $get_fn:ident, $ty:ty, $list:path, $get:path, $resource:literal) => {
        impl Reader<'_> {
            /// Lists this kind within the scope; an empty scope reads
            /// cluster-wide. Rows come back in (namespace, name) order.
            pub async fn $list_fn(&mut self, scope: &Scope) -> Result<Vec<$ty>> {
                let mut conn = self.acquire().await?;
                $list(conn.as_mut(), scope).await
            }

            /// Fetches one object by identifier.
            pub async fn $get_fn(&mut self, id: &ResourceIdentifier) -> Result<$ty> {
                let mut conn = self.acquire().await?;
                $get(conn.as_mut(), id)
                    .await?
                    .ok_or_else(|| {
                        NetguardError::not_found("netguard.sgroups.io", $resource, &id.name)
                    })
            }
        }
    };
}

impl_read_kind!(
    list_services,
    get_service_by_id,
    internal::Service,
    tables::service::list,
    tables::service::get,
    "services"
);
impl_read_kind!(
    list_service_aliases,
    get_service_alias_by_id,
    internal::ServiceAlias,
    tables::service::list_aliases,
    tables::service::get_alias,
    "servicealiases"
);
impl_read_kind!(
    list_address_groups,
    get_address_group_by_id,
    internal::AddressGroup,
    tables::address_group::list,
    tables::address_group::get,
    "addressgroups"
);
impl_read_kind!(
    list_address_group_bindings,
    get_address_group_binding_by_id,
    internal::AddressGroupBinding,
    tables::binding::list_bindings,
    tables::binding::get_binding,
    "addressgroupbindings"
);
impl_read_kind!(
    list_address_group_port_mappings,
    get_address_group_port_mapping_by_id,
    internal::AddressGroupPortMapping,
    tables::binding::list_port_mappings,
    tables::binding::get_port_mapping,
    "addressgroupportmappings"
);
impl_read_kind!(
    list_address_group_binding_policies,
    get_address_group_binding_policy_by_id,
    internal::AddressGroupBindingPolicy,
    tables::binding::list_policies,
    tables::binding::get_policy,
    "addressgroupbindingpolicies"
);
impl_read_kind!(
    list_rules_s2s,
    get_rule_s2s_by_id,
    internal::RuleS2S,
    tables::rule::list_rules_s2s,
    tables::rule::get_rule_s2s,
    "rules2s"
);
impl_read_kind!(
    list_ie_ag_ag_rules,
    get_ie_ag_ag_rule_by_id,
    internal::IEAgAgRule,
    tables::rule::list_ie_ag_ag_rules,
    tables::rule::get_ie_ag_ag_rule,
    "ieagagrules"
);
impl_read_kind!(
    list_networks,
    get_network_by_id,
    internal::Network,
    tables::network::list,
    tables::network::get,
    "networks"
);
impl_read_kind!(
    list_network_bindings,
    get_network_binding_by_id,
    internal::NetworkBinding,
    tables::network::list_bindings,
    tables::network::get_binding,
    "networkbindings"
);
impl_read_kind!(
    list_hosts,
    get_host_by_id,
    internal::Host,
    tables::host::list,
    tables::host::get,
    "hosts"
);
impl_read_kind!(
    list_host_bindings,
    get_host_binding_by_id,
    internal::HostBinding,
    tables::host::list_bindings,
    tables::host::get_binding,
    "hostbindings"
);

impl Reader<'_> {
    /// Reads the shared sync status row.
    pub async fn get_sync_status(&mut self) -> Result<Option<crate::pg::SyncStatus>> {
        let mut conn = self.acquire().await?;
        crate::pg::fetch_sync_status(conn.as_mut()).await
    }
}
