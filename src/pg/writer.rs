//! The transactional writer aggregate.
//!
//! One writer owns one transaction for the duration of a verb. Per kind it
//! exposes scoped sync and delete-by-identifiers; commit folds the writer's
//! affected-row count into the shared sync_status row inside the same
//! transaction, and abort is idempotent.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use sqlx::{PgConnection, Postgres, Transaction};
use tracing::{debug, warn};

use crate::common::HasObjectMeta;
use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;
use crate::pg::{meta, tables};

/// How a Sync call treats the rows in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncOp {
    /// Pre-delete rows matched by a non-empty scope, then upsert each item.
    #[default]
    Upsert,
    /// Same as Upsert; marks that the caller sent the complete desired set
    /// within scope.
    FullSync,
    /// Delete exactly the items passed; the scoped pre-delete is skipped.
    Delete,
}

impl std::str::FromStr for SyncOp {
    type Err = NetguardError;

    /// Parses the wire form of a sync operation; anything else is the typed
    /// unsupported-sync-operation error.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Upsert" => Ok(SyncOp::Upsert),
            "FullSync" => Ok(SyncOp::FullSync),
            "Delete" => Ok(SyncOp::Delete),
            other => Err(NetguardError::UnsupportedSyncOp(other.to_string())),
        }
    }
}

/// Options accepted by every per-kind sync operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOpts {
    pub op: SyncOp,
    /// Update only the conditions on the items' metadata; the resource rows
    /// stay untouched and no resource version is minted.
    pub condition_only: bool,
}

/// Budget for one condition-only round-trip, so a slow reconciler cannot
/// wedge the commit path of the verb that spawned it.
const CONDITION_TIMEOUT: Duration = Duration::from_secs(3);

/// A writer bound to one open transaction.
pub struct Writer {
    tx: Option<Transaction<'static, Postgres>>,
    affected: AtomicI64,
}

impl Writer {
    pub(crate) fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Some(tx),
            affected: AtomicI64::new(0),
        }
    }

    pub(crate) fn conn(&mut self) -> Result<&mut PgConnection> {
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => Err(NetguardError::Internal(
                "writer transaction already finished".to_string(),
            )),
        }
    }

    /// Rows mutated so far within this writer's transaction.
    pub fn affected_rows(&self) -> i64 {
        self.affected.load(Ordering::Relaxed)
    }

    /// Commits the transaction. A positive affected-row count is added to
    /// the shared sync_status row first, under the same transaction.
    pub async fn commit(mut self) -> Result<()> {
        let Some(mut tx) = self.tx.take() else {
            return Ok(());
        };
        let total = self.affected.load(Ordering::Relaxed);
        if total > 0 {
            sqlx::query(
                "INSERT INTO sync_status (id, updated_at, total_operations)
                 VALUES (1, now(), $1)
                 ON CONFLICT (id) DO UPDATE
                 SET updated_at = now(),
                     total_operations = sync_status.total_operations + EXCLUDED.total_operations",
            )
            .bind(total)
            .execute(&mut *tx)
            .await
            .map_err(|e| NetguardError::database("update sync status", e))?;
        }
        tx.commit()
            .await
            .map_err(|e| NetguardError::database("commit", e))?;
        debug!(affected = total, "writer committed");
        Ok(())
    }

    /// Rolls back the transaction. Safe to call more than once and after
    /// commit.
    pub async fn abort(&mut self) {
        if let Some(tx) = self.tx.take() {
            if let Err(err) = tx.rollback().await {
                warn!(error = %err, "rollback failed");
            }
        }
    }

    /// Reads back the shared sync status row within this transaction.
    pub async fn get_sync_status(&mut self) -> Result<Option<super::SyncStatus>> {
        super::fetch_sync_status(self.conn()?).await
    }
}

/// Snapshot of the live metadata taken before a scoped pre-delete, so
/// surviving items keep their uid and advance their generation.
async fn snapshot_existing<T: HasObjectMeta>(
    conn: &mut PgConnection,
    table: &str,
    items: &[T],
) -> Result<Vec<Option<meta::ExistingMeta>>> {
    let mut snapshots = Vec::with_capacity(items.len());
    for item in items {
        snapshots.push(meta::fetch_existing(conn, table, &item.identifier()).await?);
    }
    Ok(snapshots)
}

/// Adopts the identity of the row the item replaces: an existing uid is
/// kept, and the generation advances past the stored one.
fn adopt_identity<T: HasObjectMeta>(item: &mut T, existing: Option<meta::ExistingMeta>) {
    match existing {
        Some(existing) => {
            if item.meta().uid().is_empty() {
                item.meta_mut().uid = Some(existing.uid);
            }
            item.meta_mut().generation = Some(existing.generation + 1);
        }
        None => {
            if item.meta().uid().is_empty() {
                item.meta_mut().touch_on_create();
            }
        }
    }
}

macro_rules! impl_sync_kind {
    ($sync_fn:ident, $delete_fn:ident, $ty:ty, $table:expr, $resource:literal, $upsert:path) => {
        impl Writer {
            /// Synchronizes this kind within the given scope. See [`SyncOpts`].
            pub async fn $sync_fn(
                &mut self,
                mut items: Vec<$ty>,
                scope: &Scope,
                opts: &SyncOpts,
            ) -> Result<Vec<$ty>> {
                if opts.condition_only {
                    let conn = self.conn()?;
                    let mut touched: u64 = 0;
                    for item in &items {
                        let id = item.identifier();
                        let updated = tokio::time::timeout(
                            CONDITION_TIMEOUT,
                            meta::update_conditions(conn, $table, &id, &item.meta().conditions),
                        )
                        .await
                        .map_err(|_| NetguardError::Timeout {
                            operation: format!("condition update for {}", id),
                            timeout: CONDITION_TIMEOUT,
                        })??;
                        if updated == 0 {
                            return Err(NetguardError::not_found(
                                "netguard.sgroups.io",
                                $resource,
                                &id.key(),
                            ));
                        }
                        touched += updated;
                    }
                    self.affected.fetch_add(touched as i64, Ordering::Relaxed);
                    return Ok(items);
                }

                match opts.op {
                    SyncOp::Delete => {
                        let ids: Vec<ResourceIdentifier> =
                            items.iter().map(|i| i.identifier()).collect();
                        self.$delete_fn(&ids).await?;
                    }
                    SyncOp::Upsert | SyncOp::FullSync => {
                        let conn = self.conn()?;
                        // Adopt identity before the pre-delete so survivors
                        // of a full-sync keep their uid.
                        let snapshots = snapshot_existing(conn, $table, &items).await?;
                        let mut count: u64 = 0;
                        if !scope.is_empty() {
                            count += tables::delete_in_scope(conn, $table, scope).await?;
                        }
                        for (item, existing) in items.iter_mut().zip(snapshots) {
                            // a row already marked for deletion must not be
                            // resurrected by a racing reconciler
                            if existing
                                .as_ref()
                                .is_some_and(|e| e.deletion_timestamp.is_some())
                            {
                                return Err(NetguardError::Forbidden(format!(
                                    "{} is being deleted",
                                    item.identifier()
                                )));
                            }
                            adopt_identity(item, existing);
                            let version = meta::insert_meta(conn, item.meta()).await?;
                            item.meta_mut().touch_on_write(version);
                            // resource row plus the freshly minted metadata row
                            count += $upsert(conn, item, version).await? + 1;
                        }
                        self.affected.fetch_add(count as i64, Ordering::Relaxed);
                    }
                }
                Ok(items)
            }

            /// Deletes the named rows: their metadata is stamped with a
            /// deletion timestamp first, then the resource rows are removed.
            pub async fn $delete_fn(&mut self, ids: &[ResourceIdentifier]) -> Result<()> {
                let conn = self.conn()?;
                let stamped = meta::stamp_deletion(conn, $table, ids).await?;
                let removed = tables::delete_by_ids(conn, $table, ids).await?;
                self.affected
                    .fetch_add((stamped + removed) as i64, Ordering::Relaxed);
                Ok(())
            }
        }
    };
}

impl_sync_kind!(
    sync_services,
    delete_services_by_ids,
    internal::Service,
    tables::service::TABLE,
    "services",
    tables::service::upsert_row
);
impl_sync_kind!(
    sync_service_aliases,
    delete_service_aliases_by_ids,
    internal::ServiceAlias,
    tables::service::ALIAS_TABLE,
    "servicealiases",
    tables::service::upsert_alias_row
);
impl_sync_kind!(
    sync_address_groups,
    delete_address_groups_by_ids,
    internal::AddressGroup,
    tables::address_group::TABLE,
    "addressgroups",
    tables::address_group::upsert_row
);
impl_sync_kind!(
    sync_address_group_bindings,
    delete_address_group_bindings_by_ids,
    internal::AddressGroupBinding,
    tables::binding::BINDING_TABLE,
    "addressgroupbindings",
    tables::binding::upsert_binding_row
);
impl_sync_kind!(
    sync_address_group_port_mappings,
    delete_address_group_port_mappings_by_ids,
    internal::AddressGroupPortMapping,
    tables::binding::PORT_MAPPING_TABLE,
    "addressgroupportmappings",
    tables::binding::upsert_port_mapping_row
);
impl_sync_kind!(
    sync_address_group_binding_policies,
    delete_address_group_binding_policies_by_ids,
    internal::AddressGroupBindingPolicy,
    tables::binding::POLICY_TABLE,
    "addressgroupbindingpolicies",
    tables::binding::upsert_policy_row
);
impl_sync_kind!(
    sync_rules_s2s,
    delete_rules_s2s_by_ids,
    internal::RuleS2S,
    tables::rule::RULE_S2S_TABLE,
    "rules2s",
    tables::rule::upsert_rule_s2s_row
);
impl_sync_kind!(
    sync_ie_ag_ag_rules,
    delete_ie_ag_ag_rules_by_ids,
    internal::IEAgAgRule,
    tables::rule::IE_AG_AG_TABLE,
    "ieagagrules",
    tables::rule::upsert_ie_ag_ag_row
);
impl_sync_kind!(
    sync_networks,
    delete_networks_by_ids,
    internal::Network,
    tables::network::TABLE,
    "networks",
    tables::network::upsert_row
);
impl_sync_kind!(
    sync_network_bindings,
    delete_network_bindings_by_ids,
    internal::NetworkBinding,
    tables::network::BINDING_TABLE,
    "networkbindings",
    tables::network::upsert_binding_row
);
impl_sync_kind!(
    sync_hosts,
    delete_hosts_by_ids,
    internal::Host,
    tables::host::TABLE,
    "hosts",
    tables::host::upsert_row
);
impl_sync_kind!(
    sync_host_bindings,
    delete_host_bindings_by_ids,
    internal::HostBinding,
    tables::host::BINDING_TABLE,
    "hostbindings",
    tables::host::upsert_binding_row
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_sync_op_wire_parsing() {
        assert_eq!(SyncOp::from_str("Upsert").unwrap(), SyncOp::Upsert);
        assert_eq!(SyncOp::from_str("FullSync").unwrap(), SyncOp::FullSync);
        assert_eq!(SyncOp::from_str("Delete").unwrap(), SyncOp::Delete);
        assert!(matches!(
            SyncOp::from_str("Truncate"),
            Err(NetguardError::UnsupportedSyncOp(_))
        ));
    }

    #[test]
    fn test_default_opts_are_plain_upsert() {
        let opts = SyncOpts::default();
        assert_eq!(opts.op, SyncOp::Upsert);
        assert!(!opts.condition_only);
    }
}
