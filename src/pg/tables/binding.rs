//! Binding row storage: AddressGroupBinding, AddressGroupPortMapping and
//! AddressGroupBindingPolicy.

use sqlx::PgConnection;

use crate::common::HasObjectMeta;
use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;

pub(crate) const BINDING_TABLE: &str = "address_group_bindings";
pub(crate) const PORT_MAPPING_TABLE: &str = "address_group_port_mappings";
pub(crate) const POLICY_TABLE: &str = "address_group_binding_policies";

fn codec(kind: &str, err: serde_json::Error) -> NetguardError {
    NetguardError::Internal(format!("{} spec codec: {}", kind, err))
}

// ============================================================================
// AddressGroupBinding
// ============================================================================

pub(crate) async fn upsert_binding_row(
    conn: &mut PgConnection,
    obj: &internal::AddressGroupBinding,
    version: i64,
) -> Result<u64> {
    let spec = serde_json::to_value(&obj.spec).map_err(|e| codec("binding", e))?;
    super::upsert_json_row(conn, BINDING_TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list_bindings(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::AddressGroupBinding>> {
    let rows = super::fetch_rows(conn, BINDING_TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::AddressGroupBinding {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get_binding(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::AddressGroupBinding>> {
    let row = super::fetch_row(conn, BINDING_TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::AddressGroupBinding {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}

// ============================================================================
// AddressGroupPortMapping
// ============================================================================

pub(crate) async fn upsert_port_mapping_row(
    conn: &mut PgConnection,
    obj: &internal::AddressGroupPortMapping,
    version: i64,
) -> Result<u64> {
    // access ports live in the spec column like every other kind's payload
    let spec = serde_json::to_value(&obj.access_ports).map_err(|e| codec("port mapping", e))?;
    super::upsert_json_row(conn, PORT_MAPPING_TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list_port_mappings(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::AddressGroupPortMapping>> {
    let rows = super::fetch_rows(conn, PORT_MAPPING_TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::AddressGroupPortMapping {
                access_ports: super::spec_from_row::<Vec<internal::ServicePortsRef>>(&decoded.row)?
                    .unwrap_or_default(),
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get_port_mapping(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::AddressGroupPortMapping>> {
    let row = super::fetch_row(conn, PORT_MAPPING_TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::AddressGroupPortMapping {
            access_ports: super::spec_from_row::<Vec<internal::ServicePortsRef>>(&decoded.row)?
                .unwrap_or_default(),
            metadata: decoded.metadata,
        })
    })
    .transpose()
}

// ============================================================================
// AddressGroupBindingPolicy
// ============================================================================

pub(crate) async fn upsert_policy_row(
    conn: &mut PgConnection,
    obj: &internal::AddressGroupBindingPolicy,
    version: i64,
) -> Result<u64> {
    let spec = serde_json::to_value(&obj.spec).map_err(|e| codec("binding policy", e))?;
    super::upsert_json_row(conn, POLICY_TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list_policies(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::AddressGroupBindingPolicy>> {
    let rows = super::fetch_rows(conn, POLICY_TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::AddressGroupBindingPolicy {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get_policy(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::AddressGroupBindingPolicy>> {
    let row = super::fetch_row(conn, POLICY_TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::AddressGroupBindingPolicy {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}
