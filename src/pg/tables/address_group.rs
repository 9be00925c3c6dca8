//! AddressGroup row storage.

use sqlx::PgConnection;

use crate::common::HasObjectMeta;
use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;

pub(crate) const TABLE: &str = "address_groups";

pub(crate) async fn upsert_row(
    conn: &mut PgConnection,
    obj: &internal::AddressGroup,
    version: i64,
) -> Result<u64> {
    let spec = serde_json::to_value(&obj.spec)
        .map_err(|e| NetguardError::Internal(format!("address group spec codec: {}", e)))?;
    super::upsert_json_row(conn, TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::AddressGroup>> {
    let rows = super::fetch_rows(conn, TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::AddressGroup {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::AddressGroup>> {
    let row = super::fetch_row(conn, TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::AddressGroup {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}
