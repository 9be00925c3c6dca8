//! Service and ServiceAlias row storage.

use sqlx::PgConnection;

use crate::common::HasObjectMeta;
use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;

pub(crate) const TABLE: &str = "services";
pub(crate) const ALIAS_TABLE: &str = "service_aliases";

pub(crate) async fn upsert_row(
    conn: &mut PgConnection,
    obj: &internal::Service,
    version: i64,
) -> Result<u64> {
    let spec = serde_json::to_value(&obj.spec)
        .map_err(|e| NetguardError::Internal(format!("service spec codec: {}", e)))?;
    super::upsert_json_row(conn, TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::Service>> {
    let rows = super::fetch_rows(conn, TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::Service {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::Service>> {
    let row = super::fetch_row(conn, TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::Service {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}

pub(crate) async fn upsert_alias_row(
    conn: &mut PgConnection,
    obj: &internal::ServiceAlias,
    version: i64,
) -> Result<u64> {
    let spec = serde_json::to_value(&obj.spec)
        .map_err(|e| NetguardError::Internal(format!("service alias spec codec: {}", e)))?;
    super::upsert_json_row(conn, ALIAS_TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list_aliases(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::ServiceAlias>> {
    let rows = super::fetch_rows(conn, ALIAS_TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::ServiceAlias {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get_alias(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::ServiceAlias>> {
    let row = super::fetch_row(conn, ALIAS_TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::ServiceAlias {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}
