//! Network and NetworkBinding row storage.
//!
//! The CIDR lives in its own column so the `idx_networks_cidr_unique` index
//! can enforce global uniqueness; the writer pre-checks the index to name
//! the conflicting network, with constraint translation as the backstop for
//! racing inserts.

use sqlx::{PgConnection, Row};

use crate::common::HasObjectMeta;
use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;
use crate::pg::constraint;

pub(crate) const TABLE: &str = "networks";
pub(crate) const BINDING_TABLE: &str = "network_bindings";

pub(crate) async fn upsert_row(
    conn: &mut PgConnection,
    obj: &internal::Network,
    version: i64,
) -> Result<u64> {
    let id = obj.identifier();
    let cidr = obj
        .spec
        .as_ref()
        .map(|s| s.cidr.clone())
        .unwrap_or_default();
    let status = serde_json::to_value(&obj.status)
        .map_err(|e| NetguardError::Internal(format!("network status codec: {}", e)))?;

    // Resolve the conflicting row by name before the index round-trip does.
    let existing = sqlx::query(
        "SELECT namespace, name FROM networks
         WHERE cidr = $1 AND NOT (namespace = $2 AND name = $3)",
    )
    .bind(&cidr)
    .bind(&id.namespace)
    .bind(&id.name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| NetguardError::database(format!("check cidr for {}", id), e))?;
    if let Some(row) = existing {
        let name: String = row
            .try_get("name")
            .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
        return Err(NetguardError::CidrOverlap {
            cidr,
            network: name,
        });
    }

    let result = sqlx::query(
        "INSERT INTO networks (namespace, name, cidr, status, resource_version)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (namespace, name)
         DO UPDATE SET cidr = EXCLUDED.cidr, status = EXCLUDED.status,
                       resource_version = EXCLUDED.resource_version",
    )
    .bind(&id.namespace)
    .bind(&id.name)
    .bind(&cidr)
    .bind(status)
    .bind(version)
    .execute(&mut *conn)
    .await
    .map_err(|e| match constraint::unique_constraint_name(&e) {
        Some(name) => constraint::constraint_error(&name, &cidr, "", "")
            .unwrap_or_else(|| NetguardError::database(format!("upsert network {}", id), e)),
        None => NetguardError::database(format!("upsert network {}", id), e),
    })?;
    Ok(result.rows_affected())
}

fn network_from(decoded: super::DecodedRow) -> Result<internal::Network> {
    let cidr: String = decoded
        .row
        .try_get("cidr")
        .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
    let status: serde_json::Value = decoded
        .row
        .try_get("status")
        .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
    Ok(internal::Network {
        spec: Some(internal::NetworkSpec { cidr }),
        status: serde_json::from_value(status)
            .map_err(|e| NetguardError::Internal(format!("network status codec: {}", e)))?,
        metadata: decoded.metadata,
    })
}

pub(crate) async fn list(conn: &mut PgConnection, scope: &Scope) -> Result<Vec<internal::Network>> {
    let rows = super::fetch_rows(conn, TABLE, "r.cidr, r.status", scope).await?;
    rows.into_iter().map(network_from).collect()
}

pub(crate) async fn get(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::Network>> {
    let row = super::fetch_row(conn, TABLE, "r.cidr, r.status", id).await?;
    row.map(network_from).transpose()
}

// ============================================================================
// NetworkBinding
// ============================================================================

pub(crate) async fn upsert_binding_row(
    conn: &mut PgConnection,
    obj: &internal::NetworkBinding,
    version: i64,
) -> Result<u64> {
    let spec = serde_json::to_value(&obj.spec)
        .map_err(|e| NetguardError::Internal(format!("network binding spec codec: {}", e)))?;
    super::upsert_json_row(conn, BINDING_TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list_bindings(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::NetworkBinding>> {
    let rows = super::fetch_rows(conn, BINDING_TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::NetworkBinding {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get_binding(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::NetworkBinding>> {
    let row = super::fetch_row(conn, BINDING_TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::NetworkBinding {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}
