//! Per-kind row storage.
//!
//! Most kinds persist as `(namespace, name, spec JSONB, resource_version)`;
//! the generic helpers below cover them. Kinds carrying named unique
//! constraints (networks, hosts, host bindings) add their own columns and
//! SQL in their modules.

pub(crate) mod address_group;
pub(crate) mod binding;
pub(crate) mod host;
pub(crate) mod network;
pub(crate) mod rule;
pub(crate) mod service;

use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, QueryBuilder};

use crate::common::ident::{ResourceIdentifier, Scope};
use crate::common::meta::ObjectMeta;
use crate::errors::{NetguardError, Result};
use crate::pg::{meta, scope_sql};

/// Upserts one JSONB-spec resource row, pointing it at the freshly minted
/// metadata version.
pub(crate) async fn upsert_json_row(
    conn: &mut PgConnection,
    table: &str,
    id: &ResourceIdentifier,
    spec: &Value,
    version: i64,
) -> Result<u64> {
    let query = format!(
        "INSERT INTO {table} (namespace, name, spec, resource_version)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (namespace, name)
         DO UPDATE SET spec = EXCLUDED.spec, resource_version = EXCLUDED.resource_version"
    );
    let result = sqlx::query(&query)
        .bind(&id.namespace)
        .bind(&id.name)
        .bind(spec)
        .bind(version)
        .execute(&mut *conn)
        .await
        .map_err(|e| NetguardError::database(format!("upsert {} {}", table, id), e))?;
    Ok(result.rows_affected())
}

/// Deletes every row the scope matches. The scope must be non-empty; an
/// empty scope never reaches this function.
pub(crate) async fn delete_in_scope(
    conn: &mut PgConnection,
    table: &str,
    scope: &Scope,
) -> Result<u64> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {table}"));
    scope_sql::push_scope_predicate(&mut builder, scope, false)?;
    let result = builder
        .build()
        .execute(&mut *conn)
        .await
        .map_err(|e| NetguardError::database(format!("scoped delete from {}", table), e))?;
    Ok(result.rows_affected())
}

/// Deletes exactly the named rows.
pub(crate) async fn delete_by_ids(
    conn: &mut PgConnection,
    table: &str,
    ids: &[ResourceIdentifier],
) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new(format!("DELETE FROM {table} WHERE "));
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push("(namespace = ");
        builder.push_bind(&id.namespace);
        builder.push(" AND name = ");
        builder.push_bind(&id.name);
        builder.push(")");
    }
    let result = builder
        .build()
        .execute(&mut *conn)
        .await
        .map_err(|e| NetguardError::database(format!("delete from {}", table), e))?;
    Ok(result.rows_affected())
}

/// One decoded resource row: the raw columns and the rebuilt metadata.
pub(crate) struct DecodedRow {
    pub row: PgRow,
    pub metadata: ObjectMeta,
}

/// Fetches resource rows joined with their metadata. An empty scope reads
/// cluster-wide; rows come back in deterministic (namespace, name) order.
pub(crate) async fn fetch_rows(
    conn: &mut PgConnection,
    table: &str,
    columns: &str,
    scope: &Scope,
) -> Result<Vec<DecodedRow>> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT r.namespace, r.name, {columns}, {meta_cols}
         FROM {table} r
         JOIN k8s_metadata m ON m.resource_version = r.resource_version",
        meta_cols = meta::META_COLUMNS,
    ));
    if !scope.is_empty() {
        scope_sql::push_scope_predicate(&mut builder, scope, false)?;
    }
    builder.push(" ORDER BY r.namespace, r.name");
    let rows = builder
        .build()
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| NetguardError::database(format!("list {}", table), e))?;

    rows.into_iter().map(decode_row).collect()
}

/// Fetches a single resource row by identifier.
pub(crate) async fn fetch_row(
    conn: &mut PgConnection,
    table: &str,
    columns: &str,
    id: &ResourceIdentifier,
) -> Result<Option<DecodedRow>> {
    let query = format!(
        "SELECT r.namespace, r.name, {columns}, {meta_cols}
         FROM {table} r
         JOIN k8s_metadata m ON m.resource_version = r.resource_version
         WHERE r.namespace = $1 AND r.name = $2",
        meta_cols = meta::META_COLUMNS,
    );
    let row = sqlx::query(&query)
        .bind(&id.namespace)
        .bind(&id.name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| NetguardError::database(format!("get {} {}", table, id), e))?;
    row.map(decode_row).transpose()
}

fn decode_row(row: PgRow) -> Result<DecodedRow> {
    use sqlx::Row;
    let namespace: String = row
        .try_get("namespace")
        .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
    let id = ResourceIdentifier::new(namespace, name);
    let metadata = meta::meta_from_row(&row, &id)?;
    Ok(DecodedRow { row, metadata })
}

/// Decodes the `spec` JSONB column into the typed optional spec.
pub(crate) fn spec_from_row<S: serde::de::DeserializeOwned>(row: &PgRow) -> Result<Option<S>> {
    use sqlx::Row;
    let value: Value = row
        .try_get("spec")
        .map_err(|e| NetguardError::Internal(format!("spec decode: {}", e)))?;
    serde_json::from_value(value).map_err(|e| NetguardError::Internal(format!("spec codec: {}", e)))
}
