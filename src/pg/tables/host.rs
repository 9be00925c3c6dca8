//! Host and HostBinding row storage.
//!
//! Host UUIDs are globally unique (`hosts_uuid_key`) and a host joins at
//! most one address group
//! (`host_bindings_host_namespace_host_name_key`).

use sqlx::{PgConnection, Row};

use crate::common::HasObjectMeta;
use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;
use crate::pg::constraint;

pub(crate) const TABLE: &str = "hosts";
pub(crate) const BINDING_TABLE: &str = "host_bindings";

pub(crate) async fn upsert_row(
    conn: &mut PgConnection,
    obj: &internal::Host,
    version: i64,
) -> Result<u64> {
    let id = obj.identifier();
    let (uuid, host_name) = obj
        .spec
        .as_ref()
        .map(|s| (s.uuid.clone(), s.host_name.clone()))
        .unwrap_or_default();
    let status = serde_json::to_value(&obj.status)
        .map_err(|e| NetguardError::Internal(format!("host status codec: {}", e)))?;

    let existing = sqlx::query(
        "SELECT namespace, name FROM hosts
         WHERE uuid = $1 AND NOT (namespace = $2 AND name = $3)",
    )
    .bind(&uuid)
    .bind(&id.namespace)
    .bind(&id.name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| NetguardError::database(format!("check uuid for {}", id), e))?;
    if let Some(row) = existing {
        let name: String = row
            .try_get("name")
            .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
        return Err(NetguardError::UuidAlreadyExists { uuid, host: name });
    }

    let result = sqlx::query(
        "INSERT INTO hosts (namespace, name, uuid, host_name, status, resource_version)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (namespace, name)
         DO UPDATE SET uuid = EXCLUDED.uuid, host_name = EXCLUDED.host_name,
                       status = EXCLUDED.status,
                       resource_version = EXCLUDED.resource_version",
    )
    .bind(&id.namespace)
    .bind(&id.name)
    .bind(&uuid)
    .bind(&host_name)
    .bind(status)
    .bind(version)
    .execute(&mut *conn)
    .await
    .map_err(|e| match constraint::unique_constraint_name(&e) {
        Some(name) => constraint::constraint_error(&name, "", &uuid, &id.name)
            .unwrap_or_else(|| NetguardError::database(format!("upsert host {}", id), e)),
        None => NetguardError::database(format!("upsert host {}", id), e),
    })?;
    Ok(result.rows_affected())
}

fn host_from(decoded: super::DecodedRow) -> Result<internal::Host> {
    let uuid: String = decoded
        .row
        .try_get("uuid")
        .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
    let host_name: String = decoded
        .row
        .try_get("host_name")
        .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
    let status: serde_json::Value = decoded
        .row
        .try_get("status")
        .map_err(|e| NetguardError::Internal(format!("row decode: {}", e)))?;
    Ok(internal::Host {
        spec: Some(internal::HostSpec { uuid, host_name }),
        status: serde_json::from_value(status)
            .map_err(|e| NetguardError::Internal(format!("host status codec: {}", e)))?,
        metadata: decoded.metadata,
    })
}

pub(crate) async fn list(conn: &mut PgConnection, scope: &Scope) -> Result<Vec<internal::Host>> {
    let rows = super::fetch_rows(conn, TABLE, "r.uuid, r.host_name, r.status", scope).await?;
    rows.into_iter().map(host_from).collect()
}

pub(crate) async fn get(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::Host>> {
    let row = super::fetch_row(conn, TABLE, "r.uuid, r.host_name, r.status", id).await?;
    row.map(host_from).transpose()
}

// ============================================================================
// HostBinding
// ============================================================================

pub(crate) async fn upsert_binding_row(
    conn: &mut PgConnection,
    obj: &internal::HostBinding,
    version: i64,
) -> Result<u64> {
    let id = obj.identifier();
    let host_ref = obj.spec.as_ref().map(|s| s.host_ref.clone()).unwrap_or_default();
    let host_namespace = if host_ref.namespace.is_empty() {
        id.namespace.clone()
    } else {
        host_ref.namespace.clone()
    };
    let spec = serde_json::to_value(&obj.spec)
        .map_err(|e| NetguardError::Internal(format!("host binding spec codec: {}", e)))?;

    let existing = sqlx::query(
        "SELECT name FROM host_bindings
         WHERE host_namespace = $1 AND host_name = $2
           AND NOT (namespace = $3 AND name = $4)",
    )
    .bind(&host_namespace)
    .bind(&host_ref.name)
    .bind(&id.namespace)
    .bind(&id.name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| NetguardError::database(format!("check host binding for {}", id), e))?;
    if existing.is_some() {
        return Err(NetguardError::HostAlreadyBound {
            host: host_ref.name,
        });
    }

    let result = sqlx::query(
        "INSERT INTO host_bindings
            (namespace, name, host_namespace, host_name, spec, resource_version)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (namespace, name)
         DO UPDATE SET host_namespace = EXCLUDED.host_namespace,
                       host_name = EXCLUDED.host_name, spec = EXCLUDED.spec,
                       resource_version = EXCLUDED.resource_version",
    )
    .bind(&id.namespace)
    .bind(&id.name)
    .bind(&host_namespace)
    .bind(&host_ref.name)
    .bind(spec)
    .bind(version)
    .execute(&mut *conn)
    .await
    .map_err(|e| match constraint::unique_constraint_name(&e) {
        Some(name) => constraint::constraint_error(&name, "", "", &host_ref.name)
            .unwrap_or_else(|| NetguardError::database(format!("upsert host binding {}", id), e)),
        None => NetguardError::database(format!("upsert host binding {}", id), e),
    })?;
    Ok(result.rows_affected())
}

pub(crate) async fn list_bindings(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::HostBinding>> {
    let rows = super::fetch_rows(conn, BINDING_TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::HostBinding {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get_binding(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::HostBinding>> {
    let row = super::fetch_row(conn, BINDING_TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::HostBinding {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}
