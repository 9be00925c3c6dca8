//! Metadata row codec and the monotonic versioning store.
//!
//! Every non-condition-only write inserts a fresh `k8s_metadata` row; the
//! BIGSERIAL primary key of that row is the system-wide monotonic resource
//! version. Existing rows are never re-versioned: observing a new version
//! always requires a new row.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use crate::common::ident::ResourceIdentifier;
use crate::common::meta::{Condition, ManagedFieldsEntry, ObjectMeta};
use crate::common::time::Timestamp;
use crate::errors::{NetguardError, Result};

/// The live metadata of an existing resource row, as consulted by upserts.
#[derive(Debug, Clone)]
pub(crate) struct ExistingMeta {
    pub uid: String,
    pub generation: i64,
    pub deletion_timestamp: Option<DateTime<Utc>>,
}

/// Looks up the live metadata behind the resource row named by `id`.
pub(crate) async fn fetch_existing(
    conn: &mut PgConnection,
    table: &str,
    id: &ResourceIdentifier,
) -> Result<Option<ExistingMeta>> {
    let query = format!(
        "SELECT m.uid, m.generation, m.deletion_timestamp
         FROM {table} r
         JOIN k8s_metadata m ON m.resource_version = r.resource_version
         WHERE r.namespace = $1 AND r.name = $2"
    );
    let row = sqlx::query(&query)
        .bind(&id.namespace)
        .bind(&id.name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| NetguardError::database(format!("lookup meta for {}", id), e))?;
    row.map(|row| {
        Ok(ExistingMeta {
            uid: row.try_get("uid").map_err(internal)?,
            generation: row.try_get("generation").map_err(internal)?,
            deletion_timestamp: row.try_get("deletion_timestamp").map_err(internal)?,
        })
    })
    .transpose()
}

/// Inserts a new metadata row and returns the freshly minted resource
/// version.
pub(crate) async fn insert_meta(conn: &mut PgConnection, meta: &ObjectMeta) -> Result<i64> {
    let labels = serde_json::to_value(&meta.labels).map_err(codec)?;
    let annotations = serde_json::to_value(&meta.annotations).map_err(codec)?;
    let conditions = serde_json::to_value(&meta.conditions).map_err(codec)?;
    let managed_fields = serde_json::to_value(&meta.managed_fields).map_err(codec)?;
    let created_at = meta
        .creation_timestamp
        .as_ref()
        .map(|ts| *ts.as_datetime())
        .unwrap_or_else(Utc::now);

    let version: i64 = sqlx::query_scalar(
        "INSERT INTO k8s_metadata
            (labels, annotations, conditions, finalizers, managed_fields,
             uid, generation, observed_generation, deletion_timestamp,
             created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
         RETURNING resource_version",
    )
    .bind(labels)
    .bind(annotations)
    .bind(conditions)
    .bind(&meta.finalizers)
    .bind(managed_fields)
    .bind(meta.uid())
    .bind(meta.generation())
    .bind(meta.observed_generation())
    .bind(meta.deletion_timestamp.as_ref().map(|ts| *ts.as_datetime()))
    .bind(created_at)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| NetguardError::database("mint resource version", e))?;

    Ok(version)
}

/// Rewrites only the conditions column of the metadata row the resource row
/// currently points at. The resource row and its version FK are untouched
/// and no new version is minted.
pub(crate) async fn update_conditions(
    conn: &mut PgConnection,
    table: &str,
    id: &ResourceIdentifier,
    conditions: &[Condition],
) -> Result<u64> {
    let conditions = serde_json::to_value(conditions).map_err(codec)?;
    let query = format!(
        "UPDATE k8s_metadata m
         SET conditions = $3, updated_at = now()
         FROM {table} r
         WHERE r.namespace = $1 AND r.name = $2
           AND m.resource_version = r.resource_version"
    );
    let result = sqlx::query(&query)
        .bind(&id.namespace)
        .bind(&id.name)
        .bind(conditions)
        .execute(&mut *conn)
        .await
        .map_err(|e| NetguardError::database(format!("update conditions for {}", id), e))?;
    Ok(result.rows_affected())
}

/// Stamps the deletion timestamp on the metadata of the given rows. Once
/// set the timestamp is kept, so a second stamp never moves it backwards,
/// and reconcilers refuse to re-create rows carrying it.
pub(crate) async fn stamp_deletion(
    conn: &mut PgConnection,
    table: &str,
    ids: &[ResourceIdentifier],
) -> Result<u64> {
    let mut total = 0;
    for id in ids {
        let query = format!(
            "UPDATE k8s_metadata m
             SET deletion_timestamp = COALESCE(m.deletion_timestamp, now()), updated_at = now()
             FROM {table} r
             WHERE r.namespace = $1 AND r.name = $2
               AND m.resource_version = r.resource_version"
        );
        let result = sqlx::query(&query)
            .bind(&id.namespace)
            .bind(&id.name)
            .execute(&mut *conn)
            .await
            .map_err(|e| NetguardError::database(format!("stamp deletion for {}", id), e))?;
        total += result.rows_affected();
    }
    Ok(total)
}

/// Rebuilds an ObjectMeta from a row that selected the `m.*` metadata
/// columns next to the resource columns.
pub(crate) fn meta_from_row(row: &PgRow, id: &ResourceIdentifier) -> Result<ObjectMeta> {
    let labels: serde_json::Value = row.try_get("labels").map_err(internal)?;
    let annotations: serde_json::Value = row.try_get("annotations").map_err(internal)?;
    let conditions: serde_json::Value = row.try_get("conditions").map_err(internal)?;
    let managed_fields: serde_json::Value = row.try_get("managed_fields").map_err(internal)?;
    let finalizers: Vec<String> = row.try_get("finalizers").map_err(internal)?;
    let version: i64 = row.try_get("resource_version").map_err(internal)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(internal)?;
    let deletion_timestamp: Option<DateTime<Utc>> =
        row.try_get("deletion_timestamp").map_err(internal)?;

    let conditions: Vec<Condition> = serde_json::from_value(conditions).map_err(codec)?;
    let managed_fields: Vec<ManagedFieldsEntry> =
        serde_json::from_value(managed_fields).map_err(codec)?;

    Ok(ObjectMeta {
        name: Some(id.name.clone()),
        generate_name: None,
        namespace: if id.namespace.is_empty() {
            None
        } else {
            Some(id.namespace.clone())
        },
        uid: Some(row.try_get("uid").map_err(internal)?),
        resource_version: Some(version.to_string()),
        generation: Some(row.try_get("generation").map_err(internal)?),
        observed_generation: Some(row.try_get("observed_generation").map_err(internal)?),
        labels: serde_json::from_value(labels).map_err(codec)?,
        annotations: serde_json::from_value(annotations).map_err(codec)?,
        finalizers,
        conditions,
        managed_fields,
        creation_timestamp: Some(Timestamp::from_datetime(created_at)),
        deletion_timestamp: deletion_timestamp.map(Timestamp::from_datetime),
    })
}

/// The metadata columns every resource read selects alongside its own.
pub(crate) const META_COLUMNS: &str = "m.labels, m.annotations, m.conditions, m.finalizers, \
     m.managed_fields, m.uid, m.generation, m.observed_generation, m.resource_version, \
     m.created_at, m.deletion_timestamp";

fn codec(err: serde_json::Error) -> NetguardError {
    NetguardError::Internal(format!("metadata codec: {}", err))
}

fn internal(err: sqlx::Error) -> NetguardError {
    NetguardError::Internal(format!("metadata row decode: {}", err))
}
