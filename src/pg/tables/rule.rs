//! Rule row storage: RuleS2S and IEAgAgRule.

use sqlx::PgConnection;

use crate::common::HasObjectMeta;
use crate::common::ident::{ResourceIdentifier, Scope};
use crate::errors::{NetguardError, Result};
use crate::netguard::internal;

pub(crate) const RULE_S2S_TABLE: &str = "rules_s2s";
pub(crate) const IE_AG_AG_TABLE: &str = "ie_ag_ag_rules";

pub(crate) async fn upsert_rule_s2s_row(
    conn: &mut PgConnection,
    obj: &internal::RuleS2S,
    version: i64,
) -> Result<u64> {
    let spec = serde_json::to_value(&obj.spec)
        .map_err(|e| NetguardError::Internal(format!("rule spec codec: {}", e)))?;
    super::upsert_json_row(conn, RULE_S2S_TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list_rules_s2s(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::RuleS2S>> {
    let rows = super::fetch_rows(conn, RULE_S2S_TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::RuleS2S {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get_rule_s2s(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::RuleS2S>> {
    let row = super::fetch_row(conn, RULE_S2S_TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::RuleS2S {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}

pub(crate) async fn upsert_ie_ag_ag_row(
    conn: &mut PgConnection,
    obj: &internal::IEAgAgRule,
    version: i64,
) -> Result<u64> {
    let spec = serde_json::to_value(&obj.spec)
        .map_err(|e| NetguardError::Internal(format!("rule spec codec: {}", e)))?;
    super::upsert_json_row(conn, IE_AG_AG_TABLE, &obj.identifier(), &spec, version).await
}

pub(crate) async fn list_ie_ag_ag_rules(
    conn: &mut PgConnection,
    scope: &Scope,
) -> Result<Vec<internal::IEAgAgRule>> {
    let rows = super::fetch_rows(conn, IE_AG_AG_TABLE, "r.spec", scope).await?;
    rows.into_iter()
        .map(|decoded| {
            Ok(internal::IEAgAgRule {
                spec: super::spec_from_row(&decoded.row)?,
                metadata: decoded.metadata,
            })
        })
        .collect()
}

pub(crate) async fn get_ie_ag_ag_rule(
    conn: &mut PgConnection,
    id: &ResourceIdentifier,
) -> Result<Option<internal::IEAgAgRule>> {
    let row = super::fetch_row(conn, IE_AG_AG_TABLE, "r.spec", id).await?;
    row.map(|decoded| {
        Ok(internal::IEAgAgRule {
            spec: super::spec_from_row(&decoded.row)?,
            metadata: decoded.metadata,
        })
    })
    .transpose()
}
