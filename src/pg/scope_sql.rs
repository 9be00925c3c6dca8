//! Scope to SQL predicate translation.
//!
//! Bulk reads and scoped pre-deletes share one predicate builder so that the
//! two paths can never diverge on what a scope selects. An empty scope is
//! rejected up front; callers decide whether that means "no pre-clean" or
//! "cluster-wide read" before reaching this module.

use sqlx::{Postgres, QueryBuilder};

use crate::common::ident::Scope;
use crate::errors::{NetguardError, Result};

/// Appends `WHERE …` (or `AND …` when `conjunction` is set) restricting
/// `namespace`/`name` columns to the rows the scope matches.
///
/// Returns an error for scope shapes that would not restrict anything: the
/// writer must never widen a malformed scope into a full-table operation.
pub(crate) fn push_scope_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    scope: &Scope,
    conjunction: bool,
) -> Result<()> {
    if scope.is_empty() {
        return Err(NetguardError::UnsupportedScope(
            "empty scope selects no rows".to_string(),
        ));
    }
    let (namespaces, exact) = scope.partition();
    for id in &exact {
        if id.namespace.is_empty() && id.name.is_empty() {
            return Err(NetguardError::UnsupportedScope(
                "identifier with empty namespace and name".to_string(),
            ));
        }
    }

    builder.push(if conjunction { " AND (" } else { " WHERE (" });
    let mut first = true;
    if !namespaces.is_empty() {
        builder.push("namespace = ANY(");
        builder.push_bind(namespaces);
        builder.push(")");
        first = false;
    }
    for id in exact {
        if !first {
            builder.push(" OR ");
        }
        first = false;
        builder.push("(namespace = ");
        builder.push_bind(id.namespace);
        builder.push(" AND name = ");
        builder.push_bind(id.name);
        builder.push(")");
    }
    builder.push(")");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ident::ResourceIdentifier;

    fn rendered(scope: &Scope) -> Result<String> {
        let mut builder = QueryBuilder::new("DELETE FROM services");
        push_scope_predicate(&mut builder, scope, false)?;
        Ok(builder.sql().to_string())
    }

    #[test]
    fn test_empty_scope_rejected() {
        assert!(matches!(
            rendered(&Scope::Empty),
            Err(NetguardError::UnsupportedScope(_))
        ));
        assert!(matches!(
            rendered(&Scope::IdentifierList(vec![])),
            Err(NetguardError::UnsupportedScope(_))
        ));
    }

    #[test]
    fn test_namespace_scope_renders_any() {
        let sql = rendered(&Scope::NamespaceOnly("app".to_string())).unwrap();
        assert!(sql.contains("namespace = ANY("), "sql: {}", sql);
        assert!(!sql.contains(" OR "), "sql: {}", sql);
    }

    #[test]
    fn test_identifier_list_renders_pairs() {
        let scope = Scope::IdentifierList(vec![
            ResourceIdentifier::new("app", "b1"),
            ResourceIdentifier::new("app", "b2"),
        ]);
        let sql = rendered(&scope).unwrap();
        assert!(sql.contains(" OR "), "sql: {}", sql);
        assert!(sql.contains("name = "), "sql: {}", sql);
    }

    #[test]
    fn test_fully_empty_identifier_rejected() {
        let scope = Scope::IdentifierList(vec![ResourceIdentifier::new("", "")]);
        assert!(matches!(
            rendered(&scope),
            Err(NetguardError::UnsupportedScope(_))
        ));
    }

    #[test]
    fn test_wildcard_folds_into_namespace_branch() {
        let scope = Scope::IdentifierList(vec![
            ResourceIdentifier::new("app", ""),
            ResourceIdentifier::new("app", "b1"),
            ResourceIdentifier::new("other", "x"),
        ]);
        let sql = rendered(&scope).unwrap();
        assert!(sql.contains("namespace = ANY("), "sql: {}", sql);
        // app/b1 folded into the app wildcard; other/x stays exact
        assert_eq!(sql.matches("name = ").count(), 1, "sql: {}", sql);
    }
}
