//! Request context: namespace, sort and selector derivation.

use std::collections::BTreeMap;

use crate::common::LabelSelector;
use crate::common::ident::Scope;

/// Query parameter names accepted for the sort path.
const SORT_BY_PARAMS: [&str; 3] = ["sortBy", "sort-by", "orderBy"];

/// The request-scoped values the facade consults: namespace (three sources,
/// in priority order), the sortBy path and the list selectors.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Explicit namespace override, consulted first.
    pub namespace_override: Option<String>,
    /// Namespace carried by the framework request values.
    pub namespace: Option<String>,
    /// Namespace parsed from the request path info.
    pub request_info_namespace: Option<String>,
    /// Dotted sort path from the sortBy/sort-by/orderBy query parameter.
    pub sort_by: Option<String>,
    /// Label selector restricting list results.
    pub label_selector: Option<LabelSelector>,
    /// Field selector restricting list results.
    pub field_selector: Option<FieldSelector>,
}

impl RequestContext {
    /// A context scoped to one namespace.
    pub fn namespaced(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// The namespace the request resolves to: explicit override, then the
    /// framework value, then the request info.
    pub fn effective_namespace(&self) -> Option<&str> {
        [
            self.namespace_override.as_deref(),
            self.namespace.as_deref(),
            self.request_info_namespace.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|ns| !ns.is_empty())
    }

    /// The scope this request implies for list and full-sync operations.
    pub fn scope(&self) -> Scope {
        Scope::from_request(self.effective_namespace())
    }

    /// Reads the sort path out of parsed query parameters, honoring the
    /// accepted aliases in order.
    pub fn sort_by_from_query(params: &[(String, String)]) -> Option<String> {
        for key in SORT_BY_PARAMS {
            if let Some((_, value)) = params.iter().find(|(k, _)| k == key) {
                if !value.is_empty() {
                    return Some(value.clone());
                }
            }
        }
        None
    }
}

/// Field selector limited to metadata.name / metadata.namespace equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    pub name: Option<String>,
    pub namespace: Option<String>,
}

impl FieldSelector {
    /// Parses `metadata.name=x,metadata.namespace=y`. Unknown keys fail.
    pub fn parse(selector: &str) -> Result<Self, String> {
        let mut result = Self::default();
        for clause in selector.split(',') {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            let Some((key, value)) = clause.split_once('=') else {
                return Err(format!("invalid field selector clause: {:?}", clause));
            };
            match key.trim() {
                "metadata.name" => result.name = Some(value.trim().to_string()),
                "metadata.namespace" => result.namespace = Some(value.trim().to_string()),
                other => return Err(format!("unsupported field selector key: {:?}", other)),
            }
        }
        Ok(result)
    }

    /// Evaluates the selector against an object's identity.
    pub fn matches(&self, namespace: &str, name: &str) -> bool {
        self.name.as_deref().is_none_or(|want| want == name)
            && self.namespace.as_deref().is_none_or(|want| want == namespace)
    }
}

/// Evaluates an optional label selector against a label map.
pub fn labels_match(selector: Option<&LabelSelector>, labels: &BTreeMap<String, String>) -> bool {
    selector.is_none_or(|s| s.matches(labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ident::Scope;

    #[test]
    fn test_namespace_priority() {
        let mut ctx = RequestContext::default();
        assert_eq!(ctx.effective_namespace(), None);
        assert_eq!(ctx.scope(), Scope::Empty);

        ctx.request_info_namespace = Some("from-path".to_string());
        assert_eq!(ctx.effective_namespace(), Some("from-path"));

        ctx.namespace = Some("from-framework".to_string());
        assert_eq!(ctx.effective_namespace(), Some("from-framework"));

        ctx.namespace_override = Some("explicit".to_string());
        assert_eq!(ctx.effective_namespace(), Some("explicit"));
        assert_eq!(ctx.scope(), Scope::NamespaceOnly("explicit".to_string()));
    }

    #[test]
    fn test_sort_by_aliases() {
        let params = vec![("orderBy".to_string(), "spec.weight".to_string())];
        assert_eq!(
            RequestContext::sort_by_from_query(&params),
            Some("spec.weight".to_string())
        );

        let params = vec![
            ("sort-by".to_string(), "metadata.name".to_string()),
            ("orderBy".to_string(), "spec.weight".to_string()),
        ];
        // sortBy aliases are consulted in declaration order
        assert_eq!(
            RequestContext::sort_by_from_query(&params),
            Some("metadata.name".to_string())
        );

        assert_eq!(RequestContext::sort_by_from_query(&[]), None);
    }

    #[test]
    fn test_field_selector_parse_and_match() {
        let selector = FieldSelector::parse("metadata.name=api, metadata.namespace=app").unwrap();
        assert!(selector.matches("app", "api"));
        assert!(!selector.matches("app", "db"));
        assert!(FieldSelector::parse("status.phase=Ready").is_err());
        assert!(FieldSelector::parse("garbage").is_err());
    }
}
