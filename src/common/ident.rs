//! Resource identifiers and bulk-operation scopes
//!
//! Every persisted resource is addressed by a (namespace, name) pair; bulk
//! operations (list, scoped delete, full-sync) select subsets of identifiers
//! through a [`Scope`] predicate.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// ResourceIdentifier is the (namespace, name) pair addressing one object.
///
/// Namespace may be empty for cluster-scoped kinds. Two identifiers are equal
/// iff both components match exactly; ordering is lexicographic on namespace
/// then name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdentifier {
    /// Namespace of the object, empty for cluster-scoped kinds.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    /// Name of the object within its namespace.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl ResourceIdentifier {
    /// Creates an identifier from namespace and name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Creates a cluster-scoped identifier (empty namespace).
    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            name: name.into(),
        }
    }

    /// Canonical string form `namespace/name`; `/name` for an empty namespace.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// True when the entry names a whole namespace rather than one object.
    pub fn is_namespace_wildcard(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl PartialOrd for ResourceIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResourceIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Scope is a predicate over identifiers used by list, scoped delete and
/// full-sync operations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum Scope {
    /// Matches nothing; bulk writers read this as "no pre-clean step".
    #[default]
    Empty,

    /// Matches exactly the listed identifiers. An entry with an empty name
    /// widens to every row in that entry's namespace.
    IdentifierList(Vec<ResourceIdentifier>),

    /// Matches every row in one namespace. Equivalent to an IdentifierList
    /// with a single empty-name entry; kept distinct for clarity.
    NamespaceOnly(String),
}

impl Scope {
    /// Builds the scope a request context implies: NamespaceOnly when the
    /// request carries a namespace, Empty (cluster-wide, no pre-clean)
    /// otherwise.
    pub fn from_request(namespace: Option<&str>) -> Self {
        match namespace {
            Some(ns) if !ns.is_empty() => Scope::NamespaceOnly(ns.to_string()),
            _ => Scope::Empty,
        }
    }

    /// True for the scope that matches nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Scope::Empty => true,
            Scope::IdentifierList(ids) => ids.is_empty(),
            Scope::NamespaceOnly(_) => false,
        }
    }

    /// Evaluates the scope against one identifier.
    ///
    /// A list containing both specific entries and a namespace wildcard for
    /// the same namespace behaves like the wildcard alone.
    pub fn matches(&self, id: &ResourceIdentifier) -> bool {
        match self {
            Scope::Empty => false,
            Scope::NamespaceOnly(ns) => id.namespace == *ns,
            Scope::IdentifierList(ids) => ids.iter().any(|entry| {
                entry.namespace == id.namespace
                    && (entry.is_namespace_wildcard() || entry.name == id.name)
            }),
        }
    }

    /// The namespaces whose rows are matched wholesale, and the specific
    /// identifiers matched individually. Identifiers inside a wildcarded
    /// namespace are folded into the wildcard.
    pub fn partition(&self) -> (Vec<String>, Vec<ResourceIdentifier>) {
        match self {
            Scope::Empty => (Vec::new(), Vec::new()),
            Scope::NamespaceOnly(ns) => (vec![ns.clone()], Vec::new()),
            Scope::IdentifierList(ids) => {
                let namespaces: Vec<String> = ids
                    .iter()
                    .filter(|id| id.is_namespace_wildcard())
                    .map(|id| id.namespace.clone())
                    .collect();
                let exact = ids
                    .iter()
                    .filter(|id| {
                        !id.is_namespace_wildcard() && !namespaces.contains(&id.namespace)
                    })
                    .cloned()
                    .collect();
                (namespaces, exact)
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Empty => write!(f, "empty"),
            Scope::NamespaceOnly(ns) => write!(f, "namespace={}", ns),
            Scope::IdentifierList(ids) => {
                let keys: Vec<String> = ids.iter().map(ResourceIdentifier::key).collect();
                write!(f, "ids=[{}]", keys.join(", "))
            }
        }
    }
}
