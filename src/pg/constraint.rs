//! Unique-constraint translation.
//!
//! Driver unique violations are mapped by constraint name into the typed
//! domain errors the facade passes through to clients.

use crate::errors::NetguardError;

/// Named unique constraints the schema declares.
pub(crate) const NETWORKS_CIDR_UNIQUE: &str = "idx_networks_cidr_unique";
pub(crate) const HOSTS_UUID_KEY: &str = "hosts_uuid_key";
pub(crate) const HOST_BINDINGS_HOST_KEY: &str = "host_bindings_host_namespace_host_name_key";

/// The unique-constraint name carried by a driver error, if it is one.
pub(crate) fn unique_constraint_name(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
        .map(str::to_string)
}

/// Maps a violated constraint name to its typed domain error. The offending
/// values come from the object being written; the conflicting row is
/// resolved by the writer's pre-check when it is still reachable.
pub(crate) fn constraint_error(
    constraint: &str,
    cidr: &str,
    uuid: &str,
    host: &str,
) -> Option<NetguardError> {
    match constraint {
        NETWORKS_CIDR_UNIQUE => Some(NetguardError::CidrOverlap {
            cidr: cidr.to_string(),
            network: host.to_string(),
        }),
        HOSTS_UUID_KEY => Some(NetguardError::UuidAlreadyExists {
            uuid: uuid.to_string(),
            host: host.to_string(),
        }),
        HOST_BINDINGS_HOST_KEY => Some(NetguardError::HostAlreadyBound {
            host: host.to_string(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_constraints_translate() {
        match constraint_error(NETWORKS_CIDR_UNIQUE, "10.0.0.0/24", "", "n1") {
            Some(NetguardError::CidrOverlap { cidr, network }) => {
                assert_eq!(cidr, "10.0.0.0/24");
                assert_eq!(network, "n1");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            constraint_error(HOSTS_UUID_KEY, "", "u-1", "h1"),
            Some(NetguardError::UuidAlreadyExists { .. })
        ));
        assert!(matches!(
            constraint_error(HOST_BINDINGS_HOST_KEY, "", "", "h1"),
            Some(NetguardError::HostAlreadyBound { .. })
        ));
    }

    #[test]
    fn test_unknown_constraint_falls_through() {
        assert!(constraint_error("services_pkey", "", "", "").is_none());
    }
}
