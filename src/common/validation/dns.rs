//! DNS name validation utility functions.

use regex::Regex;
use std::sync::OnceLock;

// DNS1123 label: [a-z0-9]([-a-z0-9]*[a-z0-9])?
static DNS1123_LABEL_RE: OnceLock<Regex> = OnceLock::new();

// DNS1123 subdomain: dns1123Label(\.dns1123Label)*
static DNS1123_SUBDOMAIN_RE: OnceLock<Regex> = OnceLock::new();

const DNS1123_LABEL_MAX_LEN: usize = 63;
const DNS1123_SUBDOMAIN_MAX_LEN: usize = 253;

/// DNS1123LabelErrorMessage is the error message for invalid DNS1123 labels.
pub const DNS1123_LABEL_ERROR_MSG: &str = "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character";

/// DNS1123SubdomainErrorMessage is the error message for invalid DNS1123 subdomains.
pub const DNS1123_SUBDOMAIN_ERROR_MSG: &str = "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character";

/// IsDNS1123Label tests for a string that conforms to the definition of a
/// label in DNS (RFC 1123).
pub fn is_dns1123_label(value: &str) -> Vec<String> {
    let mut errs = Vec::new();

    if value.len() > DNS1123_LABEL_MAX_LEN {
        errs.push(format!(
            "must be no more than {} characters",
            DNS1123_LABEL_MAX_LEN
        ));
    }

    let re =
        DNS1123_LABEL_RE.get_or_init(|| Regex::new("^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap());
    if !re.is_match(value) {
        errs.push(DNS1123_LABEL_ERROR_MSG.to_string());
    }

    errs
}

/// IsDNS1123Subdomain tests for a string that conforms to the definition of a
/// subdomain in DNS (RFC 1123).
pub fn is_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errs = Vec::new();

    if value.len() > DNS1123_SUBDOMAIN_MAX_LEN {
        errs.push(format!(
            "must be no more than {} characters",
            DNS1123_SUBDOMAIN_MAX_LEN
        ));
    }

    let re = DNS1123_SUBDOMAIN_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").unwrap()
    });
    if !re.is_match(value) {
        errs.push(DNS1123_SUBDOMAIN_ERROR_MSG.to_string());
    }

    errs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns1123_label() {
        assert!(is_dns1123_label("my-name").is_empty());
        assert!(is_dns1123_label("abc-123").is_empty());
        assert!(!is_dns1123_label("My-Name").is_empty());
        assert!(!is_dns1123_label("my.name").is_empty());
        assert!(!is_dns1123_label("-leading").is_empty());
        assert!(!is_dns1123_label("").is_empty());
    }

    #[test]
    fn test_dns1123_subdomain() {
        assert!(is_dns1123_subdomain("example.com").is_empty());
        assert!(is_dns1123_subdomain("my-svc").is_empty());
        assert!(!is_dns1123_subdomain("Example.com").is_empty());
        assert!(!is_dns1123_subdomain(".leading").is_empty());
    }
}
