//! Object metadata validation.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::{
    BadValue, ErrorList, Path, forbidden, invalid, is_dns1123_label, is_dns1123_subdomain,
    required,
};
use crate::common::ObjectMeta;

const QUALIFIED_NAME_FMT: &str = "([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]";
const QUALIFIED_NAME_ERR_MSG: &str = "must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character";
const QUALIFIED_NAME_MAX_LENGTH: usize = 63;

static QUALIFIED_NAME_RE: OnceLock<Regex> = OnceLock::new();

/// ValidateNameFunc validates that a name is acceptable for a kind.
pub type ValidateNameFunc = fn(name: &str, prefix: bool) -> Vec<String>;

/// Name validator accepting any DNS-1123 subdomain.
pub fn name_is_dns_subdomain(name: &str, prefix: bool) -> Vec<String> {
    let value = if prefix {
        mask_trailing_dash(name)
    } else {
        name.to_string()
    };
    is_dns1123_subdomain(&value)
}

/// Name validator accepting any DNS-1123 label.
pub fn name_is_dns_label(name: &str, prefix: bool) -> Vec<String> {
    let value = if prefix {
        mask_trailing_dash(name)
    } else {
        name.to_string()
    };
    is_dns1123_label(&value)
}

fn mask_trailing_dash(name: &str) -> String {
    if name.len() > 1 && name.ends_with('-') {
        format!("{}a", &name[..name.len() - 1])
    } else {
        name.to_string()
    }
}

/// IsQualifiedName tests whether the value passes label-key style validation.
pub fn is_qualified_name(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    let parts: Vec<&str> = value.split('/').collect();
    let name = match parts.len() {
        1 => parts[0],
        2 => {
            let prefix = parts[0];
            if prefix.is_empty() {
                errs.push("prefix part must be non-empty".to_string());
            } else {
                for msg in is_dns1123_subdomain(prefix) {
                    errs.push(format!("prefix part {}", msg));
                }
            }
            parts[1]
        }
        _ => {
            errs.push(format!(
                "a qualified name {} with an optional DNS subdomain prefix and '/' (e.g. 'example.com/MyName')",
                QUALIFIED_NAME_ERR_MSG
            ));
            return errs;
        }
    };

    if name.is_empty() {
        errs.push("name part must be non-empty".to_string());
    } else if name.len() > QUALIFIED_NAME_MAX_LENGTH {
        errs.push(format!(
            "name part must be no more than {} characters",
            QUALIFIED_NAME_MAX_LENGTH
        ));
    }

    let re =
        QUALIFIED_NAME_RE.get_or_init(|| Regex::new(&format!("^{}$", QUALIFIED_NAME_FMT)).unwrap());
    if !name.is_empty() && !re.is_match(name) {
        errs.push(format!("name part {}", QUALIFIED_NAME_ERR_MSG));
    }

    errs
}

/// Validates a label map: keys must be qualified names, values label values.
pub fn validate_labels(labels: &BTreeMap<String, String>, fld_path: &Path) -> ErrorList {
    let mut all_errs = ErrorList::new();
    for (k, v) in labels {
        for msg in is_qualified_name(k) {
            all_errs.push(invalid(
                &fld_path.key(k),
                BadValue::String(k.clone()),
                &msg,
            ));
        }
        if v.len() > QUALIFIED_NAME_MAX_LENGTH {
            all_errs.push(invalid(
                &fld_path.key(k),
                BadValue::String(v.clone()),
                &format!(
                    "must be no more than {} characters",
                    QUALIFIED_NAME_MAX_LENGTH
                ),
            ));
        }
    }
    all_errs
}

/// Validates the common metadata fields of an incoming object: name or
/// generateName, namespace presence, and label well-formedness.
pub fn validate_object_meta(
    meta: &ObjectMeta,
    requires_namespace: bool,
    name_fn: ValidateNameFunc,
    fld_path: &Path,
) -> ErrorList {
    let mut all_errs = ErrorList::new();

    let generate_name = meta.generate_name();
    if !generate_name.is_empty() {
        for msg in name_fn(generate_name, true) {
            all_errs.push(invalid(
                &fld_path.child("generateName"),
                BadValue::String(generate_name.to_string()),
                &msg,
            ));
        }
    }

    let name = meta.name();
    if name.is_empty() {
        if generate_name.is_empty() {
            all_errs.push(required(
                &fld_path.child("name"),
                "name or generateName is required",
            ));
        }
    } else {
        for msg in name_fn(name, false) {
            all_errs.push(invalid(
                &fld_path.child("name"),
                BadValue::String(name.to_string()),
                &msg,
            ));
        }
    }

    let namespace = meta.namespace();
    if requires_namespace {
        if namespace.is_empty() {
            all_errs.push(required(&fld_path.child("namespace"), ""));
        } else {
            for msg in name_is_dns_label(namespace, false) {
                all_errs.push(invalid(
                    &fld_path.child("namespace"),
                    BadValue::String(namespace.to_string()),
                    &msg,
                ));
            }
        }
    } else if !namespace.is_empty() {
        all_errs.push(forbidden(
            &fld_path.child("namespace"),
            "not allowed on this type",
        ));
    }

    all_errs.extend(validate_labels(&meta.labels, &fld_path.child("labels")));

    all_errs
}

/// Validates metadata changes on update: identity fields are immutable.
pub fn validate_object_meta_update(
    new_meta: &ObjectMeta,
    old_meta: &ObjectMeta,
    fld_path: &Path,
) -> ErrorList {
    let mut all_errs = ErrorList::new();

    if new_meta.name() != old_meta.name() {
        all_errs.push(invalid(
            &fld_path.child("name"),
            BadValue::String(new_meta.name().to_string()),
            "field is immutable",
        ));
    }
    if new_meta.namespace() != old_meta.namespace() {
        all_errs.push(invalid(
            &fld_path.child("namespace"),
            BadValue::String(new_meta.namespace().to_string()),
            "field is immutable",
        ));
    }
    if !new_meta.uid().is_empty() && new_meta.uid() != old_meta.uid() {
        all_errs.push(invalid(
            &fld_path.child("uid"),
            BadValue::String(new_meta.uid().to_string()),
            "field is immutable",
        ));
    }

    all_errs.extend(validate_labels(
        &new_meta.labels,
        &fld_path.child("labels"),
    ));

    all_errs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(namespace: &str, name: &str) -> ObjectMeta {
        ObjectMeta {
            name: if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            },
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace.to_string())
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_meta() {
        let errs = validate_object_meta(
            &meta("app", "api"),
            true,
            name_is_dns_subdomain,
            &Path::new("metadata"),
        );
        assert!(errs.is_empty(), "unexpected errors: {}", errs);
    }

    #[test]
    fn test_missing_name_and_generate_name() {
        let errs = validate_object_meta(
            &meta("app", ""),
            true,
            name_is_dns_subdomain,
            &Path::new("metadata"),
        );
        assert!(!errs.is_empty());
    }

    #[test]
    fn test_generate_name_alone_is_enough() {
        let mut m = meta("app", "");
        m.generate_name = Some("api-".to_string());
        let errs = validate_object_meta(&m, true, name_is_dns_subdomain, &Path::new("metadata"));
        assert!(errs.is_empty(), "unexpected errors: {}", errs);
    }

    #[test]
    fn test_uppercase_name_rejected() {
        let errs = validate_object_meta(
            &meta("app", "Api"),
            true,
            name_is_dns_subdomain,
            &Path::new("metadata"),
        );
        assert!(!errs.is_empty());
    }

    #[test]
    fn test_update_rejects_identity_change() {
        let old = meta("app", "api");
        let mut new = meta("app", "api2");
        new.uid = Some("u-1".to_string());
        let errs = validate_object_meta_update(&new, &old, &Path::new("metadata"));
        assert_eq!(errs.len(), 2);
    }
}
