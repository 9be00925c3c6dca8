//! Field validation utilities for API types.
//!
//! This module provides:
//! - `Path`: Represents a path from root to a field
//! - `Error` / `ErrorList`: Validation error types
//! - DNS validation functions: `is_dns1123_label`, `is_dns1123_subdomain`
//! - Object metadata validators shared by every kind

pub mod dns;
pub mod errors;
pub mod object_meta;
pub mod path;

pub use dns::{
    DNS1123_LABEL_ERROR_MSG, DNS1123_SUBDOMAIN_ERROR_MSG, is_dns1123_label, is_dns1123_subdomain,
};
pub use errors::{
    BadValue, Error, ErrorList, ErrorType, duplicate, forbidden, internal_error, invalid,
    not_found, not_supported, required, too_long,
};
pub use object_meta::{
    ValidateNameFunc, is_qualified_name, name_is_dns_label, name_is_dns_subdomain,
    validate_labels, validate_object_meta, validate_object_meta_update,
};
pub use path::Path;
