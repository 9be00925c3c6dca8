//! Field-level validation errors.

use std::fmt;

use super::path::Path;

/// Error is a field-level validation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    /// Type of error
    pub error_type: ErrorType,
    /// Field path (e.g., "metadata.name")
    pub field: String,
    /// Bad value that caused the error
    pub bad_value: Option<BadValue>,
    /// Additional detail about the error
    pub detail: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error_body())
    }
}

impl Error {
    /// Returns error message without the field name.
    pub fn error_body(&self) -> String {
        let mut s = match self.error_type {
            ErrorType::Required | ErrorType::Forbidden | ErrorType::TooLong | ErrorType::Internal => {
                self.error_type.to_string()
            }
            ErrorType::Invalid
            | ErrorType::NotSupported
            | ErrorType::NotFound
            | ErrorType::Duplicate => {
                if let Some(ref value) = self.bad_value {
                    format!("{}: {}", self.error_type, value)
                } else {
                    self.error_type.to_string()
                }
            }
        };

        if !self.detail.is_empty() {
            s.push_str(&format!(": {}", self.detail));
        }
        s
    }
}

impl std::error::Error for Error {}

/// Wrapper for bad value in errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BadValue {
    String(String),
    Int(i64),
    Bool(bool),
}

fn quote_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}

impl fmt::Display for BadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadValue::String(s) => write!(f, "{}", quote_string(s)),
            BadValue::Int(i) => write!(f, "{}", i),
            BadValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// ErrorType is a machine readable value providing more detail about why
/// a field is invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Failure to find a requested value
    NotFound,
    /// Required values that are not provided
    Required,
    /// Collisions of values that must be unique
    Duplicate,
    /// Malformed values (e.g., failed regex match, too long, out of bounds)
    Invalid,
    /// Unknown values for enumerated fields
    NotSupported,
    /// Valid values not permitted by current conditions
    Forbidden,
    /// Value is too long
    TooLong,
    /// Internal error (not related to user input)
    Internal,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorType::NotFound => "Not found",
            ErrorType::Required => "Required value",
            ErrorType::Duplicate => "Duplicate value",
            ErrorType::Invalid => "Invalid value",
            ErrorType::NotSupported => "Unsupported value",
            ErrorType::Forbidden => "Forbidden",
            ErrorType::TooLong => "Too long",
            ErrorType::Internal => "Internal error",
        };
        write!(f, "{}", s)
    }
}

/// ErrorList holds a set of Errors.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorList {
    pub errors: Vec<Error>,
}

impl ErrorList {
    /// Creates a new empty ErrorList
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error to the list
    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Extends this ErrorList with another
    pub fn extend(&mut self, other: ErrorList) {
        self.errors.extend(other.errors);
    }

    /// Returns true if there are no errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// NotFound returns an Error indicating "value not found".
pub fn not_found(field: &Path, value: BadValue) -> Error {
    Error {
        error_type: ErrorType::NotFound,
        field: field.to_string(),
        bad_value: Some(value),
        detail: String::new(),
    }
}

/// Required returns an Error indicating "value required".
pub fn required(field: &Path, detail: &str) -> Error {
    Error {
        error_type: ErrorType::Required,
        field: field.to_string(),
        bad_value: None,
        detail: detail.to_string(),
    }
}

/// Duplicate returns an Error indicating "duplicate value".
pub fn duplicate(field: &Path, value: BadValue) -> Error {
    Error {
        error_type: ErrorType::Duplicate,
        field: field.to_string(),
        bad_value: Some(value),
        detail: String::new(),
    }
}

/// Invalid returns an Error indicating "invalid value".
pub fn invalid(field: &Path, value: BadValue, detail: &str) -> Error {
    Error {
        error_type: ErrorType::Invalid,
        field: field.to_string(),
        bad_value: Some(value),
        detail: detail.to_string(),
    }
}

/// NotSupported returns an Error indicating "unsupported value".
pub fn not_supported(field: &Path, value: BadValue, valid_values: &[&str]) -> Error {
    let detail = if valid_values.is_empty() {
        String::new()
    } else {
        format!(
            "supported values: {}",
            valid_values
                .iter()
                .map(|v| format!("\"{}\"", v))
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    Error {
        error_type: ErrorType::NotSupported,
        field: field.to_string(),
        bad_value: Some(value),
        detail,
    }
}

/// Forbidden returns an Error indicating "forbidden".
pub fn forbidden(field: &Path, detail: &str) -> Error {
    Error {
        error_type: ErrorType::Forbidden,
        field: field.to_string(),
        bad_value: None,
        detail: detail.to_string(),
    }
}

/// TooLong returns an Error indicating "too long".
pub fn too_long(field: &Path, value: BadValue, max_length: usize) -> Error {
    Error {
        error_type: ErrorType::TooLong,
        field: field.to_string(),
        bad_value: Some(value),
        detail: format!("may not be more than {} characters", max_length),
    }
}

/// InternalError returns an Error indicating "internal error".
pub fn internal_error(field: &Path, detail: &str) -> Error {
    Error {
        error_type: ErrorType::Internal,
        field: field.to_string(),
        bad_value: None,
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = invalid(
            &Path::new("metadata").child("name"),
            BadValue::String("Bad Name".to_string()),
            "must be lowercase",
        );
        assert_eq!(
            err.to_string(),
            "metadata.name: Invalid value: \"Bad Name\": must be lowercase"
        );
    }

    #[test]
    fn test_error_list_aggregation() {
        let mut list = ErrorList::new();
        assert!(list.is_empty());
        list.push(required(&Path::new("metadata").child("name"), ""));
        list.push(forbidden(&Path::new("metadata").child("namespace"), "no"));
        assert_eq!(list.len(), 2);
    }
}
