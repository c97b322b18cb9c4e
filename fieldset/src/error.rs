//! Error types for field definitions and record validation
//!
//! There are two tiers. [`FieldsError`] covers configuration mistakes that
//! make a schema unusable; they surface when a field or fieldset is built.
//! Per-field validation failures are data ([`ErrorKind`](crate::ErrorKind)
//! values in an error map). [`ValidationFailed`] bundles such a map for
//! callers that want to propagate a failed record with `?`.

use thiserror::Error;

use crate::fieldset::Errors;

/// Result type for field configuration operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Severity levels for error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,
    /// Operation failed but the caller can continue
    Error,
    /// The schema cannot be used at all
    Critical,
}

/// Trait for error types that have severity levels
pub trait Severity {
    fn severity(&self) -> ErrorSeverity;
}

/// Errors raised while configuring fields and fieldsets
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Object, entity and collection fields must name their item class
    #[error("missing class for {field_type} field: {field}")]
    MissingClass { field: String, field_type: String },

    /// The `regex` rule does not compile
    #[error("invalid regex for field '{field}': {pattern}")]
    InvalidRegex {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A rule value has the wrong shape
    #[error("invalid '{rule}' rule on field '{field}': {message}")]
    InvalidRule {
        field: String,
        rule: String,
        message: String,
    },

    /// Field type name not recognised
    #[error("unknown field type: {name}")]
    UnknownFieldType { name: String },

    /// YAML schema document error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON schema document error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Severity for FieldsError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

/// A record failed validation.
///
/// Carries the per-field error map and an identifier of where the record came
/// from, so a higher layer can report it to a user.
#[derive(Debug, Clone, Error)]
#[error("Validation Error: {origin}")]
pub struct ValidationFailed {
    origin: String,
    errors: Errors,
}

impl ValidationFailed {
    pub fn new(origin: impl Into<String>, errors: Errors) -> Self {
        Self {
            origin: origin.into(),
            errors,
        }
    }

    /// Identifier of the record source (model name, form, import file...).
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Per-field errors; only failing fields are present.
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn into_errors(self) -> Errors {
        self.errors
    }
}

impl Severity for ValidationFailed {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}
