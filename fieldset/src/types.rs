//! Field types and validation error kinds.
//!
//! Both enumerations are closed. `FieldType` drives casting and validation
//! dispatch; `ErrorKind` is the reason a single field failed validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldsError;

/// The type of a field. Determines how raw values are coerced and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Integer,
    Float,
    Boolean,
    Datetime,
    Date,
    Time,
    Year,
    Timestamp,
    Email,
    Url,
    Ip,
    Json,
    Binary,
    /// Reference to a single related instance of `rules.class`.
    Object,
    /// Reference to a persisted entity; emptiness is decided by its identity key.
    Entity,
    /// Sequence of related records, validated by its own fieldset.
    Collection,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 17] = [
        FieldType::Text,
        FieldType::Integer,
        FieldType::Float,
        FieldType::Boolean,
        FieldType::Datetime,
        FieldType::Date,
        FieldType::Time,
        FieldType::Year,
        FieldType::Timestamp,
        FieldType::Email,
        FieldType::Url,
        FieldType::Ip,
        FieldType::Json,
        FieldType::Binary,
        FieldType::Object,
        FieldType::Entity,
        FieldType::Collection,
    ];

    /// Get the string representation of this field type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Datetime => "datetime",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Year => "year",
            FieldType::Timestamp => "timestamp",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Ip => "ip",
            FieldType::Json => "json",
            FieldType::Binary => "binary",
            FieldType::Object => "object",
            FieldType::Entity => "entity",
            FieldType::Collection => "collection",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            FieldType::Datetime | FieldType::Date | FieldType::Time | FieldType::Year
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FieldType::Text | FieldType::Ip | FieldType::Email | FieldType::Url | FieldType::Json
        )
    }

    pub fn is_object(&self) -> bool {
        matches!(self, FieldType::Object)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, FieldType::Collection)
    }

    /// Object and entity fields hold a reference to a related instance.
    pub fn is_referential(&self) -> bool {
        matches!(self, FieldType::Object | FieldType::Entity)
    }

    /// Types whose definition must name an item `class`.
    pub fn requires_class(&self) -> bool {
        matches!(
            self,
            FieldType::Object | FieldType::Entity | FieldType::Collection
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| FieldsError::UnknownFieldType {
                name: s.to_string(),
            })
    }
}

/// Reason a value failed validation for a field.
///
/// A successful validation carries no kind at all (`Option::None`), so there
/// is no "none" variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required value is empty.
    Required,
    /// Explicit null on a non-nullable field.
    Null,
    /// Value is not a recognisable boolean.
    Boolean,
    Min,
    Max,
    TooShort,
    TooLong,
    /// Value is not in the `values` allow-list.
    Value,
    Regex,
    InvalidText,
    InvalidInteger,
    InvalidFloat,
    InvalidDatetime,
    InvalidDate,
    InvalidTime,
    InvalidYear,
    InvalidTimestamp,
    InvalidEmail,
    InvalidUrl,
    InvalidIp,
    InvalidJson,
    InvalidObject,
    InvalidEntity,
}

impl ErrorKind {
    /// Stable code used by message layers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Null => "null",
            ErrorKind::Boolean => "boolean",
            ErrorKind::Min => "min",
            ErrorKind::Max => "max",
            ErrorKind::TooShort => "too_short",
            ErrorKind::TooLong => "too_long",
            ErrorKind::Value => "value",
            ErrorKind::Regex => "regex",
            ErrorKind::InvalidText => "invalid_text",
            ErrorKind::InvalidInteger => "invalid_integer",
            ErrorKind::InvalidFloat => "invalid_float",
            ErrorKind::InvalidDatetime => "invalid_datetime",
            ErrorKind::InvalidDate => "invalid_date",
            ErrorKind::InvalidTime => "invalid_time",
            ErrorKind::InvalidYear => "invalid_year",
            ErrorKind::InvalidTimestamp => "invalid_timestamp",
            ErrorKind::InvalidEmail => "invalid_email",
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::InvalidIp => "invalid_ip",
            ErrorKind::InvalidJson => "invalid_json",
            ErrorKind::InvalidObject => "invalid_object",
            ErrorKind::InvalidEntity => "invalid_entity",
        }
    }

    /// The coercion failure reported for a field type.
    ///
    /// Binary and collection values are never rejected during coercion, so
    /// they have no failure kind.
    pub fn for_type(field_type: FieldType) -> Option<ErrorKind> {
        let kind = match field_type {
            FieldType::Text => ErrorKind::InvalidText,
            FieldType::Integer => ErrorKind::InvalidInteger,
            FieldType::Float => ErrorKind::InvalidFloat,
            FieldType::Boolean => ErrorKind::Boolean,
            FieldType::Datetime => ErrorKind::InvalidDatetime,
            FieldType::Date => ErrorKind::InvalidDate,
            FieldType::Time => ErrorKind::InvalidTime,
            FieldType::Year => ErrorKind::InvalidYear,
            FieldType::Timestamp => ErrorKind::InvalidTimestamp,
            FieldType::Email => ErrorKind::InvalidEmail,
            FieldType::Url => ErrorKind::InvalidUrl,
            FieldType::Ip => ErrorKind::InvalidIp,
            FieldType::Json => ErrorKind::InvalidJson,
            FieldType::Object => ErrorKind::InvalidObject,
            FieldType::Entity => ErrorKind::InvalidEntity,
            FieldType::Binary | FieldType::Collection => return None,
        };
        Some(kind)
    }

    /// True for failures produced by type coercion rather than by a rule.
    pub fn is_coercion_failure(&self) -> bool {
        FieldType::ALL
            .iter()
            .any(|t| ErrorKind::for_type(*t) == Some(*self))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
