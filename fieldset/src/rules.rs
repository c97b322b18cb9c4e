//! Constraint rules attached to a field
//!
//! Rules run against the coerced value in a fixed order: range, length,
//! allow-list, regex. Only the first violation is reported.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{FieldsError, Result};
use crate::types::ErrorKind;
use crate::value::Value;

/// Rule names understood by [`Rules`]; anything else is a residual rule.
pub const KNOWN_RULES: [&str; 8] = [
    "min",
    "max",
    "min_length",
    "max_length",
    "regex",
    "values",
    "class",
    "container",
];

/// A compiled `regex` rule.
///
/// Patterns may be written bare (`^[a-z]+$`) or delimited with trailing
/// flags (`/^[a-z]+$/i`); the flags `i`, `m`, `s`, `x` and `u` are honoured.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    compiled: Regex,
}

impl Pattern {
    pub fn new(field: &str, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let translated = translate_delimited(&source);
        let compiled = Regex::new(&translated).map_err(|e| FieldsError::InvalidRegex {
            field: field.to_string(),
            pattern: source.clone(),
            source: e,
        })?;
        Ok(Self { source, compiled })
    }

    /// The pattern as written in the definition.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.compiled.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// `/body/flags` → `(?flags)body`; anything else is returned unchanged.
fn translate_delimited(source: &str) -> String {
    let Some(rest) = source.strip_prefix('/') else {
        return source.to_string();
    };
    let Some(end) = rest.rfind('/') else {
        return source.to_string();
    };
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    if !flags.chars().all(|c| "imsxu".contains(c)) {
        return source.to_string();
    }
    let inline: String = flags.chars().filter(|c| *c != 'u').collect();
    if inline.is_empty() {
        body.to_string()
    } else {
        format!("(?{inline}){body}")
    }
}

/// The constraint set of one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
    pub min: Option<Value>,
    pub max: Option<Value>,
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    /// Maximum length in characters.
    pub max_length: Option<usize>,
    pub regex: Option<Pattern>,
    /// Allow-list of accepted values.
    pub values: Option<Vec<Value>>,
    /// Item class of object, entity and collection fields.
    pub class: Option<String>,
    /// Container kind of collection fields.
    pub container: Option<String>,
    /// Rules this crate does not interpret, kept for consumers.
    pub extra: IndexMap<String, Value>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the rule chain against a coerced value.
    pub fn check(&self, value: &Value) -> Option<ErrorKind> {
        self.check_range(value)
            .or_else(|| self.check_length(value))
            .or_else(|| self.check_values(value))
            .or_else(|| self.check_regex(value))
    }

    /// Falsy values never trip the range; bounds are inclusive.
    fn check_range(&self, value: &Value) -> Option<ErrorKind> {
        if !value.is_truthy() {
            return None;
        }
        if let Some(min) = &self.min {
            if value.loose_cmp(min) == Some(Ordering::Less) {
                return Some(ErrorKind::Min);
            }
        }
        if let Some(max) = &self.max {
            if value.loose_cmp(max) == Some(Ordering::Greater) {
                return Some(ErrorKind::Max);
            }
        }
        None
    }

    fn check_length(&self, value: &Value) -> Option<ErrorKind> {
        if self.min_length.is_none() && self.max_length.is_none() {
            return None;
        }
        let len = value.to_text()?.chars().count();
        if self.min_length.is_some_and(|min| len < min) {
            return Some(ErrorKind::TooShort);
        }
        if self.max_length.is_some_and(|max| len > max) {
            return Some(ErrorKind::TooLong);
        }
        None
    }

    fn check_values(&self, value: &Value) -> Option<ErrorKind> {
        let allowed = self.values.as_ref()?;
        if allowed.iter().any(|candidate| candidate.loose_eq(value)) {
            None
        } else {
            Some(ErrorKind::Value)
        }
    }

    fn check_regex(&self, value: &Value) -> Option<ErrorKind> {
        let pattern = self.regex.as_ref()?;
        match value.to_text() {
            Some(text) if pattern.is_match(&text) => None,
            _ => Some(ErrorKind::Regex),
        }
    }

    /// Look a rule up by name, falling back to residual rules.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "min" => self.min.clone(),
            "max" => self.max.clone(),
            "min_length" => self.min_length.map(length_value),
            "max_length" => self.max_length.map(length_value),
            "regex" => self.regex.as_ref().map(|p| Value::from(p.as_str())),
            "values" => self.values.clone().map(Value::List),
            "class" => self.class.as_deref().map(Value::from),
            "container" => self.container.as_deref().map(Value::from),
            other => self.extra.get(other).cloned(),
        }
    }
}

fn length_value(len: usize) -> Value {
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Rules {
        Rules::new()
    }

    #[test]
    fn range_is_inclusive() {
        let r = Rules {
            min: Some(Value::from(1)),
            max: Some(Value::from(10)),
            ..rules()
        };
        assert_eq!(r.check(&Value::from(1)), None);
        assert_eq!(r.check(&Value::from(10)), None);
        assert_eq!(r.check(&Value::from(11)), Some(ErrorKind::Max));
        assert_eq!(r.check(&Value::from(-3)), Some(ErrorKind::Min));
        assert_eq!(r.check(&Value::from(0.5)), Some(ErrorKind::Min));
    }

    #[test]
    fn falsy_values_skip_the_range() {
        let r = Rules {
            min: Some(Value::from(5)),
            ..rules()
        };
        assert_eq!(r.check(&Value::from(0)), None);
        assert_eq!(r.check(&Value::from("")), None);
    }

    #[test]
    fn date_strings_compare_as_text() {
        let r = Rules {
            min: Some(Value::from("2020-01-01")),
            ..rules()
        };
        assert_eq!(r.check(&Value::from("2019-12-31")), Some(ErrorKind::Min));
        assert_eq!(r.check(&Value::from("2020-06-01")), None);
    }

    #[test]
    fn length_counts_characters() {
        let r = Rules {
            min_length: Some(2),
            max_length: Some(4),
            ..rules()
        };
        assert_eq!(r.check(&Value::from("日本語")), None);
        assert_eq!(r.check(&Value::from("é")), Some(ErrorKind::TooShort));
        assert_eq!(r.check(&Value::from("héllo")), Some(ErrorKind::TooLong));
        assert_eq!(r.check(&Value::from(12345)), Some(ErrorKind::TooLong));
    }

    #[test]
    fn values_allow_list_is_loose() {
        let r = Rules {
            values: Some(vec![Value::from("draft"), Value::from(1)]),
            ..rules()
        };
        assert_eq!(r.check(&Value::from("draft")), None);
        assert_eq!(r.check(&Value::from("1")), None);
        assert_eq!(r.check(&Value::from("published")), Some(ErrorKind::Value));
    }

    #[test]
    fn regex_bare_and_delimited() {
        let bare = Rules {
            regex: Some(Pattern::new("code", "^[a-z]+$").unwrap()),
            ..rules()
        };
        assert_eq!(bare.check(&Value::from("abc")), None);
        assert_eq!(bare.check(&Value::from("ABC")), Some(ErrorKind::Regex));

        let delimited = Rules {
            regex: Some(Pattern::new("code", "/^[a-z]+$/i").unwrap()),
            ..rules()
        };
        assert_eq!(delimited.check(&Value::from("ABC")), None);
        assert_eq!(delimited.check(&Value::List(vec![])), Some(ErrorKind::Regex));
    }

    #[test]
    fn invalid_regex_is_a_configuration_error() {
        let err = Pattern::new("code", "([a-z]").unwrap_err();
        assert!(matches!(err, FieldsError::InvalidRegex { ref field, .. } if field == "code"));
    }

    #[test]
    fn first_violation_wins() {
        let r = Rules {
            max: Some(Value::from(100)),
            max_length: Some(2),
            values: Some(vec![Value::from(7)]),
            regex: Some(Pattern::new("n", "^9").unwrap()),
            ..rules()
        };
        assert_eq!(r.check(&Value::from(150)), Some(ErrorKind::Max));
        assert_eq!(r.check(&Value::from(99)), Some(ErrorKind::Value));
        assert_eq!(r.check(&Value::from(7)), Some(ErrorKind::Regex));
    }

    #[test]
    fn get_falls_back_to_residual_rules() {
        let mut r = Rules {
            min_length: Some(3),
            class: Some("Tag".into()),
            ..rules()
        };
        r.extra.insert("placeholder".into(), Value::from("Your name"));

        assert_eq!(r.get("min_length"), Some(Value::from(3)));
        assert_eq!(r.get("class"), Some(Value::from("Tag")));
        assert_eq!(r.get("placeholder"), Some(Value::from("Your name")));
        assert_eq!(r.get("max"), None);
        assert_eq!(r.get("nonexistent"), None);
    }
}
