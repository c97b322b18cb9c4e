//! An ordered collection of fields describing one record.
//!
//! Validation walks the fields in definition order and merges each result
//! into a cleaned record and an error map. Lookups by type (object,
//! collection, unique fields) go through an index derived lazily from the
//! field list and dropped whenever a field is added.

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{Result, ValidationFailed};
use crate::field::Field;
use crate::schema::SchemaDef;
use crate::types::{ErrorKind, FieldType};
use crate::value::Value;

/// A record: field name to value, in key order.
pub type Record = IndexMap<String, Value>;

/// Per-field validation failures; only failing fields are present.
pub type Errors = IndexMap<String, ErrorKind>;

/// Names of fields grouped by type, plus the unique fields.
#[derive(Debug, Clone, Default)]
struct TypeIndex {
    by_type: HashMap<FieldType, Vec<String>>,
    uniques: Vec<String>,
}

impl TypeIndex {
    fn build(fields: &IndexMap<String, Field>) -> Self {
        let mut index = TypeIndex::default();
        for field in fields.values() {
            index
                .by_type
                .entry(field.field_type())
                .or_default()
                .push(field.name().to_string());
            if field.is_unique() {
                index.uniques.push(field.name().to_string());
            }
        }
        debug!(
            fields = fields.len(),
            types = index.by_type.len(),
            uniques = index.uniques.len(),
            "rebuilt fieldset index"
        );
        index
    }

    fn names(&self, field_type: FieldType) -> &[String] {
        self.by_type
            .get(&field_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// An ordered, named collection of [`Field`]s.
///
/// `add` takes `&mut self`, so a fieldset shared across threads (behind an
/// `Arc`) can no longer be reconfigured; validation only ever needs `&self`.
///
/// ```
/// use fieldset::{ErrorKind, Field, FieldType, Fieldset, Record, Value};
///
/// let fields = Fieldset::new()
///     .with(Field::builder("age", FieldType::Integer).required(true).build().unwrap());
///
/// let (clean, errors) = fields.validate(&Record::new());
/// assert_eq!(errors.get("age"), Some(&ErrorKind::Required));
/// assert_eq!(clean.get("age"), Some(&Value::Null));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fieldset {
    fields: IndexMap<String, Field>,
    index: OnceLock<TypeIndex>,
}

impl Fieldset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fieldset from a YAML schema document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let schema: SchemaDef = serde_yaml_ng::from_str(yaml)?;
        schema.build()
    }

    /// Build a fieldset from a JSON schema document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let schema: SchemaDef = serde_json::from_str(json)?;
        schema.build()
    }

    /// Add a field, replacing any existing field of the same name.
    ///
    /// A replaced field keeps its position in definition order.
    pub fn add(&mut self, field: Field) -> &mut Self {
        let name = field.name().to_string();
        if let Some(previous) = self.fields.insert(name.clone(), field) {
            debug!(
                field = %name,
                previous_type = %previous.field_type(),
                "replaced field definition"
            );
        }
        self.index.take();
        self
    }

    /// Owned form of [`Fieldset::add`] for chained construction.
    pub fn with(mut self, field: Field) -> Self {
        self.add(field);
        self
    }

    /// Validate a raw record.
    ///
    /// Returns the cleaned record and the error map. Fields that pass hold
    /// their coerced value; fields that fail keep the raw input. Absent keys
    /// are treated as null. Collection fields are not validated here.
    pub fn validate(&self, record: &Record) -> (Record, Errors) {
        let mut clean = record.clone();
        let mut errors = Errors::new();
        let mut checked = 0usize;

        for field in self.fields.values().filter(|f| !f.is_collection()) {
            checked += 1;
            let raw = record.get(field.name()).cloned().unwrap_or_default();
            let outcome = field.validate(&raw);
            match outcome.error {
                None => {
                    clean.insert(field.name().to_string(), outcome.value);
                }
                Some(kind) => {
                    trace!(field = %field.name(), error = %kind, "field failed validation");
                    clean.insert(field.name().to_string(), raw);
                    errors.insert(field.name().to_string(), kind);
                }
            }
        }

        debug!(fields = checked, failures = errors.len(), "validated record");
        (clean, errors)
    }

    /// Validate a record and turn any failure into a [`ValidationFailed`].
    ///
    /// `origin` identifies where the record came from for the error report.
    pub fn validate_strict(
        &self,
        record: &Record,
        origin: &str,
    ) -> std::result::Result<Record, ValidationFailed> {
        let (clean, errors) = self.validate(record);
        if errors.is_empty() {
            Ok(clean)
        } else {
            Err(ValidationFailed::new(origin, errors))
        }
    }

    /// A fresh default for every field, collections included.
    pub fn defaults(&self) -> Record {
        self.fields
            .values()
            .map(|f| (f.name().to_string(), f.default_value()))
            .collect()
    }

    /// Field names in definition order.
    pub fn names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Names of fields of `field_type`, in definition order.
    pub fn by_type(&self, field_type: FieldType) -> Vec<&str> {
        self.index()
            .names(field_type)
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Names of fields referencing a single related instance (object and
    /// entity fields).
    pub fn objects(&self) -> Vec<&str> {
        let index = self.index();
        let referential: Vec<&String> = index
            .names(FieldType::Object)
            .iter()
            .chain(index.names(FieldType::Entity))
            .collect();
        self.fields
            .keys()
            .filter(|name| referential.contains(name))
            .map(String::as_str)
            .collect()
    }

    /// Names of collection fields.
    pub fn collections(&self) -> Vec<&str> {
        self.by_type(FieldType::Collection)
    }

    /// Names of fields flagged unique.
    pub fn uniques(&self) -> Vec<&str> {
        self.index().uniques.iter().map(String::as_str).collect()
    }

    fn index(&self) -> &TypeIndex {
        self.index.get_or_init(|| TypeIndex::build(&self.fields))
    }
}

impl<'a> IntoIterator for &'a Fieldset {
    type Item = &'a Field;
    type IntoIter = indexmap::map::Values<'a, String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.values()
    }
}

impl FromIterator<Field> for Fieldset {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut fieldset = Fieldset::new();
        for field in iter {
            fieldset.add(field);
        }
        fieldset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &str) -> Field {
        Field::new(name, FieldType::Text).unwrap()
    }

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test_log::test]
    fn add_preserves_definition_order() {
        let fs = Fieldset::new()
            .with(text("b"))
            .with(text("a"))
            .with(text("c"));
        assert_eq!(fs.names(), vec!["b", "a", "c"]);
        assert_eq!(fs.len(), 3);
        assert!(!fs.is_empty());
        assert!(fs.contains("a"));
        assert!(fs.get("z").is_none());
    }

    #[test_log::test]
    fn replacing_a_field_updates_the_indices() {
        let mut fs = Fieldset::new();
        fs.add(
            Field::builder("ref", FieldType::Text)
                .unique(true)
                .build()
                .unwrap(),
        );
        fs.add(text("other"));
        assert_eq!(fs.uniques(), vec!["ref"]);
        assert!(fs.objects().is_empty());

        fs.add(
            Field::builder("ref", FieldType::Object)
                .class("Author")
                .build()
                .unwrap(),
        );
        assert_eq!(fs.names(), vec!["ref", "other"]);
        assert!(fs.uniques().is_empty());
        assert_eq!(fs.objects(), vec!["ref"]);
        assert_eq!(fs.get("ref").map(Field::field_type), Some(FieldType::Object));
    }

    #[test_log::test]
    fn index_lookups() {
        let fs: Fieldset = [
            Field::new("id", FieldType::Integer).unwrap(),
            Field::builder("owner", FieldType::Entity)
                .class("User")
                .build()
                .unwrap(),
            Field::builder("tags", FieldType::Collection)
                .class("Tag")
                .build()
                .unwrap(),
            Field::builder("author", FieldType::Object)
                .class("User")
                .build()
                .unwrap(),
            Field::builder("slug", FieldType::Text)
                .unique(true)
                .build()
                .unwrap(),
            Field::new("count", FieldType::Integer).unwrap(),
        ]
        .into_iter()
        .collect();

        assert_eq!(fs.by_type(FieldType::Integer), vec!["id", "count"]);
        assert_eq!(fs.objects(), vec!["owner", "author"]);
        assert_eq!(fs.collections(), vec!["tags"]);
        assert_eq!(fs.uniques(), vec!["slug"]);
        assert!(fs.by_type(FieldType::Url).is_empty());
    }

    #[test_log::test]
    fn validate_merges_clean_values_and_errors() {
        let fs = Fieldset::new()
            .with(Field::new("count", FieldType::Integer).unwrap())
            .with(Field::new("active", FieldType::Boolean).unwrap())
            .with(text("name"));

        let input = record(&[
            ("name", Value::from("  Ada ")),
            ("count", Value::from("x")),
            ("active", Value::from("yes")),
            ("extra", Value::from(1)),
        ]);
        let (clean, errors) = fs.validate(&input);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("count"), Some(&ErrorKind::InvalidInteger));
        assert_eq!(clean.get("count"), Some(&Value::from("x")));
        assert_eq!(clean.get("active"), Some(&Value::Bool(true)));
        assert_eq!(clean.get("name"), Some(&Value::from("Ada")));
        assert_eq!(clean.get("extra"), Some(&Value::from(1)));
        let keys: Vec<&str> = clean.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "count", "active", "extra"]);
    }

    #[test_log::test]
    fn absent_keys_are_null() {
        let fs = Fieldset::new().with(text("name"));
        let (clean, errors) = fs.validate(&Record::new());
        assert_eq!(errors.get("name"), Some(&ErrorKind::Null));
        assert_eq!(clean.get("name"), Some(&Value::Null));
    }

    #[test_log::test]
    fn collections_are_skipped() {
        let fs = Fieldset::new().with(
            Field::builder("tags", FieldType::Collection)
                .class("Tag")
                .required(true)
                .build()
                .unwrap(),
        );
        let input = record(&[("tags", Value::from("not a collection"))]);
        let (clean, errors) = fs.validate(&input);
        assert!(errors.is_empty());
        assert_eq!(clean, input);
    }

    #[test_log::test]
    fn validate_strict_wraps_failures() {
        let fs = Fieldset::new().with(
            Field::builder("age", FieldType::Integer)
                .required(true)
                .build()
                .unwrap(),
        );
        let err = fs.validate_strict(&Record::new(), "signup").unwrap_err();
        assert_eq!(err.origin(), "signup");
        assert_eq!(err.errors().get("age"), Some(&ErrorKind::Required));

        let ok = fs
            .validate_strict(&record(&[("age", Value::from("42"))]), "signup")
            .unwrap();
        assert_eq!(ok.get("age"), Some(&Value::Int(42)));
    }

    #[test_log::test]
    fn defaults_cover_every_field() {
        let fs = Fieldset::new()
            .with(Field::new("count", FieldType::Integer).unwrap())
            .with(
                Field::builder("tags", FieldType::Collection)
                    .class("Tag")
                    .build()
                    .unwrap(),
            )
            .with(
                Field::builder("owner", FieldType::Entity)
                    .class("User")
                    .build()
                    .unwrap(),
            );
        let defaults = fs.defaults();
        assert_eq!(defaults.get("count"), Some(&Value::Int(0)));
        assert_eq!(defaults.get("owner"), Some(&Value::Null));
        assert!(matches!(defaults.get("tags"), Some(Value::Collection(c)) if c.is_empty()));
    }

    #[test_log::test]
    fn iterates_in_order() {
        let fs = Fieldset::new().with(text("x")).with(text("y"));
        let names: Vec<&str> = (&fs).into_iter().map(Field::name).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(fs.iter().count(), 2);
    }
}
