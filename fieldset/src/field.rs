//! Field definitions and the validate/cast pipeline
//!
//! A [`Field`] is built once, through [`FieldBuilder`] or a
//! [`FieldDef`](crate::schema::FieldDef), and is read-only afterwards.
//! Construction enforces that object, entity and collection fields name their
//! item class; everything data-dependent is reported by [`Field::validate`]
//! as an [`ErrorKind`].

use std::fmt;
use std::sync::Arc;

use crate::error::{FieldsError, Result};
use crate::rules::{Pattern, Rules};
use crate::types::{ErrorKind, FieldType};
use crate::validator;
use crate::value::{Collection, Value, DEFAULT_CONTAINER};

/// Produces a fresh default value on every call.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// A field's default: a stored constant or a factory.
///
/// Composite defaults (an empty collection, a new related instance) use a
/// factory so that two records never share one instance.
#[derive(Clone)]
pub enum DefaultValue {
    Constant(Value),
    Deferred(DefaultFactory),
}

impl DefaultValue {
    pub fn deferred(factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        DefaultValue::Deferred(Arc::new(factory))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, DefaultValue::Deferred(_))
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            DefaultValue::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Outcome of validating one value against one field.
///
/// On success `value` is the coerced value. On failure it is the original
/// input, untouched, and `error` says why.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub value: Value,
    pub error: Option<ErrorKind>,
}

impl Validated {
    fn ok(value: Value) -> Self {
        Self { value, error: None }
    }

    fn failed(value: Value, error: ErrorKind) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A single named, typed, rule-constrained value definition.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    field_type: FieldType,
    required: bool,
    nullable: bool,
    unique: bool,
    label: String,
    readonly: bool,
    guarded: bool,
    default: DefaultValue,
    rules: Rules,
}

impl Field {
    /// Start building a field.
    pub fn builder(name: impl Into<String>, field_type: FieldType) -> FieldBuilder {
        FieldBuilder::new(name, field_type)
    }

    /// A field with no rules beyond its type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Result<Self> {
        FieldBuilder::new(name, field_type).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Advisory; enforced by the persistence layer, not here.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_guarded(&self) -> bool {
        self.guarded
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn default_definition(&self) -> &DefaultValue {
        &self.default
    }

    pub fn is_numeric(&self) -> bool {
        self.field_type.is_numeric()
    }

    pub fn is_temporal(&self) -> bool {
        self.field_type.is_temporal()
    }

    pub fn is_text(&self) -> bool {
        self.field_type.is_text()
    }

    pub fn is_object(&self) -> bool {
        self.field_type.is_object()
    }

    pub fn is_collection(&self) -> bool {
        self.field_type.is_collection()
    }

    /// Resolve the default for a new record.
    ///
    /// Factories run on every call. Constants are passed through [`Field::cast`].
    pub fn default_value(&self) -> Value {
        match &self.default {
            DefaultValue::Deferred(factory) => factory(),
            DefaultValue::Constant(value) => self.cast(value),
        }
    }

    /// Look up an attribute by name: typed attributes first, then rules.
    ///
    /// Returns `None` when neither defines `key`.
    pub fn attribute(&self, key: &str) -> Option<Value> {
        let value = match key {
            "name" => Value::from(self.name.as_str()),
            "type" => Value::from(self.field_type.as_str()),
            "required" => Value::from(self.required),
            "nullable" => Value::from(self.nullable),
            "unique" => Value::from(self.unique),
            "label" => Value::from(self.label.as_str()),
            "readonly" => Value::from(self.readonly),
            "guarded" => Value::from(self.guarded),
            "default" => self.default_value(),
            other => return self.rules.get(other),
        };
        Some(value)
    }

    /// Best-effort conversion of a stored value; never fails.
    pub fn cast(&self, value: &Value) -> Value {
        match self.field_type {
            FieldType::Integer | FieldType::Timestamp | FieldType::Year => {
                Value::Int(value.to_int_lossy())
            }
            FieldType::Float => Value::Float(value.to_float_lossy()),
            FieldType::Boolean => Value::Bool(value.is_truthy()),
            FieldType::Datetime | FieldType::Date | FieldType::Time => match value.to_text() {
                Some(text) if validator::is_zero_placeholder(&text, self.field_type) => {
                    Value::from("")
                }
                _ => value.clone(),
            },
            FieldType::Json => cast_json(value),
            _ => value.clone(),
        }
    }

    /// Validate and coerce one raw value.
    ///
    /// Checks run in a fixed order and stop at the first failure: required,
    /// null, type coercion, then the rule chain (range, length, values,
    /// regex).
    pub fn validate(&self, value: &Value) -> Validated {
        if self.required && validator::is_empty(value, self.field_type) {
            return Validated::failed(value.clone(), ErrorKind::Required);
        }
        if !self.nullable && value.is_null() {
            return Validated::failed(value.clone(), ErrorKind::Null);
        }

        let clean = match self.coerce(value) {
            Ok(clean) => clean,
            Err(kind) => return Validated::failed(value.clone(), kind),
        };

        match self.rules.check(&clean) {
            Some(kind) => Validated::failed(value.clone(), kind),
            None => Validated::ok(clean),
        }
    }

    /// Type coercion step of [`Field::validate`].
    fn coerce(&self, value: &Value) -> std::result::Result<Value, ErrorKind> {
        let failure = || ErrorKind::for_type(self.field_type).unwrap_or(ErrorKind::Value);
        let coerced = match self.field_type {
            FieldType::Text => validator::validate_text(value).map(Value::String),
            FieldType::Integer => validator::validate_integer(value).map(Value::Int),
            FieldType::Float => validator::validate_float(value).map(Value::Float),
            FieldType::Boolean => validator::validate_boolean(value).map(Value::Bool),
            FieldType::Datetime => validator::validate_datetime(value).map(Value::String),
            FieldType::Date => validator::validate_date(value).map(Value::String),
            FieldType::Time => validator::validate_time(value).map(Value::String),
            FieldType::Year => {
                // acceptability only: the clean value is `true`, not the year
                validator::validate_year(value, validator::YEAR_MIN, validator::YEAR_MAX)
                    .then_some(Value::Bool(true))
            }
            FieldType::Timestamp => validator::validate_timestamp(value).map(Value::Int),
            FieldType::Email => validator::validate_email(value).map(Value::String),
            FieldType::Url => validator::validate_url(value).map(Value::String),
            FieldType::Ip => validator::validate_ip(value).map(Value::String),
            FieldType::Json => validator::validate_json(value),
            FieldType::Object | FieldType::Entity => {
                let class = self.rules.class.as_deref().unwrap_or_default();
                validator::validate_object(value, class, self.nullable)
            }
            FieldType::Binary => Some(validator::validate_binary(value)),
            FieldType::Collection => Some(value.clone()),
        };
        coerced.ok_or_else(failure)
    }
}

fn cast_json(value: &Value) -> Value {
    match value {
        Value::List(_) | Value::Map(_) => value.clone(),
        v if !v.is_truthy() => Value::Map(Default::default()),
        Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
            Ok(json @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => {
                Value::from(json)
            }
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Builder for [`Field`].
///
/// ```
/// use fieldset::{Field, FieldType};
///
/// let score = Field::builder("score", FieldType::Integer)
///     .required(true)
///     .min(0)
///     .max(100)
///     .build()
///     .unwrap();
/// assert_eq!(score.label(), "score");
/// ```
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    name: String,
    field_type: FieldType,
    required: bool,
    nullable: Option<bool>,
    unique: bool,
    label: Option<String>,
    readonly: bool,
    guarded: bool,
    default: Option<DefaultValue>,
    regex: Option<String>,
    rules: Rules,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            nullable: None,
            unique: false,
            label: None,
            readonly: false,
            guarded: false,
            default: None,
            regex: None,
            rules: Rules::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Whether an explicit null is accepted. Object and entity fields
    /// default to nullable, everything else does not.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Human-readable name; defaults to the field name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn guarded(mut self, guarded: bool) -> Self {
        self.guarded = guarded;
        self
    }

    /// Constant default, cast to the field type when read.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Constant(value.into()));
        self
    }

    /// Default produced by `factory` on every read.
    pub fn default_with(mut self, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::deferred(factory));
        self
    }

    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.rules.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.rules.max = Some(max.into());
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.rules.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.rules.max_length = Some(len);
        self
    }

    /// Pattern the value must match; compiled by [`FieldBuilder::build`].
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rules.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Item class for object, entity and collection fields.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.rules.class = Some(class.into());
        self
    }

    /// Container kind for collection fields.
    pub fn container(mut self, container: impl Into<String>) -> Self {
        self.rules.container = Some(container.into());
        self
    }

    /// A rule this crate does not interpret, kept for consumers.
    pub fn rule(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rules.extra.insert(key.into(), value.into());
        self
    }

    /// Finish the definition.
    ///
    /// Fails when a composite field has no `class`, when `regex` does not
    /// compile, or when the length bounds are inverted.
    pub fn build(self) -> Result<Field> {
        let FieldBuilder {
            name,
            field_type,
            required,
            nullable,
            unique,
            label,
            readonly,
            guarded,
            default,
            regex,
            mut rules,
        } = self;

        let class = rules.class.clone().filter(|c| !c.trim().is_empty());
        if field_type.requires_class() && class.is_none() {
            return Err(FieldsError::MissingClass {
                field: name,
                field_type: field_type.as_str().to_string(),
            });
        }

        if let (Some(min), Some(max)) = (rules.min_length, rules.max_length) {
            if min > max {
                return Err(FieldsError::InvalidRule {
                    field: name,
                    rule: "min_length".to_string(),
                    message: format!("min_length {min} exceeds max_length {max}"),
                });
            }
        }

        if let Some(pattern) = regex {
            rules.regex = Some(Pattern::new(&name, pattern)?);
        }

        let default = match (field_type, default, class) {
            (_, Some(explicit @ DefaultValue::Deferred(_)), _) => explicit,
            (FieldType::Collection, _, Some(class)) => {
                let container = rules
                    .container
                    .get_or_insert_with(|| DEFAULT_CONTAINER.to_string())
                    .clone();
                DefaultValue::deferred(move || {
                    Value::Collection(Collection::with_container(&class, &container))
                })
            }
            (FieldType::Object | FieldType::Entity, None, _) => {
                DefaultValue::Constant(Value::Null)
            }
            (_, Some(explicit), _) => explicit,
            (_, None, _) => DefaultValue::Constant(Value::from("")),
        };

        let label = label.unwrap_or_else(|| name.clone());
        let nullable = nullable.unwrap_or(field_type.is_referential());

        Ok(Field {
            name,
            field_type,
            required,
            nullable,
            unique,
            label,
            readonly,
            guarded,
            default,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Author {
        id: i64,
    }

    impl crate::value::Instance for Author {
        fn class(&self) -> &str {
            "Author"
        }

        fn id(&self) -> Value {
            Value::Int(self.id)
        }
    }

    fn field(name: &str, field_type: FieldType) -> Field {
        Field::new(name, field_type).unwrap()
    }

    #[test]
    fn builder_defaults() {
        let f = field("title", FieldType::Text);
        assert_eq!(f.name(), "title");
        assert_eq!(f.label(), "title");
        assert!(!f.is_required());
        assert!(!f.is_nullable());
        assert!(!f.is_unique());
        assert!(!f.is_readonly());
        assert!(!f.is_guarded());
        assert_eq!(f.default_value(), Value::from(""));
    }

    #[test]
    fn composite_fields_require_a_class() {
        for t in [FieldType::Object, FieldType::Entity, FieldType::Collection] {
            let err = Field::new("rel", t).unwrap_err();
            assert!(matches!(err, FieldsError::MissingClass { .. }), "{t}");
        }
        let err = Field::builder("rel", FieldType::Object)
            .class("  ")
            .build()
            .unwrap_err();
        assert!(matches!(err, FieldsError::MissingClass { .. }));
    }

    #[test]
    fn inverted_length_bounds_are_rejected() {
        let err = Field::builder("code", FieldType::Text)
            .min_length(5)
            .max_length(2)
            .build()
            .unwrap_err();
        assert!(matches!(err, FieldsError::InvalidRule { ref rule, .. } if rule == "min_length"));
    }

    #[test]
    fn referential_fields_default_to_nullable_null() {
        let f = Field::builder("author", FieldType::Object)
            .class("Author")
            .build()
            .unwrap();
        assert!(f.is_nullable());
        assert_eq!(f.default_value(), Value::Null);
        assert!(f.validate(&Value::Null).is_ok());

        let strict = Field::builder("author", FieldType::Entity)
            .class("Author")
            .nullable(false)
            .build()
            .unwrap();
        assert_eq!(strict.validate(&Value::Null).error, Some(ErrorKind::Null));
    }

    #[test]
    fn collection_defaults_are_fresh_instances() {
        let f = Field::builder("tags", FieldType::Collection)
            .class("Tag")
            .build()
            .unwrap();
        assert!(f.default_definition().is_deferred());
        assert_eq!(f.rules().container.as_deref(), Some(DEFAULT_CONTAINER));

        let mut first = f.default_value();
        let second = f.default_value();
        if let Value::Collection(c) = &mut first {
            assert_eq!(c.class(), "Tag");
            c.push("php");
        } else {
            panic!("expected a collection default");
        }
        match second {
            Value::Collection(c) => assert!(c.is_empty()),
            other => panic!("expected a collection default, got {other:?}"),
        }
    }

    #[test]
    fn deferred_default_runs_every_time() {
        let f = Field::builder("author", FieldType::Object)
            .class("Author")
            .default_with(|| Value::object(Author { id: 0 }))
            .build()
            .unwrap();
        assert_ne!(f.default_value(), f.default_value());
    }

    #[test]
    fn constant_defaults_are_cast() {
        let count = field("count", FieldType::Integer);
        assert_eq!(count.default_value(), Value::Int(0));

        let ratio = Field::builder("ratio", FieldType::Float)
            .default("2.5")
            .build()
            .unwrap();
        assert_eq!(ratio.default_value(), Value::Float(2.5));

        let meta = field("meta", FieldType::Json);
        assert_eq!(meta.default_value(), Value::Map(Default::default()));

        let active = field("active", FieldType::Boolean);
        assert_eq!(active.default_value(), Value::Bool(false));
    }

    #[test]
    fn required_short_circuits_everything() {
        let f = Field::builder("age", FieldType::Integer)
            .required(true)
            .min(18)
            .build()
            .unwrap();
        let out = f.validate(&Value::Null);
        assert_eq!(out.error, Some(ErrorKind::Required));
        assert_eq!(out.value, Value::Null);

        assert_eq!(
            f.validate(&Value::from("0")).error,
            Some(ErrorKind::Required)
        );
    }

    #[test]
    fn null_rejected_unless_nullable() {
        let f = field("name", FieldType::Text);
        assert_eq!(f.validate(&Value::Null).error, Some(ErrorKind::Null));

        let nullable = Field::builder("name", FieldType::Text)
            .nullable(true)
            .build()
            .unwrap();
        let out = nullable.validate(&Value::Null);
        assert!(out.is_ok());
        assert_eq!(out.value, Value::from(""));
    }

    #[test]
    fn coercion_failures_keep_the_raw_value() {
        let f = field("count", FieldType::Integer);
        let out = f.validate(&Value::from("ten"));
        assert_eq!(out.error, Some(ErrorKind::InvalidInteger));
        assert_eq!(out.value, Value::from("ten"));

        let ok = f.validate(&Value::from(" 10 "));
        assert_eq!(ok, Validated::ok(Value::Int(10)));
    }

    #[test]
    fn boolean_false_is_not_a_failure() {
        let f = field("active", FieldType::Boolean);
        assert_eq!(f.validate(&Value::from(false)).value, Value::Bool(false));
        assert!(f.validate(&Value::from(false)).is_ok());
        assert_eq!(f.validate(&Value::from("off")).value, Value::Bool(false));
        assert_eq!(
            f.validate(&Value::from("sometimes")).error,
            Some(ErrorKind::Boolean)
        );
    }

    #[test]
    fn rules_run_on_the_coerced_value() {
        let f = Field::builder("score", FieldType::Integer)
            .min(0)
            .max(100)
            .build()
            .unwrap();
        let out = f.validate(&Value::from("150"));
        assert_eq!(out.error, Some(ErrorKind::Max));
        assert_eq!(out.value, Value::from("150"));
        assert_eq!(f.validate(&Value::from("100")).value, Value::Int(100));
    }

    #[test]
    fn text_rules() {
        let f = Field::builder("slug", FieldType::Text)
            .min_length(3)
            .max_length(8)
            .regex("/^[a-z-]+$/")
            .build()
            .unwrap();
        assert_eq!(f.validate(&Value::from("  ab ")).error, Some(ErrorKind::TooShort));
        assert_eq!(
            f.validate(&Value::from("much-too-long")).error,
            Some(ErrorKind::TooLong)
        );
        assert_eq!(f.validate(&Value::from("Hello")).error, Some(ErrorKind::Regex));
        assert_eq!(f.validate(&Value::from(" hi-there ")).value, Value::from("hi-there"));
    }

    #[test]
    fn allow_list() {
        let f = Field::builder("status", FieldType::Text)
            .values(["draft", "live"])
            .build()
            .unwrap();
        assert!(f.validate(&Value::from("live")).is_ok());
        assert_eq!(f.validate(&Value::from("gone")).error, Some(ErrorKind::Value));
    }

    #[test]
    fn year_validation_yields_acceptability_not_the_year() {
        // validation never produces a usable coerced year
        let f = field("founded", FieldType::Year);
        let out = f.validate(&Value::from("1998"));
        assert!(out.is_ok());
        assert_eq!(out.value, Value::Bool(true));

        assert_eq!(
            f.validate(&Value::from("1800")).error,
            Some(ErrorKind::InvalidYear)
        );
        // reading a stored year through cast does give the integer
        assert_eq!(f.cast(&Value::from("1998")), Value::Int(1998));
    }

    #[test]
    fn year_range_rules_never_reject_an_acceptable_year() {
        let f = Field::builder("built", FieldType::Year)
            .min(1950)
            .max(1960)
            .build()
            .unwrap();
        let out = f.validate(&Value::from("1984"));
        assert_eq!(out.error, None);
        assert_eq!(out.value, Value::Bool(true));
    }

    #[test]
    fn temporal_placeholders() {
        let date = field("born", FieldType::Date);
        let out = date.validate(&Value::from("0000-00-00"));
        assert!(out.is_ok());
        assert_eq!(out.value, Value::from(""));
        assert_eq!(date.cast(&Value::from("0000-00-00")), Value::from(""));
        assert_eq!(date.cast(&Value::from("2001-02-03")), Value::from("2001-02-03"));

        let time = field("opens", FieldType::Time);
        assert_eq!(time.validate(&Value::from("00:00:00")).value, Value::from(""));
        assert_eq!(time.cast(&Value::from("00:00:00")), Value::from(""));
        assert_eq!(time.cast(&Value::from("09:05:00")), Value::from("09:05:00"));
        assert_eq!(
            time.validate(&Value::from("9:05")).value,
            Value::from("09:05:00")
        );
    }

    #[test]
    fn object_fields_check_the_class() {
        let f = Field::builder("author", FieldType::Object)
            .class("Author")
            .build()
            .unwrap();
        let author = Value::object(Author { id: 3 });
        assert_eq!(f.validate(&author).value, author);
        assert_eq!(
            f.validate(&Value::from("Author")).error,
            Some(ErrorKind::InvalidObject)
        );
    }

    #[test]
    fn unsaved_entity_counts_as_empty() {
        let f = Field::builder("owner", FieldType::Entity)
            .class("Author")
            .required(true)
            .build()
            .unwrap();
        assert_eq!(
            f.validate(&Value::object(Author { id: 0 })).error,
            Some(ErrorKind::Required)
        );
        assert!(f.validate(&Value::object(Author { id: 9 })).is_ok());
    }

    #[test]
    fn cast_is_best_effort() {
        assert_eq!(field("n", FieldType::Integer).cast(&Value::from("42abc")), Value::Int(42));
        assert_eq!(field("t", FieldType::Timestamp).cast(&Value::from(9.9)), Value::Int(9));
        assert_eq!(field("f", FieldType::Float).cast(&Value::from("x")), Value::Float(0.0));
        assert_eq!(field("b", FieldType::Boolean).cast(&Value::from("0")), Value::Bool(false));
        assert_eq!(field("b", FieldType::Boolean).cast(&Value::from("no")), Value::Bool(true));
        assert_eq!(field("s", FieldType::Text).cast(&Value::from(5)), Value::from(5));

        let json = field("j", FieldType::Json);
        assert_eq!(
            json.cast(&Value::from(r#"[1,2]"#)),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(json.cast(&Value::from("")), Value::Map(Default::default()));
        assert_eq!(json.cast(&Value::from("plain")), Value::from("plain"));
    }

    #[test]
    fn attribute_lookup() {
        let f = Field::builder("email", FieldType::Email)
            .label("Email address")
            .unique(true)
            .max_length(120)
            .rule("placeholder", "you@example.com")
            .build()
            .unwrap();
        assert_eq!(f.attribute("label"), Some(Value::from("Email address")));
        assert_eq!(f.attribute("type"), Some(Value::from("email")));
        assert_eq!(f.attribute("unique"), Some(Value::Bool(true)));
        assert_eq!(f.attribute("max_length"), Some(Value::Int(120)));
        assert_eq!(
            f.attribute("placeholder"),
            Some(Value::from("you@example.com"))
        );
        assert_eq!(f.attribute("min"), None);
        assert_eq!(f.attribute("bogus"), None);
    }
}
