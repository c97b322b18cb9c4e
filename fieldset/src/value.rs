//! Dynamic values held in records
//!
//! Raw input records are untyped, so every field value is a [`Value`]. The
//! same enum also carries coerced results. Truthiness and the loose
//! comparisons used by range and allow-list rules follow the conventions of
//! form input: `""`, `"0"`, `0`, `0.0`, `false`, `Null` and empty containers
//! are falsy, and numeric strings compare as numbers.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// A related instance held by an object or entity field.
///
/// Implementors describe which class they conform to and, for entities,
/// their identity key. An entity whose identity is falsy is treated as
/// unsaved and therefore empty.
pub trait Instance: fmt::Debug + Send + Sync {
    /// Name of the concrete class.
    fn class(&self) -> &str;

    /// Whether this instance satisfies the declared class or capability.
    fn is_instance_of(&self, class: &str) -> bool {
        self.class() == class
    }

    /// Identity key; `Null` for instances that have not been persisted.
    fn id(&self) -> Value {
        Value::Null
    }

    /// JSON representation, if the instance can be encoded.
    fn to_json(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Default container kind for collection fields.
pub const DEFAULT_CONTAINER: &str = "related";

/// A sequence of related records of one item class.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    class: String,
    container: String,
    items: Vec<Value>,
}

impl Collection {
    pub fn new(class: impl Into<String>) -> Self {
        Self::with_container(class, DEFAULT_CONTAINER)
    }

    pub fn with_container(class: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            container: container.into(),
            items: Vec::new(),
        }
    }

    /// Item class of this collection.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn push(&mut self, item: impl Into<Value>) {
        self.items.push(item.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of truthy items.
    pub fn filtered_len(&self) -> usize {
        self.items.iter().filter(|v| v.is_truthy()).count()
    }
}

/// A dynamic field value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Raw bytes; text fields reject them unless they are valid UTF-8.
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Collection(Collection),
    Object(Arc<dyn Instance>),
}

impl Value {
    /// Wrap a related instance.
    pub fn object(instance: impl Instance + 'static) -> Self {
        Value::Object(Arc::new(instance))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Scalars can be rendered as text without loss of meaning.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) | Value::Bytes(_)
        )
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Collection(_) => "collection",
            Value::Object(_) => "object",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::Bytes(b) => !b.is_empty() && b.as_slice() != b"0",
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Collection(_) | Value::Object(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text form of a scalar. `true` renders as `"1"` and `false` as `""`.
    /// Returns `None` for containers and instances.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(true) => Some("1".to_string()),
            Value::Bool(false) => Some(String::new()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(format_float(*f)),
            Value::String(s) => Some(s.clone()),
            Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
            _ => None,
        }
    }

    /// Numeric reading used by loose comparisons: numbers and numeric strings.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => parse_numeric_string(s),
            _ => None,
        }
    }

    /// Integer conversion that never fails: leading numeric prefix of a
    /// string, truncation of floats, truthiness for everything else.
    pub fn to_int_lossy(&self) -> i64 {
        match self {
            Value::Int(i) => *i,
            Value::Float(f) => truncate_float(*f),
            Value::String(s) => numeric_prefix(s).map(truncate_float).unwrap_or(0),
            Value::Bytes(b) => numeric_prefix(&String::from_utf8_lossy(b))
                .map(truncate_float)
                .unwrap_or(0),
            other => i64::from(other.is_truthy()),
        }
    }

    /// Float conversion that never fails.
    pub fn to_float_lossy(&self) -> f64 {
        match self {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::String(s) => numeric_prefix(s).unwrap_or(0.0),
            Value::Bytes(b) => numeric_prefix(&String::from_utf8_lossy(b)).unwrap_or(0.0),
            other => f64::from(u8::from(other.is_truthy())),
        }
    }

    /// Equality as used by the `values` allow-list: numeric strings equal the
    /// numbers they spell, booleans compare by truthiness.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), b) | (b, Value::Bool(a)) => *a == b.is_truthy(),
            (Value::Null, Value::Null) => true,
            (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
            (Value::Null, v) | (v, Value::Null) => !v.is_truthy(),
            (Value::String(a), Value::String(b)) => match (self.to_number(), other.to_number()) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
            _ => match (self.to_number(), other.to_number()) {
                (Some(x), Some(y)) => x == y,
                _ => self == other,
            },
        }
    }

    /// Ordering as used by `min`/`max` rules. Booleans compare by
    /// truthiness, numbers (and numeric strings) numerically, other scalars
    /// as text. Containers are unordered.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        if matches!(self, Value::Bool(_)) || matches!(other, Value::Bool(_)) {
            return Some(self.is_truthy().cmp(&other.is_truthy()));
        }
        if let (Some(x), Some(y))= (self.to_number(), other.to_number()) {
            return x.partial_cmp(&y);
        }
        if !self.is_scalar() || !other.is_scalar() {
            return None;
        }
        let (a, b) = (self.to_text()?, other.to_text()?);
        Some(a.cmp(&b))
    }

    /// JSON encoding, or `None` when the value cannot be represented
    /// (non-finite floats, malformed UTF-8, opaque instances).
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;
        let json = match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => Json::Number(serde_json::Number::from_f64(*f)?),
            Value::String(s) => Json::String(s.clone()),
            Value::Bytes(b) => Json::String(String::from_utf8(b.clone()).ok()?),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| v.to_json().map(|j| (k.clone(), j)))
                    .collect::<Option<serde_json::Map<_, _>>>()?,
            ),
            Value::Collection(c) => Json::Array(
                c.items()
                    .iter()
                    .map(Value::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Object(instance) => instance.to_json()?,
        };
        Some(json)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Collection(a), Value::Collection(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

/// Renders floats the way form input would spell them: integral values
/// without a fractional part.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

fn truncate_float(f: f64) -> i64 {
    if f.is_nan() {
        0
    } else {
        // `as` saturates at the i64 bounds
        f.trunc() as i64
    }
}

/// A whole string that reads as a number, allowing surrounding whitespace.
fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let prefix_len = numeric_prefix_len(trimmed);
    if prefix_len == 0 || prefix_len != trimmed.len() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// The leading number of a string, ignoring leading whitespace.
fn numeric_prefix(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let len = numeric_prefix_len(trimmed);
    if len == 0 {
        return None;
    }
    trimmed[..len].parse::<f64>().ok()
}

/// Byte length of the longest `[+-]?digits[.digits][e[+-]digits]` prefix.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(v: IndexMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl From<Collection> for Value {
    fn from(v: Collection) -> Self {
        Value::Collection(v)
    }
}

impl From<Arc<dyn Instance>> for Value {
    fn from(v: Arc<dyn Instance>) -> Self {
        Value::Object(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match v {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
