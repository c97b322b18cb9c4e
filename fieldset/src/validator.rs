//! Per-type coercion and checking of raw values
//!
//! Every `validate_*` function is pure: it takes a raw [`Value`] and returns
//! the coerced clean value, or `None` when the value cannot be coerced.
//! Booleans return `Option<bool>` so that a genuine `false` stays distinct
//! from a failure. [`validate_year`] only answers whether a year is
//! acceptable and never produces a coerced year.
//!
//! [`Check`] offers the short-hand "is this value a valid X" form over the
//! same functions.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

use crate::types::FieldType;
use crate::value::Value;

/// Canonical format of datetime fields.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Canonical format of date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical format of time fields.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Inclusive lower bound accepted by [`validate_year`].
pub const YEAR_MIN: i64 = 1900;
/// Inclusive upper bound accepted by [`validate_year`].
pub const YEAR_MAX: i64 = 2155;

const ZERO_DATE: &str = "0000-00-00";
const ZERO_TIME: &str = "00:00:00";
const ZERO_YEAR: &str = "0000";
const ZERO_IP: &str = "0.0.0.0";

static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$")
        .expect("float pattern is valid")
});

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:0|[1-9]\d*)$").expect("integer pattern is valid"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    )
    .expect("email pattern is valid")
});

/// Schemes that are valid without a host part.
const HOSTLESS_SCHEMES: [&str; 3] = ["mailto", "news", "file"];

/// Whether `text` is the all-zero "no value" placeholder of a temporal type.
pub fn is_zero_placeholder(text: &str, field_type: FieldType) -> bool {
    let text = text.trim();
    match field_type {
        FieldType::Datetime | FieldType::Date => text.contains(ZERO_DATE),
        FieldType::Time => text == ZERO_TIME,
        FieldType::Year => text == ZERO_YEAR,
        _ => false,
    }
}

/// Whether a value counts as empty for a field of the given type.
///
/// Falsy and blank scalars are always empty. Collections are empty when none
/// of their items is truthy, entities when their identity key is falsy,
/// temporal values when they hold the all-zero placeholder, and IP addresses
/// when they are `0.0.0.0`.
pub fn is_empty(value: &Value, field_type: FieldType) -> bool {
    if !value.is_truthy() {
        return true;
    }
    if value.is_scalar() {
        let blank = value
            .to_text()
            .map(|text| !Value::from(text.trim()).is_truthy())
            .unwrap_or(false);
        if blank {
            return true;
        }
    }

    match field_type {
        FieldType::Collection => match value {
            Value::Collection(items) => items.filtered_len() == 0,
            Value::List(items) => !items.iter().any(Value::is_truthy),
            _ => false,
        },
        FieldType::Entity => match value {
            Value::Object(instance) => !instance.id().is_truthy(),
            _ => false,
        },
        FieldType::Datetime | FieldType::Date | FieldType::Time | FieldType::Year => value
            .to_text()
            .map(|text| is_zero_placeholder(&text, field_type))
            .unwrap_or(false),
        FieldType::Ip => value.to_text().is_some_and(|text| text.trim() == ZERO_IP),
        _ => false,
    }
}

/// Well-formed text, trimmed. Raw bytes must be valid UTF-8.
pub fn validate_text(value: &Value) -> Option<String> {
    match value {
        Value::Bytes(bytes) => std::str::from_utf8(bytes)
            .ok()
            .map(|s| s.trim().to_string()),
        other => other.to_text().map(|s| s.trim().to_string()),
    }
}

/// Integer coercion. Falsy input becomes zero; anything else must spell an
/// integer exactly.
pub fn validate_integer(value: &Value) -> Option<i64> {
    if !value.is_truthy() {
        return Some(0);
    }
    match value {
        Value::Int(i) => Some(*i),
        Value::Bool(true) => Some(1),
        Value::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 {
                Some(*f as i64)
            } else {
                None
            }
        }
        Value::String(_) | Value::Bytes(_) => parse_integer(&validate_text(value)?),
        _ => None,
    }
}

/// Float coercion. Falsy input becomes zero; strings may group thousands
/// with commas.
pub fn validate_float(value: &Value) -> Option<f64> {
    if !value.is_truthy() {
        return Some(0.0);
    }
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Bool(true) => Some(1.0),
        Value::String(_) | Value::Bytes(_) => parse_float(&validate_text(value)?),
        _ => None,
    }
}

/// Boolean coercion. `None` means the value is neither true nor false.
pub fn validate_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Int(1) => Some(true),
        Value::Int(0) => Some(false),
        Value::Float(f) if *f == 1.0 => Some(true),
        Value::Float(f) if *f == 0.0 => Some(false),
        Value::String(_) | Value::Bytes(_) => parse_boolean(&validate_text(value)?),
        _ => None,
    }
}

/// Resolve a value to a unix timestamp.
///
/// Integers are taken as-is; strings may also be `@<unix>` or one of the
/// date/time spellings accepted by [`parse_datetime`].
pub fn validate_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
        Value::String(_) | Value::Bytes(_) => {
            let text = validate_text(value)?;
            parse_integer(&text).or_else(|| parse_datetime(&text, Utc::now()))
        }
        _ => None,
    }
}

/// Datetime coercion to `Y-m-d H:i:s`.
pub fn validate_datetime(value: &Value) -> Option<String> {
    validate_temporal(value, FieldType::Datetime, DATETIME_FORMAT)
}

/// Date coercion to `Y-m-d`.
pub fn validate_date(value: &Value) -> Option<String> {
    validate_temporal(value, FieldType::Date, DATE_FORMAT)
}

/// Time coercion to `H:i:s`.
pub fn validate_time(value: &Value) -> Option<String> {
    validate_temporal(value, FieldType::Time, TIME_FORMAT)
}

/// Resolve a value through [`validate_timestamp`] and render it with
/// `format`. Blank input and the type's all-zero placeholder become `""`.
pub fn validate_temporal(value: &Value, field_type: FieldType, format: &str) -> Option<String> {
    let text = validate_text(value)?;
    if !Value::from(text.as_str()).is_truthy() || is_zero_placeholder(&text, field_type) {
        return Some(String::new());
    }
    let ts = validate_timestamp(value)?;
    let resolved = DateTime::from_timestamp(ts, 0)?;
    Some(resolved.format(format).to_string())
}

/// Whether a value is a year within `min..=max`.
///
/// Unlike the other validators this returns acceptability only.
pub fn validate_year(value: &Value, min: i64, max: i64) -> bool {
    match validate_integer(value) {
        Some(year) => year >= min && year <= max,
        None => false,
    }
}

/// IPv4 coercion to dotted-quad text. Non-zero integers are read as packed
/// 32-bit addresses.
pub fn validate_ip(value: &Value) -> Option<String> {
    if let Some(packed) = validate_integer(value).filter(|i| *i != 0) {
        return u32::try_from(packed)
            .ok()
            .map(|bits| Ipv4Addr::from(bits).to_string());
    }
    let text = value.to_text()?;
    text.parse::<Ipv4Addr>().ok().map(|addr| addr.to_string())
}

/// Email syntax check. Falsy input is allowed and becomes `""`.
pub fn validate_email(value: &Value) -> Option<String> {
    if !value.is_truthy() {
        return Some(String::new());
    }
    let text = match value {
        Value::String(_) | Value::Bytes(_) => validate_text(value)?,
        _ => return None,
    };
    if text.len() != value.to_text()?.len() {
        // surrounding whitespace is not part of an address
        return None;
    }
    let local_ok = text.split('@').next().is_some_and(|local| local.len() <= 64);
    if local_ok && text.len() <= 320 && EMAIL_RE.is_match(&text) {
        Some(text)
    } else {
        None
    }
}

/// URL syntax check. Falsy input is allowed and becomes `""`.
pub fn validate_url(value: &Value) -> Option<String> {
    if !value.is_truthy() {
        return Some(String::new());
    }
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Bytes(_) => validate_text(value)?,
        _ => return None,
    };
    if text.chars().any(char::is_whitespace) {
        return None;
    }
    let parsed = url::Url::parse(&text).ok()?;
    if parsed.has_host() || HOSTLESS_SCHEMES.contains(&parsed.scheme()) {
        Some(text)
    } else {
        None
    }
}

/// JSON coercion. Strings are decoded; other values must be encodable and
/// are returned unchanged.
pub fn validate_json(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => serde_json::from_str::<serde_json::Value>(s)
            .ok()
            .map(Value::from),
        Value::Bytes(bytes) => serde_json::from_slice::<serde_json::Value>(bytes)
            .ok()
            .map(Value::from),
        other => other.to_json().map(|_| other.clone()),
    }
}

/// Referential check: an instance of `class`, or `Null` when nullable.
pub fn validate_object(value: &Value, class: &str, nullable: bool) -> Option<Value> {
    match value {
        Value::Object(instance) if instance.is_instance_of(class) => Some(value.clone()),
        Value::Null if nullable => Some(Value::Null),
        _ => None,
    }
}

/// Binary pass-through. Bytes are kept, everything else is stringified.
pub fn validate_binary(value: &Value) -> Value {
    match value {
        Value::Bytes(_) => value.clone(),
        other => Value::String(stringify(other)),
    }
}

fn stringify(value: &Value) -> String {
    if let Some(text) = value.to_text() {
        return text;
    }
    match value {
        Value::Collection(c) => c.class().to_string(),
        Value::Object(instance) => instance.class().to_string(),
        other => other
            .to_json()
            .map(|json| json.to_string())
            .unwrap_or_default(),
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if !INTEGER_RE.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

fn parse_float(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if !FLOAT_RE.is_match(trimmed) {
        return None;
    }
    trimmed.replace(',', "").parse::<f64>().ok()
}

fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Parse a free-form date/time string into a unix timestamp, in UTC.
///
/// Accepts `@<unix>`, RFC 3339, RFC 2822, `Y-m-d H:i:s` and close variants,
/// bare dates, bare times (on the date of `now`) and the keywords `now`,
/// `today`, `tomorrow` and `yesterday`.
pub fn parse_datetime(text: &str, now: DateTime<Utc>) -> Option<i64> {
    const DATETIME_FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y"];
    const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

    let text = text.trim();
    let today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    match text.to_lowercase().as_str() {
        "now" => return Some(now.timestamp()),
        "today" | "midnight" => return Some(today.timestamp()),
        "tomorrow" => return Some((today + Duration::days(1)).timestamp()),
        "yesterday" => return Some((today - Duration::days(1)).timestamp()),
        _ => {}
    }

    if let Some(epoch) = text.strip_prefix('@') {
        return parse_integer(epoch);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().timestamp());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.and_time(NaiveTime::MIN).and_utc().timestamp());
        }
    }
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return Some(now.date_naive().and_time(time).and_utc().timestamp());
        }
    }
    None
}

/// Short-hand checks: "is this value a valid X".
///
/// Referential checks are not listed because they need a class argument;
/// use [`validate_object`] for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    Text,
    Integer,
    Float,
    Boolean,
    Timestamp,
    DateTime,
    Date,
    Time,
    Year,
    Ip,
    Email,
    Url,
    Json,
}

/// Predicate table behind [`Check`], fixed at compile time.
static CHECKS: [(Check, &str, fn(&Value) -> bool); 13] = [
    (Check::Text, "text", |v| validate_text(v).is_some()),
    (Check::Integer, "integer", |v| validate_integer(v).is_some()),
    (Check::Float, "float", |v| validate_float(v).is_some()),
    (Check::Boolean, "boolean", |v| validate_boolean(v).is_some()),
    (Check::Timestamp, "timestamp", |v| {
        validate_timestamp(v).is_some()
    }),
    (Check::DateTime, "datetime", |v| validate_datetime(v).is_some()),
    (Check::Date, "date", |v| validate_date(v).is_some()),
    (Check::Time, "time", |v| validate_time(v).is_some()),
    (Check::Year, "year", |v| validate_year(v, YEAR_MIN, YEAR_MAX)),
    (Check::Ip, "ip", |v| validate_ip(v).is_some()),
    (Check::Email, "email", |v| validate_email(v).is_some()),
    (Check::Url, "url", |v| validate_url(v).is_some()),
    (Check::Json, "json", |v| validate_json(v).is_some()),
];

impl Check {
    pub fn name(&self) -> &'static str {
        self.entry().1
    }

    /// Look a check up by name. Accepts both `"integer"` and `"isInteger"`,
    /// case-insensitively.
    pub fn from_name(name: &str) -> Option<Check> {
        let lowered = name.trim().to_lowercase();
        let bare = lowered
            .strip_prefix("is")
            .filter(|rest| CHECKS.iter().any(|(_, n, _)| n == rest))
            .unwrap_or(lowered.as_str());
        CHECKS
            .iter()
            .find(|(_, n, _)| *n == bare)
            .map(|(check, _, _)| *check)
    }

    /// The check matching a field type, if one exists.
    pub fn for_type(field_type: FieldType) -> Option<Check> {
        Check::from_name(field_type.as_str())
    }

    /// Run the check.
    pub fn passes(&self, value: &Value) -> bool {
        (self.entry().2)(value)
    }

    fn entry(&self) -> &'static (Check, &'static str, fn(&Value) -> bool) {
        // every variant has exactly one row
        &CHECKS[*self as usize]
    }
}

/// Run a check by name; `None` when no such check exists.
pub fn is(name: &str, value: &Value) -> Option<bool> {
    Check::from_name(name).map(|check| check.passes(value))
}
