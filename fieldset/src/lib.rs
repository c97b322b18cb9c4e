//! Schema-driven field validation and casting
//!
//! `fieldset` checks untyped input records against a declared set of named,
//! typed fields. Each field coerces its raw value to a canonical form, then
//! applies its rules (required, nullable, range, length, allowed values,
//! regex, referential class). The result is a cleaned record plus a map of
//! per-field error codes.
//!
//! # Architecture
//!
//! - **Two error tiers**: configuration mistakes are [`FieldsError`]s raised
//!   when a field is built; bad data is reported as [`ErrorKind`] values,
//!   never as `Err`
//! - **Frozen after setup**: fields are immutable once built, and a
//!   [`Fieldset`] only needs `&self` to validate
//! - **Fresh defaults**: composite defaults are produced by a factory on
//!   every read, so records never share a collection
//! - **Schema as data**: [`SchemaDef`] loads the same definitions from YAML
//!   or JSON text
//!
//! ```
//! use fieldset::{ErrorKind, Field, FieldType, Fieldset, Record, Value};
//!
//! let fields = Fieldset::new()
//!     .with(Field::builder("score", FieldType::Integer).min(0).max(100).build()?);
//!
//! let mut record = Record::new();
//! record.insert("score".into(), Value::from("150"));
//!
//! let (clean, errors) = fields.validate(&record);
//! assert_eq!(errors.get("score"), Some(&ErrorKind::Max));
//! assert_eq!(clean.get("score"), Some(&Value::from("150")));
//! # Ok::<(), fieldset::FieldsError>(())
//! ```

pub mod error;
pub mod field;
pub mod fieldset;
pub mod rules;
pub mod schema;
pub mod types;
pub mod validator;
pub mod value;

pub use error::{ErrorSeverity, FieldsError, Result, Severity, ValidationFailed};
pub use field::{DefaultValue, Field, FieldBuilder, Validated};
pub use fieldset::{Errors, Fieldset, Record};
pub use rules::{Pattern, Rules};
pub use schema::{FieldDef, SchemaDef};
pub use types::{ErrorKind, FieldType};
pub use validator::Check;
pub use value::{Collection, Instance, Value};
