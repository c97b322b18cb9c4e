//! Serializable field definitions.
//!
//! A [`SchemaDef`] is the data form of a [`Fieldset`]: a list of
//! [`FieldDef`]s that can be written in YAML or JSON. Rules sit next to the
//! field attributes, as in
//!
//! ```yaml
//! fields:
//!   - name: score
//!     type: integer
//!     required: true
//!     min: 0
//!     max: 100
//!   - name: tags
//!     type: collection
//!     class: Tag
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FieldsError, Result};
use crate::field::{DefaultValue, Field, FieldBuilder};
use crate::fieldset::Fieldset;
use crate::rules::KNOWN_RULES;
use crate::types::FieldType;
use crate::value::Value;

/// Definition of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Unset means the type's default (nullable for object and entity).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub guarded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Constraint rules and any residual keys.
    #[serde(flatten)]
    pub rules: IndexMap<String, serde_json::Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl FieldDef {
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
            rules: IndexMap::new(),
        }
    }

    /// Turn the definition into a [`Field`].
    pub fn build(&self) -> Result<Field> {
        let mut builder = Field::builder(&self.name, self.field_type)
            .required(self.required)
            .unique(self.unique)
            .readonly(self.readonly)
            .guarded(self.guarded);
        if let Some(nullable) = self.nullable {
            builder = builder.nullable(nullable);
        }
        if let Some(label) = &self.label {
            builder = builder.label(label);
        }
        if let Some(default) = &self.default {
            builder = builder.default(Value::from(default.clone()));
        }
        for (key, value) in &self.rules {
            builder = self.apply_rule(builder, key, value)?;
        }
        builder.build()
    }

    fn apply_rule(
        &self,
        builder: FieldBuilder,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<FieldBuilder> {
        let builder = match key {
            "min" => builder.min(Value::from(value.clone())),
            "max" => builder.max(Value::from(value.clone())),
            "min_length" => builder.min_length(self.length_rule(key, value)?),
            "max_length" => builder.max_length(self.length_rule(key, value)?),
            "regex" => builder.regex(self.string_rule(key, value)?),
            "class" => builder.class(self.string_rule(key, value)?),
            "container" => builder.container(self.string_rule(key, value)?),
            "values" => match value {
                serde_json::Value::Array(items) => {
                    builder.values(items.iter().cloned().map(Value::from))
                }
                _ => return Err(self.invalid_rule(key, "expected a list of values")),
            },
            other => {
                warn!(field = %self.name, rule = %other, "unknown rule kept as residual rule");
                builder.rule(other, Value::from(value.clone()))
            }
        };
        Ok(builder)
    }

    fn length_rule(&self, key: &str, value: &serde_json::Value) -> Result<usize> {
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| self.invalid_rule(key, "expected a non-negative integer"))
    }

    fn string_rule(&self, key: &str, value: &serde_json::Value) -> Result<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid_rule(key, "expected a string"))
    }

    fn invalid_rule(&self, rule: &str, message: &str) -> FieldsError {
        FieldsError::InvalidRule {
            field: self.name.clone(),
            rule: rule.to_string(),
            message: message.to_string(),
        }
    }
}

impl Field {
    /// The serializable definition of this field.
    ///
    /// Deferred defaults have no data form and are left out; a rebuilt
    /// collection field gets its container factory back from its rules.
    pub fn definition(&self) -> FieldDef {
        let mut def = FieldDef::new(self.name(), self.field_type());
        def.required = self.is_required();
        def.nullable = Some(self.is_nullable());
        def.unique = self.is_unique();
        def.readonly = self.is_readonly();
        def.guarded = self.is_guarded();
        if self.label() != self.name() {
            def.label = Some(self.label().to_string());
        }
        if let DefaultValue::Constant(value) = self.default_definition() {
            def.default = value
                .to_json()
                .filter(|json| !json.is_null() && json.as_str() != Some(""));
        }

        let rules = self.rules();
        let known = KNOWN_RULES
            .iter()
            .filter_map(|key| rules.get(key).map(|value| (key.to_string(), value)));
        let residual = rules
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()));
        for (key, value) in known.chain(residual) {
            if let Some(json) = value.to_json() {
                def.rules.insert(key, json);
            }
        }
        def
    }
}

/// A whole fieldset as data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl SchemaDef {
    /// Build every field, failing on the first configuration error.
    pub fn build(&self) -> Result<Fieldset> {
        self.fields.iter().map(FieldDef::build).collect()
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&Fieldset> for SchemaDef {
    fn from(fieldset: &Fieldset) -> Self {
        SchemaDef {
            fields: fieldset.iter().map(Field::definition).collect(),
        }
    }
}
