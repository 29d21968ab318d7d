//! Source and target field definitions.
//!
//! Source fields come from document extraction, target fields from the
//! destination schema. Both are treated as immutable inputs by the engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Date,
    Number,
    Currency,
    Address,
    Name,
    Boolean,
    Signature,
    #[default]
    Unknown,
}

impl FieldType {
    /// Every variant, in declaration order.
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Date,
        FieldType::Number,
        FieldType::Currency,
        FieldType::Address,
        FieldType::Name,
        FieldType::Boolean,
        FieldType::Signature,
        FieldType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Address => "address",
            FieldType::Name => "name",
            FieldType::Boolean => "boolean",
            FieldType::Signature => "signature",
            FieldType::Unknown => "unknown",
        }
    }

    /// Returns true when the type carries real information.
    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Unknown)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownFieldType(s.to_string()))
    }
}

/// A named value extracted from an input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceField {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub declared_type: FieldType,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub position: (i32, i32),
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl SourceField {
    pub fn new(name: impl Into<String>, declared_type: FieldType) -> Self {
        Self {
            name: name.into(),
            value: Value::Null,
            declared_type,
            context: String::new(),
            position: (0, 0),
            metadata: BTreeMap::new(),
        }
    }

    /// Creates a field with an untyped name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Unknown)
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: (i32, i32)) -> Self {
        self.position = position;
        self
    }
}

/// A named slot in a destination schema awaiting a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetField {
    pub name: String,
    #[serde(default)]
    pub declared_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub validation_pattern: String,
    #[serde(default)]
    pub position: (i32, i32),
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl TargetField {
    pub fn new(name: impl Into<String>, declared_type: FieldType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            required: false,
            options: Vec::new(),
            validation_pattern: String::new(),
            position: (0, 0),
            metadata: BTreeMap::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Unknown)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_validation_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validation_pattern = pattern.into();
        self
    }
}
