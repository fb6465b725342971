//! Field descriptors as served by the `schema_fields` endpoint

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AdapterError, AdapterResult};

/// Declared type of a remote field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Decimal,
    DateTime,
    Date,
    Binary,
    Boolean,
}

impl FieldType {
    /// Returns the canonical type name
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Decimal => "decimal",
            FieldType::DateTime => "datetime",
            FieldType::Date => "date",
            FieldType::Binary => "binary",
            FieldType::Boolean => "boolean",
        }
    }

    /// Parse a type name. Accepts the aliases services commonly emit
    /// (`text`, `timestamp`, `time`, `int`, `bool`).
    pub fn parse(name: &str) -> Option<Self> {
        let field_type = match name.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => FieldType::String,
            "integer" | "int" => FieldType::Integer,
            "float" => FieldType::Float,
            "decimal" => FieldType::Decimal,
            "datetime" | "timestamp" | "time" => FieldType::DateTime,
            "date" => FieldType::Date,
            "binary" => FieldType::Binary,
            "boolean" | "bool" => FieldType::Boolean,
            _ => return None,
        };
        Some(field_type)
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        FieldType::parse(&name).ok_or_else(|| format!("unknown field type '{}'", name))
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.type_name().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One remote field: `{name, default, type, null, primary}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(default)]
    pub default: Value,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field accepts null. Only an explicit `"null": true` counts.
    #[serde(rename = "null", default)]
    pub nullable: bool,

    #[serde(default)]
    pub primary: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            default: Value::Null,
            field_type,
            nullable: true,
            primary: false,
        }
    }

    /// Builder-style primary flag; primary fields are never nullable
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }
}

/// Decode a `schema_fields` body.
///
/// The body is a JSON array whose entries are either field objects or JSON
/// strings holding a field object. An empty body or `null` yields no fields.
pub fn decode_fields(body: &str) -> AdapterResult<Vec<FieldDescriptor>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| AdapterError::schema(format!("body is not JSON: {}", e)))?;

    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        other => {
            return Err(AdapterError::schema(format!(
                "expected an array of fields, got {}",
                json_kind(&other)
            )))
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            decode_entry(entry).map_err(|e| AdapterError::schema(format!("field {}: {}", i, e)))
        })
        .collect()
}

fn decode_entry(entry: Value) -> Result<FieldDescriptor, String> {
    let object = match entry {
        Value::String(encoded) => {
            serde_json::from_str::<Value>(&encoded).map_err(|e| e.to_string())?
        }
        other => other,
    };
    if !object.is_object() {
        return Err(format!("expected an object, got {}", json_kind(&object)));
    }
    serde_json::from_value(object).map_err(|e| e.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Name of the first primary field
pub fn primary_key(fields: &[FieldDescriptor]) -> Option<&str> {
    fields.iter().find(|f| f.primary).map(|f| f.name.as_str())
}
