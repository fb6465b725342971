//! Field-level validation errors collected from a 400 body

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::errors::{AdapterError, AdapterResult};

/// Field name used for messages that are not tied to a field
pub const BASE_FIELD: &str = "base";

/// Field → ordered messages, in the order fields appeared in the body.
///
/// An empty set means "no validation failure".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with errors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Messages for one field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(f, messages)| (f.as_str(), messages.as_slice()))
    }

    /// "field message" strings; `base` messages are returned bare
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| {
                    if field == BASE_FIELD {
                        m.clone()
                    } else {
                        format!("{} {}", field, m)
                    }
                })
            })
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join("; "))
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Collect a 400 body into per-field errors.
///
/// `{"name": ["is required"], "age": "must be a number"}` yields
/// `name → ["is required"]`, `age → ["must be a number"]`.
/// Empty input yields an empty set.
pub fn collect(body: &str) -> AdapterResult<ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if body.trim().is_empty() {
        return Ok(errors);
    }

    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| AdapterError::marshal(format!("validation body: {}", e)))?;

    match parsed {
        Value::Object(map) => {
            for (field, value) in map {
                for message in messages_of(value) {
                    errors.add(field.clone(), message);
                }
            }
        }
        Value::Null => {}
        other => {
            for message in messages_of(other) {
                errors.add(BASE_FIELD, message);
            }
        }
    }

    Ok(errors)
}

fn messages_of(value: Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(items) => items.into_iter().flat_map(messages_of).collect(),
        other => vec![other.to_string()],
    }
}
