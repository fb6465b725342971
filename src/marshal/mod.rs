//! Response body marshalling
//!
//! - `marshal`: JSON success body → `TabularResult`
//! - `collect`: JSON 400 body → `ValidationErrors`
//!
//! # Row shape
//!
//! Fields are the union of object keys in first-seen order across the body.
//! Each row holds one value per field, aligned by name; keys an object lacks
//! are null. A cell holding an array stays one value. A body-level array
//! nested inside the top-level array is flattened one level, so
//! `[[{..},{..}],{..}]` yields three rows.

mod result;
mod validation;

pub use result::TabularResult;
pub use validation::{collect, ValidationErrors, BASE_FIELD};

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::errors::{AdapterError, AdapterResult};

/// Marshal a success body into a tabular result.
///
/// Returns `Ok(None)` for an empty body or a JSON `null`.
pub fn marshal(body: &str) -> AdapterResult<Option<TabularResult>> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| AdapterError::marshal(format!("success body: {}", e)))?;

    let objects = match parsed {
        Value::Null => return Ok(None),
        Value::Object(obj) => vec![obj],
        Value::Array(items) => flatten_objects(items)?,
        other => {
            return Err(AdapterError::marshal(format!(
                "expected object or array of objects, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(Some(tabulate(objects)))
}

fn flatten_objects(items: Vec<Value>) -> AdapterResult<Vec<Map<String, Value>>> {
    let mut objects = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(obj) => objects.push(obj),
            Value::Array(inner) => {
                for nested in inner {
                    match nested {
                        Value::Object(obj) => objects.push(obj),
                        other => {
                            return Err(AdapterError::marshal(format!(
                                "expected object in nested array, got {}",
                                json_kind(&other)
                            )))
                        }
                    }
                }
            }
            other => {
                return Err(AdapterError::marshal(format!(
                    "expected object in array, got {}",
                    json_kind(&other)
                )))
            }
        }
    }
    Ok(objects)
}

fn tabulate(objects: Vec<Map<String, Value>>) -> TabularResult {
    let mut fields: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for obj in &objects {
        for key in obj.keys() {
            if seen.insert(key.clone()) {
                fields.push(key.clone());
            }
        }
    }

    let rows = objects
        .into_iter()
        .map(|mut obj| {
            fields
                .iter()
                .map(|f| obj.remove(f).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    TabularResult::new(fields, rows)
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
