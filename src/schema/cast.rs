//! Typed casting of raw JSON cells
//!
//! Empty strings cast to `Null` for every non-string type.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::field::{FieldDescriptor, FieldType};
use crate::errors::{AdapterError, AdapterResult};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A cell value in the Rust type its field declares
#[derive(Debug, Clone, PartialEq)]
pub enum CastValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    /// Kept as text to avoid losing precision
    Decimal(String),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Binary(Vec<u8>),
    Boolean(bool),
}

impl CastValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CastValue::Null)
    }
}

impl FieldDescriptor {
    /// Cast a raw cell to this field's type
    pub fn cast(&self, value: &Value) -> AdapterResult<CastValue> {
        if value.is_null() {
            return Ok(CastValue::Null);
        }
        if self.field_type != FieldType::String && value.as_str().is_some_and(|s| s.is_empty()) {
            return Ok(CastValue::Null);
        }

        let cast = match self.field_type {
            FieldType::String => Ok(CastValue::String(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })),
            FieldType::Integer => cast_integer(value).map(CastValue::Integer),
            FieldType::Float => cast_float(value).map(CastValue::Float),
            FieldType::Decimal => cast_decimal(value).map(CastValue::Decimal),
            FieldType::DateTime => cast_datetime(value).map(CastValue::DateTime),
            FieldType::Date => cast_date(value).map(CastValue::Date),
            FieldType::Binary => cast_binary(value).map(CastValue::Binary),
            FieldType::Boolean => cast_boolean(value).map(CastValue::Boolean),
        };

        cast.map_err(|reason| AdapterError::Cast {
            field: self.name.clone(),
            expected: self.field_type.type_name(),
            reason,
        })
    }
}

fn unexpected(value: &Value) -> String {
    format!("unexpected value {}", value)
}

fn cast_integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| format!("{} is not an integer", n)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|e| e.to_string()),
        Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(unexpected(other)),
    }
}

fn cast_float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("{} is not a float", n)),
        Value::String(s) => s.trim().parse::<f64>().map_err(|e| e.to_string()),
        other => Err(unexpected(other)),
    }
}

fn cast_decimal(value: &Value) -> Result<String, String> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<f64>()
                .map(|_| trimmed.to_string())
                .map_err(|_| format!("'{}' is not a decimal", s))
        }
        other => Err(unexpected(other)),
    }
}

fn cast_datetime(value: &Value) -> Result<NaiveDateTime, String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.naive_utc());
            }
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .ok_or_else(|| format!("'{}' is not a datetime", s))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| format!("{} is not a unix timestamp", n)),
        other => Err(unexpected(other)),
    }
}

fn cast_date(value: &Value) -> Result<NaiveDate, String> {
    match value {
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .or_else(|_| cast_datetime(value).map(|dt| dt.date()))
            .map_err(|_| format!("'{}' is not a date", s)),
        other => Err(unexpected(other)),
    }
}

fn cast_binary(value: &Value) -> Result<Vec<u8>, String> {
    match value {
        Value::String(s) => BASE64.decode(s.trim()).map_err(|e| e.to_string()),
        other => Err(unexpected(other)),
    }
}

fn cast_boolean(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(format!("{} is not a boolean", n)),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "t" | "true" | "1" => Ok(true),
            "f" | "false" | "0" => Ok(false),
            _ => Err(format!("'{}' is not a boolean", s)),
        },
        other => Err(unexpected(other)),
    }
}
