//! JSON I/O handling for CLI
//!
//! - Input: one JSON object of attributes on stdin (may be empty)
//! - Output: one JSON object on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::adapter::Attributes;

/// Read the attribute object from stdin
pub fn read_attributes() -> CliResult<Attributes> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_attributes(&input)
}

/// Blank input is an empty attribute map
pub fn parse_attributes(input: &str) -> CliResult<Attributes> {
    if input.trim().is_empty() {
        return Ok(Attributes::new());
    }
    match serde_json::from_str::<Value>(input)? {
        Value::Object(map) => Ok(map),
        other => Err(CliError::input_error(format!(
            "attributes must be a JSON object, got {}",
            other
        ))),
    }
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&success_body(data))
}

/// Write an error response to stdout
pub fn write_error(error: &CliError) -> CliResult<()> {
    write_value(&error_body(error))
}

fn success_body(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

fn error_body(error: &CliError) -> Value {
    let mut body = json!({
        "status": "error",
        "code": error.code_str(),
        "message": error.message()
    });
    if let Some(errors) = error.errors() {
        body["errors"] = json!(errors);
    }
    body
}

fn write_value(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
