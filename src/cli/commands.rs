//! CLI command implementations
//!
//! Every command loads the adapter configuration, performs one adapter call
//! and writes one JSON object to stdout. Adapter logs go to the configured
//! log file, or stderr when none is set.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::adapter::{ConnectionAdapter, RecordKey, RestfulJsonAdapter};
use crate::config::AdapterConfig;
use crate::observability::{logger_for, Event, Logger};
use crate::transport::HttpTransport;

use super::args::Command;
use super::errors::CliResult;
use super::io::{read_attributes, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, runs the command, and reports failures as a JSON error
/// object before returning them.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    match run_command(cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(&e)?;
            Err(e)
        }
    }
}

/// Run one command, returning the `data` payload
pub fn run_command(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Select { config, sql } => select(&config, &sql),
        Command::Columns { config, table } => columns(&config, table.as_deref()),
        Command::PrimaryKey { config, table } => primary_key(&config, table.as_deref()),
        Command::Insert { config } => insert(&config),
        Command::Update { config, id } => update(&config, &id),
        Command::Delete { config, id } => delete(&config, &id),
        Command::Validate { config, id } => validate(&config, id.as_ref()),
        Command::Invoke {
            config,
            action,
            body,
            content_type,
        } => invoke(&config, &action, body.as_deref(), &content_type),
    }
}

/// Build an adapter from the configuration file at `path`
pub fn open_adapter(path: &Path) -> CliResult<RestfulJsonAdapter> {
    let config = AdapterConfig::load(path)?;
    let logger = logger_for(config.log_path.as_deref(), Logger::stderr());

    let source = path.display().to_string();
    logger.info(
        Event::ConfigLoaded.as_str(),
        &[("path", source.as_str()), ("table", config.table_name.as_str())],
    );

    let transport = HttpTransport::new(config.descriptor().timeout)?;
    Ok(RestfulJsonAdapter::with_transport(
        &config,
        Arc::new(transport),
        logger,
    )?)
}

pub fn select(config: &Path, sql: &str) -> CliResult<Value> {
    let adapter = open_adapter(config)?;
    let result = adapter.select(sql, &[])?;
    Ok(serde_json::to_value(result)?)
}

pub fn columns(config: &Path, table: Option<&str>) -> CliResult<Value> {
    let adapter = open_adapter(config)?;
    let table = table.unwrap_or(&adapter.descriptor().table_name).to_string();
    let fields = adapter.columns(&table)?;
    Ok(serde_json::to_value(fields)?)
}

pub fn primary_key(config: &Path, table: Option<&str>) -> CliResult<Value> {
    let adapter = open_adapter(config)?;
    let table = table.unwrap_or(&adapter.descriptor().table_name).to_string();
    let key = adapter.primary_key(&table)?;
    Ok(json!({ "primary_key": key }))
}

pub fn insert(config: &Path) -> CliResult<Value> {
    let mut adapter = open_adapter(config)?;
    let attributes = read_attributes()?;
    let id = adapter.insert(&attributes)?;
    Ok(json!({ "id": id }))
}

pub fn update(config: &Path, id: &RecordKey) -> CliResult<Value> {
    let adapter = open_adapter(config)?;
    let attributes = read_attributes()?;
    let affected = adapter.update(id, &attributes)?;
    Ok(json!({ "affected": affected }))
}

pub fn delete(config: &Path, id: &RecordKey) -> CliResult<Value> {
    let adapter = open_adapter(config)?;
    adapter.delete(id)?;
    Ok(json!({ "deleted": id }))
}

pub fn validate(config: &Path, id: Option<&RecordKey>) -> CliResult<Value> {
    let adapter = open_adapter(config)?;
    let attributes = read_attributes()?;
    let valid = adapter.validate(id, &attributes)?;
    Ok(json!({ "valid": valid }))
}

pub fn invoke(
    config: &Path,
    action: &str,
    body: Option<&Path>,
    content_type: &str,
) -> CliResult<Value> {
    let adapter = open_adapter(config)?;
    let result = match body {
        Some(body_path) => {
            let entity = fs::read_to_string(body_path)?;
            let headers = vec![("Content-Type".to_string(), content_type.to_string())];
            adapter.invoke_with_body(action, &Default::default(), &entity, headers)?
        }
        None => {
            let attributes = read_attributes()?;
            adapter.invoke(action, &attributes)?
        }
    };
    Ok(serde_json::to_value(result)?)
}
