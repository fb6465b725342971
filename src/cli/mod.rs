//! CLI module for logical-record
//!
//! Thin client over `RestfulJsonAdapter`: one command, one adapter call,
//! one JSON object on stdout.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{open_adapter, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_attributes, read_attributes, write_error, write_response};
