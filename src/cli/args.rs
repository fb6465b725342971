//! CLI argument definitions using clap
//!
//! Commands:
//! - logical-record select --config <path> --sql <query>
//! - logical-record columns --config <path> [--table <name>]
//! - logical-record primary-key --config <path> [--table <name>]
//! - logical-record insert --config <path>            (attributes on stdin)
//! - logical-record update --config <path> --id <id>  (attributes on stdin)
//! - logical-record delete --config <path> --id <id>
//! - logical-record validate --config <path> [--id <id>]
//! - logical-record invoke --config <path> --action <name> [--body <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::adapter::RecordKey;

/// Read and write records of a RESTful JSON service
#[derive(Parser, Debug)]
#[command(name = "logical-record")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a query against the resource
    Select {
        /// Path to adapter configuration file
        #[arg(long, default_value = "./logical_record.json")]
        config: PathBuf,

        /// Query passed verbatim to the service
        #[arg(long)]
        sql: String,
    },

    /// List the fields of a resource
    Columns {
        #[arg(long, default_value = "./logical_record.json")]
        config: PathBuf,

        /// Resource name (default: the configured table)
        #[arg(long)]
        table: Option<String>,
    },

    /// Print the primary key field of a resource
    PrimaryKey {
        #[arg(long, default_value = "./logical_record.json")]
        config: PathBuf,

        #[arg(long)]
        table: Option<String>,
    },

    /// Create a record from the attributes on stdin
    Insert {
        #[arg(long, default_value = "./logical_record.json")]
        config: PathBuf,
    },

    /// Update a record with the attributes on stdin
    Update {
        #[arg(long, default_value = "./logical_record.json")]
        config: PathBuf,

        #[arg(long, value_parser = RecordKey::from_str)]
        id: RecordKey,
    },

    /// Delete a record
    Delete {
        #[arg(long, default_value = "./logical_record.json")]
        config: PathBuf,

        #[arg(long, value_parser = RecordKey::from_str)]
        id: RecordKey,
    },

    /// Ask the service to validate the attributes on stdin
    Validate {
        #[arg(long, default_value = "./logical_record.json")]
        config: PathBuf,

        /// Existing record id; omit for new records
        #[arg(long, value_parser = RecordKey::from_str)]
        id: Option<RecordKey>,
    },

    /// Call a custom action with the attributes on stdin
    Invoke {
        #[arg(long, default_value = "./logical_record.json")]
        config: PathBuf,

        #[arg(long)]
        action: String,

        /// File sent as the raw request entity
        #[arg(long)]
        body: Option<PathBuf>,

        /// Content type of the raw entity
        #[arg(long, default_value = "application/json")]
        content_type: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
