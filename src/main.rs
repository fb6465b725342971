//! logical-record CLI entry point
//!
//! Parses arguments, runs one adapter command, and exits non-zero on
//! failure. The JSON error object has already been written to stdout by
//! the time `run` returns an error.

use logical_record::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
