//! Observability for the adapter
//!
//! - Structured JSON logging with a configurable sink
//! - Typed events
//! - Counters and service runtime accounting
//!
//! Observability never alters the outcome of an adapter call.
//!
//! ```ignore
//! use logical_record::observability::{Event, Logger};
//!
//! let logger = Logger::stdout();
//! logger.info(Event::ResponseOk.as_str(), &[("status", "200")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{LogSink, Logger, Severity};
pub use metrics::{AdapterMetrics, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

use std::path::Path;

/// Build the logger for an adapter: a file sink when `log_path` is set,
/// `fallback` otherwise or when the file cannot be opened.
pub fn logger_for(log_path: Option<&Path>, fallback: Logger) -> Logger {
    match log_path {
        Some(path) => match Logger::file(path) {
            Ok(logger) => logger,
            Err(e) => {
                let path = path.display().to_string();
                let reason = e.to_string();
                fallback.warn(
                    "LOG_FILE_UNAVAILABLE",
                    &[("path", path.as_str()), ("reason", reason.as_str())],
                );
                fallback
            }
        },
        None => fallback,
    }
}
