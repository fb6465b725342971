//! Structured JSON logger for the adapter
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - Output goes to a configurable sink (stdout, append-mode file, memory)

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Raw payloads and other debug detail
    Trace = 0,
    /// Normal request/response traffic
    Info = 1,
    /// Failed calls
    Warn = 2,
    /// Adapter-level faults
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where log lines are written
#[derive(Clone)]
pub enum LogSink {
    /// Standard output
    Stdout,
    /// Standard error, for processes whose stdout carries data
    Stderr,
    /// Append-mode log file shared by clones of the logger
    File(Arc<Mutex<File>>),
    /// In-memory buffer, used to inspect log output
    Memory(Arc<Mutex<Vec<u8>>>),
    /// Discard everything
    Null,
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSink::Stdout => write!(f, "Stdout"),
            LogSink::Stderr => write!(f, "Stderr"),
            LogSink::File(_) => write!(f, "File"),
            LogSink::Memory(_) => write!(f, "Memory"),
            LogSink::Null => write!(f, "Null"),
        }
    }
}

/// A structured logger that outputs JSON lines
#[derive(Debug, Clone)]
pub struct Logger {
    sink: LogSink,
    min_severity: Severity,
}

impl Default for Logger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Logger {
    /// Logger writing to stdout at INFO and above
    pub fn stdout() -> Self {
        Self {
            sink: LogSink::Stdout,
            min_severity: Severity::Info,
        }
    }

    /// Logger writing to stderr at INFO and above
    pub fn stderr() -> Self {
        Self {
            sink: LogSink::Stderr,
            min_severity: Severity::Info,
        }
    }

    /// Logger that drops every line
    pub fn null() -> Self {
        Self {
            sink: LogSink::Null,
            min_severity: Severity::Error,
        }
    }

    /// Logger appending to the file at `path`, creating parent directories
    pub fn file(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: LogSink::File(Arc::new(Mutex::new(file))),
            min_severity: Severity::Info,
        })
    }

    /// Logger capturing into memory; returns the shared buffer
    pub fn memory() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            sink: LogSink::Memory(Arc::clone(&buffer)),
            min_severity: Severity::Trace,
        };
        (logger, buffer)
    }

    /// Sets the lowest severity that is written
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Returns the configured sink
    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    /// Log an event with the given severity and fields
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < self.min_severity {
            return;
        }

        let line = format_line(severity, event, fields);

        // Logging never fails the caller.
        match &self.sink {
            LogSink::Stdout => {
                let mut out = io::stdout().lock();
                let _ = out.write_all(line.as_bytes());
                let _ = out.flush();
            }
            LogSink::Stderr => {
                let mut err = io::stderr().lock();
                let _ = err.write_all(line.as_bytes());
            }
            LogSink::File(file) => {
                if let Ok(mut file) = file.lock() {
                    let _ = file.write_all(line.as_bytes());
                    let _ = file.flush();
                }
            }
            LogSink::Memory(buffer) => {
                if let Ok(mut buffer) = buffer.lock() {
                    buffer.extend_from_slice(line.as_bytes());
                }
            }
            LogSink::Null => {}
        }
    }

    /// Log at TRACE level
    pub fn trace(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }
}

/// Render one JSON log line, newline-terminated
pub(crate) fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(256);

    output.push_str("{\"event\":\"");
    escape_json_string(&mut output, event);
    output.push_str("\",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push_str("}\n");
    output
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
