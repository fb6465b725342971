//! Per-operation observation scope
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` or `{name}_FAILED` when closed
//! - Logs `{name}_INCOMPLETE` if dropped without being closed

use std::cell::Cell;
use std::time::Instant;

use super::logger::Logger;

/// A scope that logs begin and end events around one adapter operation
///
/// ```ignore
/// let scope = ObservationScope::new(&logger, "SELECT");
/// // ... issue the call ...
/// scope.complete_with_fields(&[("rows", "3")]);
/// ```
pub struct ObservationScope<'a> {
    logger: &'a Logger,
    name: &'a str,
    closed: Cell<bool>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    /// Open a scope and log `{name}_BEGIN`
    pub fn new(logger: &'a Logger, name: &'a str) -> Self {
        logger.trace(&format!("{}_BEGIN", name), &[]);
        Self {
            logger,
            name,
            closed: Cell::new(false),
            timer: Timer::new(),
        }
    }

    /// Close successfully
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Close successfully with extra fields
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.closed.set(true);
        let elapsed = self.timer.elapsed_ms();
        let mut fields: Vec<(&str, &str)> = vec![("elapsed_ms", elapsed.as_str())];
        fields.extend(extra_fields.iter().copied());
        self.logger.info(&format!("{}_COMPLETE", self.name), &fields);
    }

    /// Close as failed, tagging the error code
    pub fn fail(self, code: &str) {
        self.closed.set(true);
        let elapsed = self.timer.elapsed_ms();
        self.logger.warn(
            &format!("{}_FAILED", self.name),
            &[("code", code), ("elapsed_ms", elapsed.as_str())],
        );
    }

    /// Check if the scope has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.closed.get() {
            self.logger.warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// A simple duration timer for logging elapsed time
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
