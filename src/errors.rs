//! Adapter error taxonomy
//!
//! Error codes:
//! - LOGICAL_VALIDATION_REJECTED (REJECT)
//! - LOGICAL_RECORD_NOT_UNIQUE (REJECT)
//! - LOGICAL_RECORD_NOT_FOUND (REJECT)
//! - LOGICAL_INVALID_KEY (REJECT)
//! - LOGICAL_TRANSPORT_FAILED (ERROR)
//! - LOGICAL_MARSHAL_FAILED (ERROR)
//! - LOGICAL_CONFIG_INVALID (ERROR)
//! - LOGICAL_SCHEMA_INVALID (ERROR)
//! - LOGICAL_CAST_FAILED (ERROR)
//!
//! The adapter never retries: every failure surfaces from the call that caused it.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::marshal::ValidationErrors;
use crate::transport::TransportFailure;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Severity levels for adapter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The record was refused; show the caller what is wrong
    Reject,
    /// The call could not be completed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Stable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterErrorCode {
    ValidationRejected,
    RecordNotUnique,
    RecordNotFound,
    InvalidKey,
    TransportFailed,
    MarshalFailed,
    ConfigInvalid,
    SchemaInvalid,
    CastFailed,
}

impl AdapterErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            AdapterErrorCode::ValidationRejected => "LOGICAL_VALIDATION_REJECTED",
            AdapterErrorCode::RecordNotUnique => "LOGICAL_RECORD_NOT_UNIQUE",
            AdapterErrorCode::RecordNotFound => "LOGICAL_RECORD_NOT_FOUND",
            AdapterErrorCode::InvalidKey => "LOGICAL_INVALID_KEY",
            AdapterErrorCode::TransportFailed => "LOGICAL_TRANSPORT_FAILED",
            AdapterErrorCode::MarshalFailed => "LOGICAL_MARSHAL_FAILED",
            AdapterErrorCode::ConfigInvalid => "LOGICAL_CONFIG_INVALID",
            AdapterErrorCode::SchemaInvalid => "LOGICAL_SCHEMA_INVALID",
            AdapterErrorCode::CastFailed => "LOGICAL_CAST_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AdapterErrorCode::ValidationRejected
            | AdapterErrorCode::RecordNotUnique
            | AdapterErrorCode::RecordNotFound
            | AdapterErrorCode::InvalidKey => Severity::Reject,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for AdapterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Adapter errors
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The service answered 400 with field-level errors
    #[error("record rejected by service: {0}")]
    ValidationRejected(ValidationErrors),

    /// Non-200/400 status, connection error or timeout
    #[error("{0}")]
    TransportFailed(TransportFailure),

    /// The service reported a uniqueness violation
    #[error("record not unique: {0}")]
    RecordNotUnique(TransportFailure),

    /// The service reported the addressed record does not exist
    #[error("record not found: {0}")]
    RecordNotFound(TransportFailure),

    /// The record id cannot address a record under the resource
    #[error("record id '{0}' cannot address a record")]
    InvalidKey(String),

    /// A success body was not valid JSON of the expected shape
    #[error("malformed response body: {0}")]
    Marshal(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid schema response: {0}")]
    Schema(String),

    #[error("cannot cast field '{field}' to {expected}: {reason}")]
    Cast {
        field: String,
        expected: &'static str,
        reason: String,
    },
}

impl AdapterError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn marshal(msg: impl Into<String>) -> Self {
        Self::Marshal(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn code(&self) -> AdapterErrorCode {
        match self {
            AdapterError::ValidationRejected(_) => AdapterErrorCode::ValidationRejected,
            AdapterError::TransportFailed(_) => AdapterErrorCode::TransportFailed,
            AdapterError::RecordNotUnique(_) => AdapterErrorCode::RecordNotUnique,
            AdapterError::RecordNotFound(_) => AdapterErrorCode::RecordNotFound,
            AdapterError::InvalidKey(_) => AdapterErrorCode::InvalidKey,
            AdapterError::Marshal(_) => AdapterErrorCode::MarshalFailed,
            AdapterError::Config(_) => AdapterErrorCode::ConfigInvalid,
            AdapterError::Schema(_) => AdapterErrorCode::SchemaInvalid,
            AdapterError::Cast { .. } => AdapterErrorCode::CastFailed,
        }
    }

    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Field errors, when the service rejected the record
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AdapterError::ValidationRejected(errors) => Some(errors),
            _ => None,
        }
    }

    /// Underlying transport failure, if any
    pub fn transport_failure(&self) -> Option<&TransportFailure> {
        match self {
            AdapterError::TransportFailed(f)
            | AdapterError::RecordNotUnique(f)
            | AdapterError::RecordNotFound(f) => Some(f),
            _ => None,
        }
    }

    /// True when the failure was the deadline elapsing
    pub fn is_timeout(&self) -> bool {
        self.transport_failure().is_some_and(|f| f.is_timeout())
    }

    /// Text safe to show an end user. Transport detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AdapterError::ValidationRejected(errors) => errors.full_messages().join(", "),
            AdapterError::RecordNotUnique(_) => "record is not unique".to_string(),
            AdapterError::RecordNotFound(_) => "record not found".to_string(),
            AdapterError::InvalidKey(id) => format!("invalid record id '{}'", id),
            _ => "could not reach service".to_string(),
        }
    }
}

/// Turn a transport failure into the most specific error available.
///
/// Structured first: a failed body of the form `{"code": "...", ...}` is
/// keyed by its code. Services that only send a message fall back to the
/// uniqueness message shim (`column(s) ... is/are not unique`).
pub fn translate_failure(failure: TransportFailure) -> AdapterError {
    if let Some(code) = service_error_code(failure.body.as_deref()) {
        match code.as_str() {
            "record_not_unique" | "not_unique" => return AdapterError::RecordNotUnique(failure),
            "record_not_found" | "not_found" => return AdapterError::RecordNotFound(failure),
            _ => {}
        }
    }

    if is_not_unique_message(&failure.message) {
        return AdapterError::RecordNotUnique(failure);
    }

    AdapterError::TransportFailed(failure)
}

/// Compatibility shim for services that report uniqueness violations only as text.
pub fn is_not_unique_message(message: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"columns? .* (is|are) not unique").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(message))
}

fn service_error_code(body: Option<&str>) -> Option<String> {
    let value: Value = serde_json::from_str(body?).ok()?;
    value
        .get("code")
        .and_then(Value::as_str)
        .map(|code| code.trim().to_ascii_lowercase().replace('-', "_"))
}
