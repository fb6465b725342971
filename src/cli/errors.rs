//! CLI-specific error types

use std::fmt;
use std::io;

use crate::errors::{AdapterError, AdapterErrorCode};
use crate::marshal::ValidationErrors;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Attributes on stdin are not a JSON object
    InputError,
    /// The adapter call failed
    Adapter(AdapterErrorCode),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "LOGICAL_CLI_CONFIG_ERROR",
            Self::IoError => "LOGICAL_CLI_IO_ERROR",
            Self::InputError => "LOGICAL_CLI_INPUT_ERROR",
            Self::Adapter(code) => code.code(),
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    errors: Option<ValidationErrors>,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: None,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn input_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InputError, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field errors of a rejected record
    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

/// Only the user-facing text reaches stdout; transport detail stays in the
/// adapter's log.
impl From<AdapterError> for CliError {
    fn from(e: AdapterError) -> Self {
        if let AdapterError::Config(msg) = &e {
            return Self::config_error(msg.clone());
        }
        Self {
            code: CliErrorCode::Adapter(e.code()),
            message: e.user_message(),
            errors: e.validation_errors().cloned(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_config_error_maps_to_cli_config() {
        let err = CliError::from(AdapterError::config("host must not be empty"));
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert_eq!(err.message(), "host must not be empty");
    }

    #[test]
    fn test_not_found_uses_user_message() {
        let failure = crate::transport::TransportFailure::from_status(
            404,
            "http://h/users/7",
            std::time::Duration::ZERO,
            Some(r#"{"code": "not_found", "message": "no row 7 in users_v2"}"#.to_string()),
        );
        let err = CliError::from(crate::errors::translate_failure(failure));
        assert_eq!(err.code_str(), "LOGICAL_RECORD_NOT_FOUND");
        assert_eq!(err.message(), "record not found");
    }

    #[test]
    fn test_rejection_keeps_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "is blank");
        let err = CliError::from(AdapterError::ValidationRejected(errors));

        assert_eq!(err.code_str(), "LOGICAL_VALIDATION_REJECTED");
        assert_eq!(err.errors().unwrap().get("name").unwrap(), &["is blank".to_string()]);
    }
}
