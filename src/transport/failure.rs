//! Transport failure: the call produced no usable response

use std::fmt;
use std::time::Duration;

use serde_json::Value;

/// Why a call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The service answered with a status other than 200 or 400
    Status,
    /// The deadline elapsed first
    Timeout,
    /// The request never got a response (DNS, refused, reset, ...)
    Connection,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Status => "status",
            FailureReason::Timeout => "timeout",
            FailureReason::Connection => "connection",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Details of a failed call, kept for logs and the caller's error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub reason: FailureReason,
    /// HTTP status, when one was received
    pub status: Option<u16>,
    /// Request URL including query parameters
    pub url: String,
    pub elapsed: Duration,
    /// Best-effort message; the body's `message` field or `"error"`
    pub message: String,
    /// Raw response body, when one was received
    pub body: Option<String>,
}

impl TransportFailure {
    /// A response with an unaccepted status
    pub fn from_status(
        status: u16,
        url: impl Into<String>,
        elapsed: Duration,
        body: Option<String>,
    ) -> Self {
        let message = extract_message(body.as_deref());
        Self {
            reason: FailureReason::Status,
            status: Some(status),
            url: url.into(),
            elapsed,
            message,
            body: body.filter(|b| !b.trim().is_empty()),
        }
    }

    /// The deadline elapsed before a response arrived
    pub fn timeout(url: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            reason: FailureReason::Timeout,
            status: None,
            url: url.into(),
            elapsed,
            message: "timeout".to_string(),
            body: None,
        }
    }

    /// No response could be obtained
    pub fn connection(url: impl Into<String>, elapsed: Duration, message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::Connection,
            status: None,
            url: url.into(),
            elapsed,
            message: message.into(),
            body: None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.reason == FailureReason::Timeout
    }

    /// Status as text, or the failure reason when there was no response
    pub fn status_label(&self) -> String {
        match self.status {
            Some(status) => status.to_string(),
            None => self.reason.to_string(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {:.3}s FAILED: {}",
            self.status_label(),
            self.url,
            self.elapsed.as_secs_f64(),
            self.message
        )
    }
}

/// Pull `message` out of a JSON error body; `"error"` when that is not possible.
pub fn extract_message(body: Option<&str>) -> String {
    body.and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| match v.get("message") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| "error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message() {
        assert_eq!(extract_message(Some(r#"{"message": "boom"}"#)), "boom");
        assert_eq!(extract_message(Some(r#"{"other": 1}"#)), "error");
        assert_eq!(extract_message(Some("<html>502</html>")), "error");
        assert_eq!(extract_message(Some("")), "error");
        assert_eq!(extract_message(None), "error");
    }

    #[test]
    fn test_display_carries_status_url_time_message() {
        let failure = TransportFailure::from_status(
            503,
            "http://api.example.com/users",
            Duration::from_millis(1500),
            Some(r#"{"message": "down"}"#.to_string()),
        );
        assert_eq!(
            failure.to_string(),
            "503 http://api.example.com/users in 1.500s FAILED: down"
        );
    }

    #[test]
    fn test_timeout_has_no_status() {
        let failure = TransportFailure::timeout("http://h/r", Duration::from_secs(1));
        assert!(failure.is_timeout());
        assert_eq!(failure.status, None);
        assert_eq!(failure.status_label(), "timeout");
    }

    #[test]
    fn test_blank_body_dropped() {
        let failure =
            TransportFailure::from_status(500, "http://h/r", Duration::ZERO, Some(" ".into()));
        assert_eq!(failure.body, None);
        assert_eq!(failure.message, "error");
    }
}
