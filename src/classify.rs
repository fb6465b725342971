//! Response classification
//!
//! | status              | body      | outcome                         |
//! |---------------------|-----------|---------------------------------|
//! | 200                 | non-empty | `Success(Some(result))`         |
//! | 200                 | empty     | `Success(None)`                 |
//! | 400                 | errors    | `Rejected(errors)`              |
//! | 400                 | no errors | `Failed` (also for non-JSON)    |
//! | anything else       | any       | `Failed`                        |
//! | timeout/connection  | -         | `Failed`                        |
//!
//! Only 200 is success and only 400 is a rejection; 2xx/3xx neighbours fail.
//! Every classified response is logged: info for 200 and 400, warn for failures.

use crate::errors::{translate_failure, AdapterError, AdapterResult};
use crate::marshal::{self, TabularResult, ValidationErrors};
use crate::observability::{AdapterMetrics, Event, Logger};
use crate::transport::{HttpResponse, TransportFailure};

/// Status partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Rejected,
    Failure,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200 => StatusClass::Success,
            400 => StatusClass::Rejected,
            _ => StatusClass::Failure,
        }
    }
}

/// Exactly one of these is produced per call
#[derive(Debug)]
pub enum Outcome<T = TabularResult> {
    Success(Option<T>),
    Rejected(ValidationErrors),
    Failed(TransportFailure),
}

impl<T> Outcome<T> {
    /// Success payload, or the matching error
    pub fn into_result(self) -> AdapterResult<Option<T>> {
        match self {
            Outcome::Success(result) => Ok(result),
            Outcome::Rejected(errors) => Err(AdapterError::ValidationRejected(errors)),
            Outcome::Failed(failure) => Err(translate_failure(failure)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Classifies responses and records them in the adapter's log and counters
pub struct Classifier<'a> {
    logger: &'a Logger,
    metrics: &'a AdapterMetrics,
}

impl<'a> Classifier<'a> {
    pub fn new(logger: &'a Logger, metrics: &'a AdapterMetrics) -> Self {
        Self { logger, metrics }
    }

    /// Classify one transport result, marshalling success bodies into rows.
    ///
    /// Fails only when a 200 body cannot be decoded.
    pub fn classify(
        &self,
        response: Result<HttpResponse, TransportFailure>,
    ) -> AdapterResult<Outcome> {
        self.classify_with(response, marshal::marshal)
    }

    /// Classify with a caller-supplied decoder for success bodies
    pub fn classify_with<T, F>(
        &self,
        response: Result<HttpResponse, TransportFailure>,
        decode: F,
    ) -> AdapterResult<Outcome<T>>
    where
        F: FnOnce(&str) -> AdapterResult<Option<T>>,
    {
        let response = match response {
            Ok(response) => response,
            Err(failure) => return Ok(self.failed(failure)),
        };

        self.metrics.add_runtime(response.elapsed);

        match StatusClass::of(response.status) {
            StatusClass::Success => self.success(response, decode),
            StatusClass::Rejected => self.rejected(response),
            StatusClass::Failure => {
                let body = Some(response.body).filter(|b| !b.trim().is_empty());
                Ok(self.failed(TransportFailure::from_status(
                    response.status,
                    response.url,
                    response.elapsed,
                    body,
                )))
            }
        }
    }

    fn success<T, F>(&self, response: HttpResponse, decode: F) -> AdapterResult<Outcome<T>>
    where
        F: FnOnce(&str) -> AdapterResult<Option<T>>,
    {
        self.metrics.increment_ok();
        let elapsed = response.elapsed.as_millis().to_string();
        let bytes = response.body.len().to_string();
        self.logger.info(
            Event::ResponseOk.as_str(),
            &[
                ("bytes", bytes.as_str()),
                ("elapsed_ms", elapsed.as_str()),
                ("status", "200"),
                ("url", response.url.as_str()),
            ],
        );

        if !response.has_body() {
            return Ok(Outcome::Success(None));
        }
        self.logger.trace(
            Event::ResponseOk.as_str(),
            &[("body", response.body.as_str())],
        );

        match decode(&response.body) {
            Ok(result) => Ok(Outcome::Success(result)),
            Err(e) => {
                let reason = e.to_string();
                self.logger.warn(
                    Event::MarshalFailed.as_str(),
                    &[("reason", reason.as_str()), ("url", response.url.as_str())],
                );
                Err(e)
            }
        }
    }

    fn rejected<T>(&self, response: HttpResponse) -> AdapterResult<Outcome<T>> {
        let errors = marshal::collect(&response.body).unwrap_or_default();
        if errors.is_empty() {
            return Ok(self.failed(TransportFailure::from_status(
                400,
                response.url,
                response.elapsed,
                Some(response.body),
            )));
        }

        self.metrics.increment_rejected();
        let elapsed = response.elapsed.as_millis().to_string();
        let fields = errors.fields().collect::<Vec<_>>().join(",");
        self.logger.info(
            Event::ResponseRejected.as_str(),
            &[
                ("elapsed_ms", elapsed.as_str()),
                ("fields", fields.as_str()),
                ("status", "400"),
                ("url", response.url.as_str()),
            ],
        );
        Ok(Outcome::Rejected(errors))
    }

    fn failed<T>(&self, failure: TransportFailure) -> Outcome<T> {
        self.metrics.increment_failed();
        let event = if failure.is_timeout() {
            self.metrics.increment_timeouts();
            Event::RequestTimeout
        } else {
            Event::ResponseFailed
        };

        let status = failure.status_label();
        let elapsed = failure.elapsed.as_millis().to_string();
        self.logger.warn(
            event.as_str(),
            &[
                ("elapsed_ms", elapsed.as_str()),
                ("message", failure.message.as_str()),
                ("status", status.as_str()),
                ("url", failure.url.as_str()),
            ],
        );
        if let Some(body) = &failure.body {
            self.logger
                .trace(Event::ResponseFailedBody.as_str(), &[("body", body.as_str())]);
        }

        Outcome::Failed(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn response(status: u16, body: &str) -> Result<HttpResponse, TransportFailure> {
        Ok(HttpResponse::new(
            status,
            body,
            "http://h/users/42",
            Duration::from_millis(3),
        ))
    }

    fn classify(r: Result<HttpResponse, TransportFailure>) -> AdapterResult<Outcome> {
        let logger = Logger::null();
        let metrics = AdapterMetrics::new();
        Classifier::new(&logger, &metrics).classify(r)
    }

    #[test]
    fn test_status_partition() {
        let cases = [
            (199, StatusClass::Failure),
            (200, StatusClass::Success),
            (201, StatusClass::Failure),
            (299, StatusClass::Failure),
            (300, StatusClass::Failure),
            (400, StatusClass::Rejected),
            (401, StatusClass::Failure),
            (500, StatusClass::Failure),
        ];
        for (status, expected) in cases {
            assert_eq!(StatusClass::of(status), expected, "status {}", status);
        }
    }

    #[test]
    fn test_200_with_body_marshals() {
        match classify(response(200, r#"{"id": 42, "name": "Ann"}"#)).unwrap() {
            Outcome::Success(Some(result)) => {
                assert_eq!(result.first_value("id"), Some(&json!(42)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_200_empty_is_success_none() {
        assert!(matches!(
            classify(response(200, "")).unwrap(),
            Outcome::Success(None)
        ));
    }

    #[test]
    fn test_400_collects_errors() {
        match classify(response(400, r#"{"name": ["too short"]}"#)).unwrap() {
            Outcome::Rejected(errors) => {
                assert_eq!(errors.get("name").unwrap(), &["too short".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_400_without_errors_fails() {
        assert!(matches!(classify(response(400, "")).unwrap(), Outcome::Failed(_)));
        assert!(matches!(classify(response(400, "{}")).unwrap(), Outcome::Failed(_)));
    }

    #[test]
    fn test_400_non_json_fails() {
        match classify(response(400, "<h1>Bad Request</h1>")).unwrap() {
            Outcome::Failed(failure) => assert_eq!(failure.status, Some(400)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_other_status_fails_with_message() {
        match classify(response(503, r#"{"message": "maintenance"}"#)).unwrap() {
            Outcome::Failed(failure) => {
                assert_eq!(failure.status, Some(503));
                assert_eq!(failure.message, "maintenance");
                assert_eq!(failure.url, "http://h/users/42");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_failure_body_message_falls_back() {
        match classify(response(502, "<html>bad gateway</html>")).unwrap() {
            Outcome::Failed(failure) => assert_eq!(failure.message, "error"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_success_body_is_error() {
        let err = classify(response(200, "{oops")).unwrap_err();
        assert!(matches!(err, AdapterError::Marshal(_)));
    }

    #[test]
    fn test_timeout_counts_and_fails() {
        let logger = Logger::null();
        let metrics = AdapterMetrics::new();
        let outcome = Classifier::new(&logger, &metrics)
            .classify(Err(TransportFailure::timeout("http://h/u", Duration::from_secs(1))))
            .unwrap();

        assert!(matches!(outcome, Outcome::Failed(ref f) if f.is_timeout()));
        let snap = metrics.snapshot();
        assert_eq!(snap.timeouts, 1);
        assert_eq!(snap.responses_failed, 1);
    }

    #[test]
    fn test_severity_per_class() {
        let (logger, buffer) = Logger::memory();
        let metrics = AdapterMetrics::new();
        let classifier = Classifier::new(&logger, &metrics);
        classifier.classify(response(200, "")).unwrap();
        classifier.classify(response(500, "")).unwrap();

        let raw = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        let lines: Vec<serde_json::Value> =
            raw.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines[0]["event"], "RESPONSE_OK");
        assert_eq!(lines[0]["severity"], "INFO");
        assert_eq!(lines[1]["event"], "RESPONSE_FAILED");
        assert_eq!(lines[1]["severity"], "WARN");
    }

    #[test]
    fn test_custom_decoder() {
        let logger = Logger::null();
        let metrics = AdapterMetrics::new();
        let outcome = Classifier::new(&logger, &metrics)
            .classify_with(response(200, "[1, 2, 3]"), |body| {
                Ok(Some(body.len()))
            })
            .unwrap();
        assert!(matches!(outcome, Outcome::Success(Some(9))));
    }

    #[test]
    fn test_into_result() {
        let rejected: Outcome = Outcome::Rejected(marshal::collect(r#"{"a": "b"}"#).unwrap());
        assert!(matches!(
            rejected.into_result(),
            Err(AdapterError::ValidationRejected(_))
        ));

        let failed: Outcome = Outcome::Failed(TransportFailure::timeout("u", Duration::ZERO));
        assert!(matches!(failed.into_result(), Err(AdapterError::TransportFailed(_))));
    }
}
