//! Observable adapter events
//!
//! Events are explicit and typed; every log line the adapter emits uses one.

use std::fmt;

/// Observable events in the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded from file
    ConfigLoaded,
    /// Adapter constructed for a resource
    AdapterReady,
    /// Adapter disconnected
    Disconnected,

    // Transport
    /// Request handed to the transport
    RequestSent,
    /// Status 200 received
    ResponseOk,
    /// Status 400 received with field errors
    ResponseRejected,
    /// Any other status or a connection error
    ResponseFailed,
    /// Deadline elapsed before a response arrived
    RequestTimeout,
    /// Raw body of a failed response
    ResponseFailedBody,

    // Queue runs
    /// Queued GET requests start running
    BatchRunBegin,
    /// Queue run finished (all complete or deadline hit)
    BatchRunComplete,

    // Decoding
    /// Success body was not valid JSON
    MarshalFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::AdapterReady => "ADAPTER_READY",
            Event::Disconnected => "ADAPTER_DISCONNECTED",

            Event::RequestSent => "REQUEST_SENT",
            Event::ResponseOk => "RESPONSE_OK",
            Event::ResponseRejected => "RESPONSE_REJECTED",
            Event::ResponseFailed => "RESPONSE_FAILED",
            Event::RequestTimeout => "REQUEST_TIMEOUT",
            Event::ResponseFailedBody => "RESPONSE_FAILED_BODY",

            Event::BatchRunBegin => "BATCH_RUN_BEGIN",
            Event::BatchRunComplete => "BATCH_RUN_COMPLETE",

            Event::MarshalFailed => "MARSHAL_FAILED",
        }
    }

    /// Returns true if the event reports a failed call
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::ResponseFailed | Event::RequestTimeout | Event::MarshalFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
