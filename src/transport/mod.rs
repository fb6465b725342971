//! Transport client
//!
//! Two modes, both bounded by a deadline:
//!
//! - `perform`: one synchronous request (POST/PUT/DELETE, and single GETs)
//! - `run_batch`: a queue run over submitted GET requests; control returns
//!   once every request has completed or the deadline has elapsed
//!
//! A transport never classifies responses: any status comes back as
//! `Ok(HttpResponse)`. `Err(TransportFailure)` means no response was obtained.

mod batch;
mod failure;
mod http;
mod request;
mod stub;

pub use batch::{BatchEntry, BatchResults, RequestBatch, Ticket};
pub use failure::{extract_message, FailureReason, TransportFailure};
pub use http::HttpTransport;
pub use request::{ApiKey, HttpMethod, HttpRequest, HttpResponse, MASKED_VALUE, REQUEST_ID_HEADER};
pub use stub::{StubReply, StubTransport};

use std::time::Duration;

/// Issues HTTP requests for the adapter
pub trait Transport: Send + Sync {
    /// Send one request, waiting at most `deadline`
    fn perform(&self, request: HttpRequest, deadline: Duration)
        -> Result<HttpResponse, TransportFailure>;

    /// Run every queued request; one entry per submitted request
    fn run_batch(&self, batch: RequestBatch, deadline: Duration) -> BatchResults;
}
