//! In-memory transport with scripted replies
//!
//! Replies are consumed in order; every request is recorded for inspection.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::batch::{BatchEntry, BatchResults, RequestBatch};
use super::failure::TransportFailure;
use super::request::{HttpRequest, HttpResponse};
use super::Transport;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Respond with a status and body
    Respond { status: u16, body: String },
    /// Behave as if the deadline elapsed
    Timeout,
    /// Behave as if the connection failed
    ConnectionError(String),
}

impl StubReply {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        StubReply::Respond {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }
}

/// Transport that never touches the network
#[derive(Debug, Default)]
pub struct StubTransport {
    replies: Mutex<VecDeque<StubReply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport preloaded with replies
    pub fn with_replies(replies: impl IntoIterator<Item = StubReply>) -> Self {
        let stub = Self::new();
        for reply in replies {
            stub.push(reply);
        }
        stub
    }

    /// Queue one more reply
    pub fn push(&self, reply: StubReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }

    fn answer(&self, request: HttpRequest, deadline: Duration) -> Result<HttpResponse, TransportFailure> {
        let url = request.full_url();
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }

        let reply = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match reply {
            Some(StubReply::Respond { status, body }) => {
                Ok(HttpResponse::new(status, body, url, Duration::ZERO))
            }
            Some(StubReply::Timeout) => Err(TransportFailure::timeout(url, deadline)),
            Some(StubReply::ConnectionError(message)) => {
                Err(TransportFailure::connection(url, Duration::ZERO, message))
            }
            None => Err(TransportFailure::connection(
                url,
                Duration::ZERO,
                "no stubbed reply",
            )),
        }
    }
}

impl Transport for StubTransport {
    fn perform(&self, request: HttpRequest, deadline: Duration) -> Result<HttpResponse, TransportFailure> {
        self.answer(request, deadline)
    }

    fn run_batch(&self, batch: RequestBatch, deadline: Duration) -> BatchResults {
        let entries = batch
            .into_requests()
            .into_iter()
            .map(|(ticket, request)| BatchEntry {
                ticket,
                outcome: self.answer(request, deadline),
            })
            .collect();
        BatchResults::new(entries)
    }
}
