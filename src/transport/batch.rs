//! Queued GET requests run together under one deadline
//!
//! submit(requests) → run(deadline) → results.
//!
//! Results come back in arrival order, not submit order. Every submitted
//! request yields exactly one result; requests still in flight when the
//! deadline elapses yield a timeout failure.

use super::failure::TransportFailure;
use super::request::{HttpMethod, HttpRequest, HttpResponse};

/// Handle identifying one submitted request within its batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(usize);

impl Ticket {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Requests waiting for a queue run
#[derive(Debug, Default)]
pub struct RequestBatch {
    requests: Vec<(Ticket, HttpRequest)>,
}

impl RequestBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request. Only GET requests are batched; other verbs belong on
    /// `Transport::perform`.
    pub fn submit(&mut self, request: HttpRequest) -> Ticket {
        debug_assert_eq!(request.method, HttpMethod::Get);
        let ticket = Ticket(self.requests.len());
        self.requests.push((ticket, request));
        ticket
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> impl Iterator<Item = &HttpRequest> {
        self.requests.iter().map(|(_, r)| r)
    }

    pub fn into_requests(self) -> Vec<(Ticket, HttpRequest)> {
        self.requests
    }
}

/// Outcome of one request in a queue run
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub ticket: Ticket,
    pub outcome: Result<HttpResponse, TransportFailure>,
}

/// Results of a queue run, in arrival order
#[derive(Debug, Default)]
pub struct BatchResults {
    entries: Vec<BatchEntry>,
}

impl BatchResults {
    pub fn new(entries: Vec<BatchEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order responses arrived
    pub fn iter(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter()
    }

    /// Remove and return the outcome for one ticket
    pub fn take(&mut self, ticket: Ticket) -> Option<Result<HttpResponse, TransportFailure>> {
        let pos = self.entries.iter().position(|e| e.ticket == ticket)?;
        Some(self.entries.remove(pos).outcome)
    }

    pub fn timeouts(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(&e.outcome, Err(f) if f.is_timeout()))
            .count()
    }
}

impl IntoIterator for BatchResults {
    type Item = BatchEntry;
    type IntoIter = std::vec::IntoIter<BatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
