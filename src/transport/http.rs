//! reqwest-backed transport driven synchronously on a private tokio runtime
//!
//! Calls block the calling thread until the response arrives or the deadline
//! elapses. Must not be called from inside an async runtime; wrap the adapter
//! in `spawn_blocking` there.

use std::time::{Duration, Instant};

use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::runtime::Runtime;

use super::batch::{BatchEntry, BatchResults, RequestBatch, Ticket};
use super::failure::TransportFailure;
use super::request::{HttpMethod, HttpRequest, HttpResponse};
use super::Transport;
use crate::errors::{AdapterError, AdapterResult};

/// HTTP transport over reqwest
pub struct HttpTransport {
    runtime: Runtime,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport whose client-level timeout matches `timeout`.
    pub fn new(timeout: Duration) -> AdapterResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AdapterError::config(format!("cannot start transport runtime: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { runtime, client })
    }
}

impl Transport for HttpTransport {
    fn perform(
        &self,
        request: HttpRequest,
        deadline: Duration,
    ) -> Result<HttpResponse, TransportFailure> {
        let client = self.client.clone();
        self.runtime
            .block_on(async move { send_with_deadline(&client, request, deadline).await })
    }

    fn run_batch(&self, batch: RequestBatch, deadline: Duration) -> BatchResults {
        let client = self.client.clone();
        self.runtime.block_on(run_queue(client, batch, deadline))
    }
}

async fn send_with_deadline(
    client: &reqwest::Client,
    request: HttpRequest,
    deadline: Duration,
) -> Result<HttpResponse, TransportFailure> {
    let url = request.full_url();
    let start = Instant::now();
    match tokio::time::timeout(deadline, send(client, request)).await {
        Ok(result) => result,
        Err(_) => Err(TransportFailure::timeout(url, start.elapsed())),
    }
}

async fn run_queue(client: reqwest::Client, batch: RequestBatch, deadline: Duration) -> BatchResults {
    let start = Instant::now();
    let mut pending_urls: Vec<(Ticket, String)> = Vec::with_capacity(batch.len());
    let mut in_flight = FuturesUnordered::new();

    for (ticket, request) in batch.into_requests() {
        pending_urls.push((ticket, request.full_url()));
        let client = client.clone();
        in_flight.push(async move { (ticket, send(&client, request).await) });
    }

    let mut entries: Vec<BatchEntry> = Vec::with_capacity(pending_urls.len());
    let expiry = tokio::time::sleep(deadline);
    tokio::pin!(expiry);

    while !in_flight.is_empty() {
        tokio::select! {
            next = in_flight.next() => match next {
                Some((ticket, outcome)) => entries.push(BatchEntry { ticket, outcome }),
                None => break,
            },
            _ = &mut expiry => break,
        }
    }

    // Dropping the stream aborts whatever is still in flight.
    drop(in_flight);

    let elapsed = start.elapsed();
    for (ticket, url) in pending_urls {
        if !entries.iter().any(|e| e.ticket == ticket) {
            entries.push(BatchEntry {
                ticket,
                outcome: Err(TransportFailure::timeout(url, elapsed)),
            });
        }
    }

    BatchResults::new(entries)
}

async fn send(client: &reqwest::Client, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
    let url = request.full_url();
    let start = Instant::now();

    // PUT goes through the same client and deadline as every other verb.
    let method = match request.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    };

    let mut builder = client.request(method, &request.url);
    if !request.params.is_empty() {
        builder = builder.query(&request.params);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = builder
        .send()
        .await
        .map_err(|e| failure_from_reqwest(&url, start, e))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| failure_from_reqwest(&url, start, e))?;

    Ok(HttpResponse::new(status, body, url, start.elapsed()))
}

fn failure_from_reqwest(url: &str, start: Instant, e: reqwest::Error) -> TransportFailure {
    if e.is_timeout() {
        TransportFailure::timeout(url, start.elapsed())
    } else {
        TransportFailure::connection(url, start.elapsed(), e.to_string())
    }
}
