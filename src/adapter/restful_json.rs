//! Connection adapter over a RESTful JSON service
//!
//! | operation  | request                                          |
//! |------------|--------------------------------------------------|
//! | `select`   | queued GET `{resource}/select?sql=...`           |
//! | `columns`  | queued GET `{resource}/schema_fields`            |
//! | `insert`   | POST `{resource}` with `attributes[...]`         |
//! | `update`   | PUT `{resource}/{id}` with `attributes[...]`     |
//! | `delete`   | DELETE `{resource}/{id}`                         |
//! | `validate` | POST `{resource}/valid` with `id`, `attributes`  |
//! | `invoke`   | POST `{resource}/{action}` with `attributes`     |
//!
//! The API key, when configured, is appended as a parameter to every request.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use super::connection::{Attributes, ConnectionAdapter};
use super::record_key::RecordKey;
use crate::classify::{Classifier, Outcome};
use crate::config::{AdapterConfig, ResourceDescriptor};
use crate::errors::AdapterResult;
use crate::locator::{encode_params, ResourceLocator};
use crate::marshal::TabularResult;
use crate::observability::{logger_for, AdapterMetrics, Event, Logger, ObservationScope};
use crate::schema::{decode_fields, FieldDescriptor};
use crate::transport::{
    BatchResults, HttpRequest, HttpTransport, RequestBatch, Transport, TransportFailure,
};

pub const ADAPTER_NAME: &str = "RestfullJson";

const SELECT_ACTION: &str = "select";
const SCHEMA_ACTION: &str = "schema_fields";
const VALIDATE_ACTION: &str = "valid";

/// Adapter bound to one resource for its whole lifetime.
///
/// Not safe to share across concurrent logical operations: `insert`
/// overwrites the last inserted id.
pub struct RestfulJsonAdapter {
    descriptor: ResourceDescriptor,
    locator: ResourceLocator,
    transport: Arc<dyn Transport>,
    logger: Logger,
    metrics: AdapterMetrics,
    last_insert_id: Option<RecordKey>,
}

impl fmt::Debug for RestfulJsonAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestfulJsonAdapter")
            .field("locator", &self.locator)
            .field("timeout", &self.descriptor.timeout)
            .field("last_insert_id", &self.last_insert_id)
            .finish_non_exhaustive()
    }
}

impl RestfulJsonAdapter {
    /// Adapter speaking HTTP, logging to the configured sink
    pub fn new(config: &AdapterConfig) -> AdapterResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.descriptor().timeout)?;
        let logger = logger_for(config.log_path.as_deref(), Logger::stdout());
        Self::with_transport(config, Arc::new(transport), logger)
    }

    /// Adapter over any transport
    pub fn with_transport(
        config: &AdapterConfig,
        transport: Arc<dyn Transport>,
        logger: Logger,
    ) -> AdapterResult<Self> {
        config.validate()?;
        let descriptor = config.descriptor();
        let locator = ResourceLocator::from_descriptor(&descriptor);

        let timeout_ms = descriptor.timeout.as_millis().to_string();
        let base = locator.resource_uri(None);
        logger.info(
            Event::AdapterReady.as_str(),
            &[
                ("api_key", if descriptor.api_key.is_some() { "on" } else { "off" }),
                ("resource", base.as_str()),
                ("table", descriptor.table_name.as_str()),
                ("timeout_ms", timeout_ms.as_str()),
            ],
        );

        Ok(Self {
            descriptor,
            locator,
            transport,
            logger,
            metrics: AdapterMetrics::new(),
            last_insert_id: None,
        })
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    pub fn metrics(&self) -> &AdapterMetrics {
        &self.metrics
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// `invoke` with a raw request entity. Attributes are still sent as
    /// parameters alongside it.
    pub fn invoke_with_body(
        &self,
        action: &str,
        attributes: &Attributes,
        body: &str,
        headers: Vec<(String, String)>,
    ) -> AdapterResult<Option<TabularResult>> {
        self.observe("INVOKE", || {
            let request = HttpRequest::post(self.locator.resource_uri(Some(action)))
                .with_params(attribute_params(None, attributes))
                .with_body(body, headers);
            self.dispatch(request)?.into_result()
        })
    }

    /// Decoded schema of `table`
    pub fn table_fields(&self, table: &str) -> AdapterResult<Vec<FieldDescriptor>> {
        self.observe("COLUMNS", || {
            let locator = self.locator_for(table);
            let request = HttpRequest::get(locator.resource_uri(Some(SCHEMA_ACTION)));
            let fields = self.fetch(request, |body| decode_fields(body).map(Some))?;
            Ok(fields.into_result()?.unwrap_or_default())
        })
    }

    /// Forget the last inserted id
    pub fn clear_cache(&mut self) {
        self.last_insert_id = None;
    }

    /// Close the adapter's session state. The transport holds no
    /// connection between calls, so this only resets per-instance state.
    pub fn disconnect(&mut self) {
        self.clear_cache();
        let table = self.descriptor.table_name.clone();
        self.logger
            .info(Event::Disconnected.as_str(), &[("table", table.as_str())]);
    }

    fn locator_for(&self, table: &str) -> ResourceLocator {
        if table == self.descriptor.table_name {
            self.locator.clone()
        } else {
            self.locator.for_table(table)
        }
    }

    fn observe<T>(&self, name: &str, op: impl FnOnce() -> AdapterResult<T>) -> AdapterResult<T> {
        let scope = ObservationScope::new(&self.logger, name);
        let result = op();
        match &result {
            Ok(_) => scope.complete(),
            Err(e) => scope.fail(e.code().code()),
        }
        result
    }

    fn log_sent(&self, request: &HttpRequest) {
        self.logger.trace(
            Event::RequestSent.as_str(),
            &[
                ("method", request.method.as_str()),
                ("request_id", request.request_id().unwrap_or("")),
                ("url", request.url.as_str()),
            ],
        );
    }

    /// One synchronous call, classified
    fn dispatch(&self, request: HttpRequest) -> AdapterResult<Outcome> {
        let request = request.with_api_key(self.descriptor.api_key.as_ref());
        self.log_sent(&request);
        self.metrics.increment_requests_sent(1);

        let response = self.transport.perform(request, self.descriptor.timeout);
        Classifier::new(&self.logger, &self.metrics).classify(response)
    }

    /// One GET through a queue run, classified with `decode`
    fn fetch<T, F>(&self, request: HttpRequest, decode: F) -> AdapterResult<Outcome<T>>
    where
        F: FnOnce(&str) -> AdapterResult<Option<T>>,
    {
        let request = request.with_api_key(self.descriptor.api_key.as_ref());
        let url = request.full_url();
        self.log_sent(&request);

        let mut batch = RequestBatch::new();
        let ticket = batch.submit(request);
        let response = self.run_queue(batch).take(ticket).unwrap_or_else(|| {
            Err(TransportFailure::connection(
                url,
                Duration::ZERO,
                "queue run returned no result",
            ))
        });

        Classifier::new(&self.logger, &self.metrics).classify_with(response, decode)
    }

    fn run_queue(&self, batch: RequestBatch) -> BatchResults {
        let queued = batch.len().to_string();
        self.logger
            .trace(Event::BatchRunBegin.as_str(), &[("queued", queued.as_str())]);
        self.metrics.increment_requests_sent(batch.len() as u64);
        self.metrics.increment_batch_runs();

        let results = self.transport.run_batch(batch, self.descriptor.timeout);

        let completed = results.len().to_string();
        let timeouts = results.timeouts().to_string();
        self.logger.trace(
            Event::BatchRunComplete.as_str(),
            &[
                ("completed", completed.as_str()),
                ("timeouts", timeouts.as_str()),
            ],
        );
        results
    }
}

impl ConnectionAdapter for RestfulJsonAdapter {
    fn adapter_name(&self) -> &'static str {
        ADAPTER_NAME
    }

    fn invoke(&self, action: &str, attributes: &Attributes) -> AdapterResult<Option<TabularResult>> {
        self.observe("INVOKE", || {
            let request = HttpRequest::post(self.locator.resource_uri(Some(action)))
                .with_params(attribute_params(None, attributes));
            self.dispatch(request)?.into_result()
        })
    }

    fn select(&self, query: &str, _binds: &[Value]) -> AdapterResult<TabularResult> {
        let scope = ObservationScope::new(&self.logger, "SELECT");
        let request = HttpRequest::get(self.locator.resource_uri(Some(SELECT_ACTION)))
            .with_params(vec![("sql".to_string(), query.to_string())]);

        let result = self
            .fetch(request, crate::marshal::marshal)
            .and_then(Outcome::into_result)
            .map(Option::unwrap_or_default);

        match &result {
            Ok(rows) => {
                let count = rows.len().to_string();
                scope.complete_with_fields(&[("rows", count.as_str())]);
            }
            Err(e) => scope.fail(e.code().code()),
        }
        result
    }

    fn insert(&mut self, attributes: &Attributes) -> AdapterResult<Option<RecordKey>> {
        let id = self.observe("INSERT", || {
            let request = HttpRequest::post(self.locator.resource_uri(None))
                .with_params(attribute_params(None, attributes));
            let result = self.dispatch(request)?.into_result()?;
            Ok(result
                .as_ref()
                .and_then(|r| r.first_value("id"))
                .and_then(|v| RecordKey::try_from(v).ok()))
        })?;

        self.last_insert_id = id.clone();
        Ok(id)
    }

    fn update(&self, id: &RecordKey, attributes: &Attributes) -> AdapterResult<u64> {
        self.observe("UPDATE", || {
            let request = HttpRequest::put(self.locator.record_uri(&id.to_string())?)
                .with_params(attribute_params(None, attributes));
            self.dispatch(request)?.into_result()?;
            Ok(1)
        })
    }

    fn delete(&self, id: &RecordKey) -> AdapterResult<()> {
        self.observe("DELETE", || {
            let request = HttpRequest::delete(self.locator.record_uri(&id.to_string())?);
            self.dispatch(request)?.into_result()?;
            Ok(())
        })
    }

    fn validate(&self, id: Option<&RecordKey>, attributes: &Attributes) -> AdapterResult<bool> {
        self.observe("VALIDATE", || {
            let request = HttpRequest::post(self.locator.resource_uri(Some(VALIDATE_ACTION)))
                .with_params(attribute_params(id, attributes));
            self.dispatch(request)?.into_result()?;
            Ok(true)
        })
    }

    fn columns(&self, table: &str) -> AdapterResult<Vec<FieldDescriptor>> {
        self.table_fields(table)
    }

    fn last_inserted_id(&self) -> Option<&RecordKey> {
        self.last_insert_id.as_ref()
    }

    fn supports_delete_multiple(&self) -> bool {
        self.descriptor.delete_multiple_enabled
    }
}

/// `id` (when given) followed by `attributes[...]`
fn attribute_params(id: Option<&RecordKey>, attributes: &Attributes) -> Vec<(String, String)> {
    let mut params = Map::new();
    if let Some(id) = id {
        params.insert("id".to_string(), id.to_value());
    }
    params.insert("attributes".to_string(), Value::Object(attributes.clone()));
    encode_params(&params)
}
