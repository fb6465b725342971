//! The operation surface a persistence layer drives

use serde_json::{Map, Value};

use super::record_key::RecordKey;
use crate::errors::AdapterResult;
use crate::marshal::TabularResult;
use crate::schema::{self, FieldDescriptor};

/// Attribute map: field name to value
pub type Attributes = Map<String, Value>;

/// A connection adapter for one remote resource.
///
/// Every operation is one blocking call. `ValidationRejected` and transport
/// failures are terminal; nothing is retried.
pub trait ConnectionAdapter {
    fn adapter_name(&self) -> &'static str;

    /// Custom server-side action `{resource}/{action}`
    fn invoke(&self, action: &str, attributes: &Attributes) -> AdapterResult<Option<TabularResult>>;

    /// Run an opaque query. Bind values are accepted and not sent.
    fn select(&self, query: &str, binds: &[Value]) -> AdapterResult<TabularResult>;

    /// Create a record; returns the id the service assigned, if any
    fn insert(&mut self, attributes: &Attributes) -> AdapterResult<Option<RecordKey>>;

    /// Update a record; always reports one affected row
    fn update(&self, id: &RecordKey, attributes: &Attributes) -> AdapterResult<u64>;

    fn delete(&self, id: &RecordKey) -> AdapterResult<()>;

    /// Ask the service to validate attributes; `id` is absent for new records
    fn validate(&self, id: Option<&RecordKey>, attributes: &Attributes) -> AdapterResult<bool>;

    /// Field descriptors of `table`
    fn columns(&self, table: &str) -> AdapterResult<Vec<FieldDescriptor>>;

    fn primary_key(&self, table: &str) -> AdapterResult<Option<String>> {
        let fields = self.columns(table)?;
        Ok(schema::primary_key(&fields).map(str::to_string))
    }

    /// Rows of `select`, without the field list
    fn select_rows(&self, query: &str) -> AdapterResult<Vec<Vec<Value>>> {
        Ok(self.select(query, &[])?.into_rows())
    }

    fn last_inserted_id(&self) -> Option<&RecordKey>;

    fn supports_savepoints(&self) -> bool {
        true
    }

    fn supports_primary_key(&self) -> bool {
        true
    }

    fn supports_count_distinct(&self) -> bool {
        true
    }

    fn supports_explain(&self) -> bool {
        true
    }

    fn supports_delete_multiple(&self) -> bool {
        false
    }

    fn encoding(&self) -> &'static str {
        "UTF-8"
    }

    /// Remote resources are assumed to exist
    fn table_exists(&self, _table: &str) -> bool {
        true
    }
}
