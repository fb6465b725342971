//! logical_record - a record adapter over RESTful JSON services
//!
//! Translates record operations (select, insert, update, delete, validate,
//! custom actions, schema queries) into HTTP calls and maps the responses
//! back into tabular results, validation errors or transport failures.

pub mod adapter;
pub mod classify;
pub mod cli;
pub mod config;
pub mod errors;
pub mod locator;
pub mod marshal;
pub mod observability;
pub mod schema;
pub mod transport;

pub use adapter::{Attributes, ConnectionAdapter, RecordKey, RestfulJsonAdapter};
pub use config::{AdapterConfig, ResourceDescriptor};
pub use errors::{AdapterError, AdapterResult};
pub use marshal::{TabularResult, ValidationErrors};
