//! CRUD dispatch over a remote resource
//!
//! ```ignore
//! use logical_record::adapter::{ConnectionAdapter, RestfulJsonAdapter};
//! use logical_record::config::AdapterConfig;
//!
//! let config = AdapterConfig::new("api.example.com", "users");
//! let mut adapter = RestfulJsonAdapter::new(&config)?;
//! let id = adapter.insert(&attributes)?;
//! ```

mod connection;
mod record_key;
mod restful_json;

pub use connection::{Attributes, ConnectionAdapter};
pub use record_key::RecordKey;
pub use restful_json::{RestfulJsonAdapter, ADAPTER_NAME};
