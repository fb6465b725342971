//! Resource locator and request parameter encoding
//!
//! URIs have the shape `{scheme}://{host}{resource_path}[/{action}]`, with
//! `https` iff TLS is enabled. Record ids are percent-encoded as a single
//! path segment.

mod params;

pub use params::encode_params;

use reqwest::Url;

use crate::config::ResourceDescriptor;
use crate::errors::{AdapterError, AdapterResult};

/// Builds URIs for one resource. Pure function of configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    host: String,
    resource_path: String,
    use_tls: bool,
}

impl ResourceLocator {
    pub fn new(host: impl Into<String>, resource_path: impl Into<String>, use_tls: bool) -> Self {
        Self {
            host: host.into(),
            resource_path: resource_path.into(),
            use_tls,
        }
    }

    pub fn from_descriptor(descriptor: &ResourceDescriptor) -> Self {
        Self::new(
            descriptor.host.clone(),
            descriptor.resource_path.clone(),
            descriptor.use_tls,
        )
    }

    /// Locator for another table on the same host
    pub fn for_table(&self, table_name: &str) -> Self {
        Self::new(self.host.clone(), format!("/{}", table_name), self.use_tls)
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_tls {
            "https"
        } else {
            "http"
        }
    }

    /// Base URI, or the URI of `action` under the resource
    pub fn resource_uri(&self, action: Option<&str>) -> String {
        match action {
            Some(action) => format!(
                "{}://{}{}/{}",
                self.scheme(),
                self.host,
                self.resource_path,
                action
            ),
            None => format!("{}://{}{}", self.scheme(), self.host, self.resource_path),
        }
    }

    /// URI of one record: `{resource}/{id}`, with `id` confined to one segment
    pub fn record_uri(&self, id: &str) -> AdapterResult<String> {
        if matches!(id, "" | "." | "..") {
            return Err(AdapterError::InvalidKey(id.to_string()));
        }
        let base = self.resource_uri(None);
        let mut url = Url::parse(&base)
            .map_err(|e| AdapterError::config(format!("invalid resource uri {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| AdapterError::config(format!("resource uri {} cannot hold a path", base)))?
            .pop_if_empty()
            .push(id);
        Ok(url.to_string())
    }
}
