//! Adapter configuration
//!
//! Loaded from a JSON file; optional keys fall back to their defaults.
//!
//! ```json
//! {
//!   "host": "api.example.com",
//!   "table_name": "users",
//!   "use_ssl": true,
//!   "timeout": 10000,
//!   "use_api_key": true,
//!   "api_key_name": "token",
//!   "api_key": "s3cret"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{AdapterError, AdapterResult};
use crate::transport::ApiKey;

/// Default call timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Adapter configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Service host, optionally with port (no scheme)
    pub host: String,

    /// Logical resource (table) this adapter addresses
    pub table_name: String,

    /// Path of the resource on the host (default: "/{table_name}")
    #[serde(default)]
    pub resource_path: Option<String>,

    /// Use https (default: false)
    #[serde(default)]
    pub use_ssl: bool,

    /// Call timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Send an API key parameter with every call (default: false)
    #[serde(default)]
    pub use_api_key: bool,

    /// Parameter name for the API key (default: "api_key")
    #[serde(default = "default_api_key_name")]
    pub api_key_name: String,

    #[serde(default)]
    pub api_key: String,

    /// Reserved for batch deletes (default: false)
    #[serde(default)]
    pub enable_delete_multiple: bool,

    /// Adapter log file; stdout when absent
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_api_key_name() -> String {
    "api_key".to_string()
}

impl AdapterConfig {
    /// Minimal configuration for `host` and `table_name`
    pub fn new(host: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            table_name: table_name.into(),
            resource_path: None,
            use_ssl: false,
            timeout: default_timeout(),
            use_api_key: false,
            api_key_name: default_api_key_name(),
            api_key: String::new(),
            enable_delete_multiple: false,
            log_path: None,
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> AdapterResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AdapterError::config(format!("failed to read config: {}", e)))?;

        let config: AdapterConfig = serde_json::from_str(&content)
            .map_err(|e| AdapterError::config(format!("invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AdapterResult<()> {
        if self.host.trim().is_empty() {
            return Err(AdapterError::config("host must not be empty"));
        }
        if self.host.contains("://") {
            return Err(AdapterError::config(format!(
                "host '{}' must not include a scheme; use use_ssl instead",
                self.host
            )));
        }
        if self.table_name.trim().is_empty() {
            return Err(AdapterError::config("table_name must not be empty"));
        }
        if let Some(path) = &self.resource_path {
            if !path.starts_with('/') {
                return Err(AdapterError::config(format!(
                    "resource_path '{}' must start with '/'",
                    path
                )));
            }
        }
        if self.timeout == 0 {
            return Err(AdapterError::config("timeout must be > 0"));
        }
        if self.use_api_key && (self.api_key_name.is_empty() || self.api_key.is_empty()) {
            return Err(AdapterError::config(
                "api_key_name and api_key are required when use_api_key is set",
            ));
        }
        Ok(())
    }

    /// Builder-style TLS toggle
    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    pub fn with_timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.use_api_key = true;
        self.api_key_name = name.into();
        self.api_key = value.into();
        self
    }

    pub fn with_resource_path(mut self, path: impl Into<String>) -> Self {
        self.resource_path = Some(path.into());
        self
    }

    /// Immutable per-adapter projection
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            table_name: self.table_name.clone(),
            host: self.host.clone(),
            resource_path: self
                .resource_path
                .clone()
                .unwrap_or_else(|| format!("/{}", self.table_name)),
            use_tls: self.use_ssl,
            api_key: if self.use_api_key {
                Some(ApiKey::new(&self.api_key_name, &self.api_key))
            } else {
                None
            },
            timeout: Duration::from_millis(self.timeout),
            delete_multiple_enabled: self.enable_delete_multiple,
        }
    }
}

/// What an adapter instance needs to address its resource; fixed for the
/// adapter's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub table_name: String,
    pub host: String,
    pub resource_path: String,
    pub use_tls: bool,
    /// Present iff API keys are enabled
    pub api_key: Option<ApiKey>,
    pub timeout: Duration,
    pub delete_multiple_enabled: bool,
}
