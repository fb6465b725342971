//! HTTP request/response values exchanged with a `Transport`

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use uuid::Uuid;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Stands in for the API key value in rendered URLs
pub const MASKED_VALUE: &str = "***";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API key sent as an extra request parameter on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub name: String,
    pub value: String,
}

impl ApiKey {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// URL without query string
    pub url: String,
    /// Query parameters, already encoded as flat pairs
    pub params: Vec<(String, String)>,
    /// Raw request entity
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
    /// Parameter whose value never appears in a rendered URL
    secret_param: Option<String>,
}

impl HttpRequest {
    /// New request tagged with a fresh request id
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            body: None,
            headers: vec![(
                REQUEST_ID_HEADER.to_string(),
                Uuid::new_v4().to_string(),
            )],
            secret_param: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Raw entity plus extra headers
    pub fn with_body(mut self, body: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        self.body = Some(body.into());
        self.headers.extend(headers);
        self
    }

    /// Append the API key parameter
    pub fn with_api_key(mut self, key: Option<&ApiKey>) -> Self {
        if let Some(key) = key {
            self.params.push((key.name.clone(), key.value.clone()));
            self.secret_param = Some(key.name.clone());
        }
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(REQUEST_ID_HEADER)
    }

    /// Value of the first query parameter named `name`
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// URL with percent-encoded query string, for logs and failures.
    /// The API key value is rendered as `***`.
    pub fn full_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        let secret = self.secret_param.as_deref();
        match Url::parse(&self.url) {
            Ok(mut url) => {
                url.query_pairs_mut().extend_pairs(self.params.iter().map(|(k, v)| {
                    if Some(k.as_str()) == secret {
                        (k.as_str(), MASKED_VALUE)
                    } else {
                        (k.as_str(), v.as_str())
                    }
                }));
                url.to_string()
            }
            Err(_) => self.url.clone(),
        }
    }
}

/// A response received from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// Full request URL, for logs
    pub url: String,
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>, url: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status,
            body: body.into(),
            url: url.into(),
            elapsed,
        }
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}
