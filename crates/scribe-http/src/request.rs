//! Outgoing API request description.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use scribe_core::Result;
use scribe_core::error::{Error, InvalidInputError};

/// A request to the scribe API, independent of any credential.
///
/// The executor turns this into one or two HTTP attempts, attaching
/// whatever token is current at the time of each attempt. `path` is
/// relative to the configured base URL and must start with `/`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    headers: HeaderMap,
}

impl ApiRequest {
    /// Create a request with no body.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a path relative to the API base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        validate_path(&path)?;

        Ok(Self {
            method,
            path,
            body: None,
            headers: HeaderMap::new(),
        })
    }

    /// Create a request from a method name such as `"get"` or `"POST"`.
    pub fn from_parts(method: &str, path: impl Into<String>) -> Result<Self> {
        let parsed = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| {
            InvalidInputError::Method {
                value: method.to_string(),
            }
        })?;
        Self::new(parsed, path)
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Result<Self> {
        Self::new(Method::GET, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Result<Self> {
        Self::new(Method::POST, path)
    }

    /// Create a PUT request.
    pub fn put(path: impl Into<String>) -> Result<Self> {
        Self::new(Method::PUT, path)
    }

    /// Create a DELETE request.
    pub fn delete(path: impl Into<String>) -> Result<Self> {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: format!("request body is not valid JSON: {}", e),
            })
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add a header. `Authorization` is ignored; credentials are attached
    /// per attempt.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path relative to the API base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the JSON body, if any.
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Returns the caller-supplied headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn validate_path(path: &str) -> Result<()> {
    let reason = if !path.starts_with('/') {
        Some("must start with '/'")
    } else if path.starts_with("//") || path.contains("://") {
        Some("must be relative to the API base URL")
    } else if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("must not contain whitespace or control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(InvalidInputError::Path {
            value: path.to_string(),
            reason: reason.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}
