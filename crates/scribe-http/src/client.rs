//! HTTP client implementation.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use scribe_core::error::{Error, HttpError, TransportError};
use scribe_core::{ApiUrl, Result};

use crate::config::ClientConfig;

/// HTTP client for the scribe API.
///
/// Performs single requests only; retry and credential handling live in
/// the executor.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base_url: ApiUrl,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new client from configuration.
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            timeout: config.timeout(),
        })
    }

    /// Returns the API base URL this client is configured for.
    pub(crate) fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    /// Send one request and return the response whatever its status.
    #[instrument(skip(self, headers, body), fields(api = %self.base_url))]
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let url = self.base_url.endpoint(path);
        debug!(%method, path, "HTTP request");

        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        trace!(status = %response.status(), "HTTP response");
        Ok(response)
    }

    /// Map a reqwest failure onto the transport error taxonomy.
    pub(crate) fn transport_error(&self, err: reqwest::Error) -> Error {
        let err = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        Error::Transport(err)
    }

    /// Decode a successful response body as JSON.
    pub(crate) async fn decode_json<R: DeserializeOwned>(&self, response: Response) -> Result<R> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            Error::Transport(TransportError::Decode {
                message: e.to_string(),
            })
        })
    }
}

/// Consume a non-2xx response into a passthrough error.
pub(crate) async fn read_http_error(response: Response) -> HttpError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    HttpError::new(status, body)
}
