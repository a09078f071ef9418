//! Client configuration.

use std::time::Duration;

use scribe_core::ApiUrl;

/// Per-attempt timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for talking to the scribe API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: ApiUrl,
    timeout: Duration,
    user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the API at `base_url` with default settings.
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("scribe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Bound every network attempt (including refresh calls) by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    /// Returns the per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
