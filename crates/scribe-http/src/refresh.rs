//! Refresh-token exchange.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use scribe_core::error::{AuthError, Error};
use scribe_core::{RefreshToken, Result, TokenPair, TokenStore};

use crate::client::{HttpClient, read_http_error};
use crate::config::ClientConfig;

/// Path of the auth refresh endpoint.
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Response from the refresh endpoint. Both fields are required.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
}

/// Exchanges the stored refresh token for a new [`TokenPair`].
///
/// Every failure clears the token store before it is reported, so a
/// rejected refresh token is never sent twice. There is no guard against
/// concurrent refreshes: two racing callers each make their own call and
/// the last write wins.
#[derive(Debug, Clone)]
pub struct RefreshCoordinator {
    client: HttpClient,
    store: Arc<dyn TokenStore>,
}

impl RefreshCoordinator {
    /// Create a coordinator for the API in `config`, persisting into `store`.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        Ok(Self::from_client(HttpClient::new(config)?, store))
    }

    pub(crate) fn from_client(client: HttpClient, store: Arc<dyn TokenStore>) -> Self {
        Self { client, store }
    }

    /// Refresh the stored token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RefreshFailed`] if no usable refresh token is
    /// stored (no network call is made), if the endpoint answers with a
    /// non-2xx status or a body missing either token, if the call fails in
    /// transit, or if the new pair cannot be persisted. The store is empty
    /// afterwards in every one of these cases.
    #[instrument(skip(self), fields(api = %self.client.base_url()))]
    pub async fn refresh(&self) -> Result<TokenPair> {
        info!("Refreshing session");

        let Some(current) = self.store.read() else {
            return Err(self.fail("no stored token pair"));
        };

        if current.refresh_token().is_empty() {
            return Err(self.fail("stored refresh token is empty"));
        }

        let pair = match self.exchange(current.refresh_token()).await {
            Ok(pair) => pair,
            Err(reason) => return Err(self.fail(reason)),
        };

        if let Err(e) = self.store.write(&pair) {
            return Err(self.fail(format!("failed to persist refreshed tokens: {}", e)));
        }

        debug!("Session refreshed successfully");
        Ok(pair)
    }

    /// Perform the network exchange, describing any failure as a reason.
    async fn exchange(&self, refresh_token: &RefreshToken) -> std::result::Result<TokenPair, String> {
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: refresh_token.as_str(),
        })
        .map_err(|e| e.to_string())?;

        let response = self
            .client
            .send(Method::POST, REFRESH_PATH, HeaderMap::new(), Some(&body))
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let error = read_http_error(response).await;
            return Err(format!("refresh endpoint rejected the token ({})", error));
        }

        let tokens: RefreshResponse = self
            .client
            .decode_json(response)
            .await
            .map_err(|e| format!("malformed refresh response: {}", e))?;

        if tokens.access_token.is_empty() || tokens.refresh_token.is_empty() {
            return Err("refresh response contained an empty token".to_string());
        }

        Ok(TokenPair::new(tokens.access_token, tokens.refresh_token))
    }

    /// Clear the store and build the error for a failed refresh.
    fn fail(&self, reason: impl Into<String>) -> Error {
        let reason = reason.into();
        warn!(%reason, "Token refresh failed, clearing stored tokens");

        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear token store");
        }

        AuthError::RefreshFailed { reason }.into()
    }
}
