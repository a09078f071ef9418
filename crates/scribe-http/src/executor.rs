//! Request execution with a single refresh-and-retry.

use std::fmt;
use std::sync::Arc;

use reqwest::{Response, StatusCode};
use tracing::{debug, instrument, warn};

use scribe_core::error::{AuthError, HttpError};
use scribe_core::{Result, TokenPair, TokenStore};

use crate::client::{HttpClient, read_http_error};
use crate::config::ClientConfig;
use crate::credentials::attach_credentials;
use crate::refresh::RefreshCoordinator;
use crate::request::ApiRequest;

/// Which of the (at most two) attempts of one execution is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attempt {
    /// The first attempt, with whatever token was stored.
    First,
    /// The single retry after a successful refresh.
    Retry,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attempt::First => write!(f, "first"),
            Attempt::Retry => write!(f, "retry"),
        }
    }
}

/// How an execution ended, before the entry point decides what to report.
enum Completion {
    Success(Response),
    /// A 401/403 the pipeline could not recover from: either the request was
    /// anonymous, or the retry was rejected too.
    Unauthorized { attempt: Attempt, error: HttpError },
}

/// Central entry point for every call to the API.
///
/// The executor only reads the token store. Refreshing and clearing tokens
/// is left to the [`RefreshCoordinator`].
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: HttpClient,
    store: Arc<dyn TokenStore>,
    refresher: RefreshCoordinator,
}

impl RequestExecutor {
    /// Create an executor for the API in `config`, reading tokens from `store`.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let client = HttpClient::new(config)?;
        let refresher = RefreshCoordinator::from_client(client.clone(), store.clone());
        Ok(Self {
            client,
            store,
            refresher,
        })
    }

    /// Returns the coordinator used to renew expired credentials.
    pub fn refresher(&self) -> &RefreshCoordinator {
        &self.refresher
    }

    pub(crate) fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Execute a request, refreshing and retrying once on 401/403.
    ///
    /// # Errors
    ///
    /// - [`AuthError::SessionExpired`] if an authenticated call was rejected
    ///   and the refresh failed. The caller should send the user to login.
    /// - [`scribe_core::error::HttpError`] for any other non-2xx status,
    ///   including a 401/403 on the retry or on an anonymous call.
    /// - [`scribe_core::error::TransportError`] for network failures and
    ///   timeouts on any attempt.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        match self.run(request).await? {
            Completion::Success(response) => Ok(response),
            Completion::Unauthorized { error, .. } => Err(error.into()),
        }
    }

    /// Execute a request for a surface that can render a logged-out state.
    ///
    /// Behaves like [`execute`](Self::execute), except that a 401 on the
    /// retry (after a successful refresh) yields `Ok(None)` instead of an
    /// error. An anonymous 401/403 and a 403 on the retry are still
    /// reported as [`HttpError`], and a failed refresh still reports
    /// [`AuthError::SessionExpired`].
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn execute_tolerant(&self, request: &ApiRequest) -> Result<Option<Response>> {
        match self.run(request).await? {
            Completion::Success(response) => Ok(Some(response)),
            Completion::Unauthorized {
                attempt: Attempt::Retry,
                error,
            } if error.status == StatusCode::UNAUTHORIZED.as_u16() => {
                debug!("Refreshed credentials not accepted, returning no data");
                Ok(None)
            }
            Completion::Unauthorized { error, .. } => Err(error.into()),
        }
    }

    /// The two-attempt state machine shared by both entry points.
    async fn run(&self, request: &ApiRequest) -> Result<Completion> {
        let tokens = self.store.read();
        let response = self.send(request, tokens.as_ref(), Attempt::First).await?;

        if !is_auth_rejection(response.status()) {
            return finish(response).await;
        }

        if tokens.is_none() {
            warn!(status = %response.status(), "Anonymous request rejected");
            return Ok(Completion::Unauthorized {
                attempt: Attempt::First,
                error: read_http_error(response).await,
            });
        }

        warn!(status = %response.status(), "Credentials rejected, refreshing session");

        let refreshed = match self.refresher.refresh().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Session could not be renewed");
                return Err(AuthError::SessionExpired.into());
            }
        };

        let response = self.send(request, Some(&refreshed), Attempt::Retry).await?;

        if is_auth_rejection(response.status()) {
            warn!(status = %response.status(), "Refreshed credentials rejected");
            return Ok(Completion::Unauthorized {
                attempt: Attempt::Retry,
                error: read_http_error(response).await,
            });
        }

        finish(response).await
    }

    async fn send(
        &self,
        request: &ApiRequest,
        tokens: Option<&TokenPair>,
        attempt: Attempt,
    ) -> Result<Response> {
        let headers = attach_credentials(request.headers(), tokens)?;
        debug!(%attempt, authenticated = tokens.is_some(), "Sending request");

        self.client
            .send(
                request.method().clone(),
                request.path(),
                headers,
                request.body(),
            )
            .await
    }
}

fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

async fn finish(response: Response) -> Result<Completion> {
    if response.status().is_success() {
        Ok(Completion::Success(response))
    } else {
        Err(read_http_error(response).await.into())
    }
}
