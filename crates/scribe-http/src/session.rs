//! Client session bundling configuration, token store and executor.

use std::sync::Arc;

use reqwest::Response;
use tracing::{info, instrument};

use scribe_core::{ApiUrl, Result, TokenPair, TokenStore};

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::executor::RequestExecutor;
use crate::request::ApiRequest;

/// A client session against the scribe API.
///
/// Sessions are cheap to clone (they use internal `Arc`) and are safe to
/// share across tasks. The token pair itself lives only in the injected
/// [`TokenStore`]; the session never caches it.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use scribe_core::{ApiUrl, MemoryTokenStore};
/// use scribe_http::{ClientConfig, Session};
///
/// # async fn example() -> Result<(), scribe_core::Error> {
/// let config = ClientConfig::new(ApiUrl::new("https://api.vidscribe.app")?);
/// let session = Session::new(config, Arc::new(MemoryTokenStore::new()))?;
///
/// if let Some(profile) = session.profile().await? {
///     println!("Signed in as {}", profile.email);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    executor: RequestExecutor,
}

impl Session {
    /// Create a session for the API in `config`, keeping tokens in `store`.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let executor = RequestExecutor::new(&config, store.clone())?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                store,
                executor,
            }),
        })
    }

    /// Returns the API base URL.
    pub fn api_url(&self) -> &ApiUrl {
        self.inner.config.base_url()
    }

    /// Returns the configuration this session was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the executor behind this session.
    pub fn executor(&self) -> &RequestExecutor {
        &self.inner.executor
    }

    pub(crate) fn client(&self) -> &HttpClient {
        self.inner.executor.client()
    }

    /// Persist a token pair issued by the identity provider.
    #[instrument(skip(self, pair), fields(api = %self.api_url()))]
    pub fn login(&self, pair: &TokenPair) -> Result<()> {
        info!("Storing session tokens");
        self.inner.store.write(pair)
    }

    /// Forget the stored token pair. Logging out twice is a no-op.
    #[instrument(skip(self), fields(api = %self.api_url()))]
    pub fn logout(&self) -> Result<()> {
        info!("Clearing session tokens");
        self.inner.store.clear()
    }

    /// Returns true if a token pair is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.inner.store.read().is_some()
    }

    /// Force a refresh of the stored token pair.
    ///
    /// # Errors
    ///
    /// Returns [`scribe_core::error::AuthError::RefreshFailed`] if the
    /// refresh token is missing or rejected; the store is cleared.
    pub async fn refresh(&self) -> Result<()> {
        self.inner.executor.refresher().refresh().await?;
        Ok(())
    }

    /// Execute a request through the authenticated pipeline.
    ///
    /// See [`RequestExecutor::execute`].
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        self.inner.executor.execute(request).await
    }

    /// Execute a request, returning `None` if the retry after a refresh gets a 401.
    ///
    /// See [`RequestExecutor::execute_tolerant`].
    pub async fn execute_tolerant(&self, request: &ApiRequest) -> Result<Option<Response>> {
        self.inner.executor.execute_tolerant(request).await
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.inner.config.base_url())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
