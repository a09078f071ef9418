//! scribe-http - Authenticated request pipeline for the scribe API.
//!
//! Every authenticated call goes through a [`Session`]: the current
//! [`TokenPair`](scribe_core::TokenPair) is read from the injected
//! [`TokenStore`](scribe_core::TokenStore), attached as a bearer token, and
//! a 401/403 answer triggers one refresh followed by exactly one retry.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use scribe_core::{ApiUrl, MemoryTokenStore, TokenPair};
//! use scribe_http::{ApiRequest, ClientConfig, Session};
//!
//! # async fn example() -> Result<(), scribe_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("https://api.vidscribe.app")?);
//! let session = Session::new(config, Arc::new(MemoryTokenStore::new()))?;
//! session.login(&TokenPair::new("access", "refresh"))?;
//!
//! match session.execute(&ApiRequest::get("/api/user/profile")?).await {
//!     Ok(response) => println!("{}", response.status()),
//!     Err(e) if e.is_session_expired() => println!("please log in again"),
//!     Err(e) => println!("request failed: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod credentials;
mod executor;
mod refresh;
mod request;
mod session;

pub use api::{
    PROFILE_PATH, TRANSCRIPTIONS_PATH, Transcription, TranscriptionRequest, UserProfile,
};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use credentials::attach_credentials;
pub use executor::RequestExecutor;
pub use refresh::{REFRESH_PATH, RefreshCoordinator};
pub use request::ApiRequest;
pub use session::Session;

pub use reqwest::{Method, Response, StatusCode};
