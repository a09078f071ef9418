//! Error types for the scribe client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, HTTP status, storage and input validation
//! errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for scribe operations.
///
/// Callers of the request pipeline normally only need to distinguish
/// [`AuthError::SessionExpired`] (send the user to the login surface)
/// from everything else (report a generic failure).
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, malformed body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (refresh failed, session expired).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A non-2xx response passed through to the caller unchanged.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// Token persistence errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (base URL, request path, header values).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if the caller should send the user back to login.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::Auth(AuthError::SessionExpired))
    }

    /// Returns the HTTP status carried by a passthrough error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Transport-level errors.
///
/// These are never interpreted as authentication failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// A successful response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The refresh token was missing, expired, or rejected.
    ///
    /// The token store has been cleared by the time this is returned.
    #[error("token refresh failed: {reason}")]
    RefreshFailed { reason: String },

    /// An authenticated call was rejected and the session could not be renewed.
    #[error("session expired")]
    SessionExpired,
}

/// A non-2xx HTTP response, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl HttpError {
    /// Create a new HTTP error.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

/// Token persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Token pair could not be encoded.
    #[error("serialization failed: {message}")]
    Serialization { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid request path.
    #[error("invalid request path '{value}': {reason}")]
    Path { value: String, reason: String },

    /// Invalid HTTP method.
    #[error("invalid HTTP method '{value}'")]
    Method { value: String },

    /// A value could not be placed in a request header.
    #[error("invalid value for header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
