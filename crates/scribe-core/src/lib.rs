//! scribe-core - Core types for the scribe API client.
//!
//! This crate holds the pieces shared by every part of the authenticated
//! request pipeline: the [`TokenPair`] credential, the [`TokenStore`]
//! contract that owns it, the validated [`ApiUrl`], and the unified
//! [`Error`] taxonomy.
//!
//! # Example
//!
//! ```
//! use scribe_core::{MemoryTokenStore, TokenPair, TokenStore};
//!
//! let store = MemoryTokenStore::new();
//! store.write(&TokenPair::new("A1", "R1")).unwrap();
//!
//! let pair = store.read().unwrap();
//! assert_eq!(pair.access_token().as_str(), "A1");
//! ```

pub mod error;
pub mod memory;
pub mod tokens;
pub mod traits;
pub mod types;

pub use error::Error;
pub use memory::MemoryTokenStore;
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::TokenStore;
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
