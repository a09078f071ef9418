//! In-process token store.

use std::sync::{PoisonError, RwLock};

use tracing::trace;

use crate::{Result, TokenPair, TokenStore};

/// A [`TokenStore`] that keeps the pair in memory.
///
/// Nothing survives the process. Useful for short-lived tools and as a
/// fake in tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `pair`.
    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            slot: RwLock::new(Some(pair)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Option<TokenPair> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, pair: &TokenPair) -> Result<()> {
        trace!("Storing token pair in memory");
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(pair.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        trace!("Clearing in-memory token pair");
        self.slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}
