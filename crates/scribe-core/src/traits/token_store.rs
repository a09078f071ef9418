//! Token store trait.

use std::fmt::Debug;

use crate::{Result, TokenPair};

/// Durable holder of the current [`TokenPair`].
///
/// The store is the only writer of the persisted pair. Every other
/// component reads a fresh copy per call and never caches it, since a
/// concurrent refresh may replace it at any time. Concurrent writers are
/// not coordinated: the last write wins.
pub trait TokenStore: Send + Sync + Debug {
    /// Returns the stored pair, or `None` if there is none.
    ///
    /// Never fails. Unreadable or corrupt persisted data is cleared and
    /// reported as absent.
    fn read(&self) -> Option<TokenPair>;

    /// Replace the stored pair.
    ///
    /// Readers observe either the previous pair or the new one, never a mix.
    fn write(&self, pair: &TokenPair) -> Result<()>;

    /// Remove the stored pair. Clearing an empty store is a no-op.
    fn clear(&self) -> Result<()>;
}
