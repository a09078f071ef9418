//! scribe-file - Filesystem-backed token store.

mod store;

pub use store::{FileTokenStore, TOKEN_FILE};
