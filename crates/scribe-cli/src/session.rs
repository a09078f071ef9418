//! Building an API session from command-line options.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use scribe_core::ApiUrl;
use scribe_file::{FileTokenStore, TOKEN_FILE};
use scribe_http::{ClientConfig, Session};

use crate::cli::ClientArgs;

/// Resolve the token file: the explicit option, else the per-user data dir.
pub fn token_path(args: &ClientArgs) -> Result<PathBuf> {
    if let Some(path) = &args.token_file {
        return Ok(path.clone());
    }

    let dirs =
        ProjectDirs::from("", "", "scribe").context("Could not determine data directory")?;

    Ok(dirs.data_dir().join(TOKEN_FILE))
}

/// Open the on-disk token store.
pub fn token_store(args: &ClientArgs) -> Result<FileTokenStore> {
    Ok(FileTokenStore::new(token_path(args)?))
}

/// Build a session against the configured API, backed by the token file.
pub fn open(args: &ClientArgs) -> Result<Session> {
    let api_url = ApiUrl::new(&args.api_url).context("Invalid API URL")?;
    let config = ClientConfig::new(api_url)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_user_agent(format!("scribe/{}", env!("SCRIBE_VERSION")));

    let store = token_store(args)?;
    debug!(token_file = %store.path().display(), api = %config.base_url(), "Opening session");

    Session::new(config, Arc::new(store)).context("Failed to create API client")
}
