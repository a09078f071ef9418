//! Status command implementation.

use anyhow::Result;
use chrono::Local;
use clap::Args;

use scribe_core::TokenStore;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub async fn run(_args: StatusArgs, client: &ClientArgs) -> Result<()> {
    let store = session::token_store(client)?;
    let path = store.path().display().to_string();

    if store.read().is_none() {
        output::hint("Not logged in. Run 'scribe auth login' first.");
        output::field("Token file", &path);
        return Ok(());
    }

    output::success("Logged in");
    output::field("Token file", &path);
    if let Some(saved_at) = store.saved_at() {
        output::field(
            "Saved at",
            &saved_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        );
    }

    Ok(())
}
