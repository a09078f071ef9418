//! Refresh command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, client: &ClientArgs) -> Result<()> {
    let session = session::open(client)?;

    if !session.is_authenticated() {
        bail!("No stored session. Run 'scribe auth login' first.");
    }

    output::hint("Refreshing session...");

    session
        .refresh()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed");

    Ok(())
}
