//! Profile command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ProfileArgs, client: &ClientArgs) -> Result<()> {
    let session = session::open(client)?;

    let Some(profile) = session.profile().await.context("Failed to fetch profile")? else {
        output::hint("Session refused after refresh. Run 'scribe auth login' to sign in again.");
        return Ok(());
    };

    if args.json {
        return output::json(&profile, true);
    }

    output::field("ID", &profile.id);
    output::field("Email", &profile.email);
    if let Some(name) = &profile.name {
        output::field("Name", name);
    }
    if let Some(plan) = &profile.plan {
        output::field("Plan", plan);
    }
    if let Some(minutes) = profile.minutes_remaining {
        output::field("Minutes left", &minutes.to_string());
    }

    Ok(())
}
