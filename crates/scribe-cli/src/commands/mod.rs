//! Subcommand dispatch.

pub mod api;
pub mod auth;

use anyhow::Result;

use crate::cli::{Cli, Commands};

pub async fn handle(cli: Cli) -> Result<()> {
    let client = &cli.client;

    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, client).await,
        Commands::Request(args) => api::request::run(args, client).await,
        Commands::Transcribe(args) => api::transcribe::run(args, client).await,
        Commands::Transcriptions(args) => api::transcriptions::run(args, client).await,
        Commands::Profile(args) => api::profile::run(args, client).await,
    }
}
