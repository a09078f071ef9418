//! Login command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use scribe_core::TokenPair;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Access token issued by the identity provider
    #[arg(long, env = "SCRIBE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Refresh token issued by the identity provider
    #[arg(long, env = "SCRIBE_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: String,
}

pub async fn run(args: LoginArgs, client: &ClientArgs) -> Result<()> {
    if args.access_token.trim().is_empty() || args.refresh_token.trim().is_empty() {
        bail!("Both --access-token and --refresh-token must be non-empty");
    }

    let session = session::open(client)?;
    let pair = TokenPair::new(args.access_token, args.refresh_token);

    session.login(&pair).context("Failed to store tokens")?;

    output::success("Logged in");
    output::field("API", session.api_url().as_str());
    output::field("Token file", &session::token_path(client)?.display().to_string());

    Ok(())
}
