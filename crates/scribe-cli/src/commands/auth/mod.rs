//! Credential management subcommands.

mod login;
mod logout;
mod refresh;
mod status;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::ClientArgs;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store a token pair issued by the identity provider
    Login(login::LoginArgs),

    /// Forget the stored token pair
    Logout(logout::LogoutArgs),

    /// Show whether a token pair is stored
    Status(status::StatusArgs),

    /// Exchange the refresh token for a new pair
    Refresh(refresh::RefreshArgs),
}

pub async fn handle(cmd: AuthCommand, client: &ClientArgs) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, client).await,
        AuthSubcommand::Logout(args) => logout::run(args, client).await,
        AuthSubcommand::Status(args) => status::run(args, client).await,
        AuthSubcommand::Refresh(args) => refresh::run(args, client).await,
    }
}
