//! scribe - command-line client for the scribe transcription API.
//!
//! Every API call goes through the library's authenticated pipeline, so an
//! expired access token is refreshed and the call retried transparently.

mod cli;
mod commands;
mod output;
mod session;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;

/// Exit code used when the user has to sign in again.
const EXIT_LOGIN_REQUIRED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match commands::handle(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &anyhow::Error) -> ExitCode {
    if needs_login(err) {
        output::error("Your session has expired.");
        output::hint("Run 'scribe auth login' to sign in again.");
        return ExitCode::from(EXIT_LOGIN_REQUIRED);
    }

    output::error(&format!("{:#}", err));
    ExitCode::FAILURE
}

/// True if any cause in the chain is an authentication failure.
fn needs_login(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<scribe_core::Error>(),
            Some(scribe_core::Error::Auth(_))
        )
    })
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
