//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::api::{ProfileArgs, RequestArgs, TranscribeArgs, TranscriptionsArgs};
use crate::commands::auth::AuthCommand;

/// Default base URL of the scribe API.
pub const DEFAULT_API_URL: &str = "https://api.vidscribe.app";

/// Command-line client for the scribe transcription API.
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version = env!("SCRIBE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to reach the API and where to keep tokens.
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Base URL of the scribe API
    #[arg(long, env = "SCRIBE_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "SCRIBE_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Token file (defaults to the per-user data directory)
    #[arg(long, env = "SCRIBE_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage stored credentials
    Auth(AuthCommand),

    /// Send a request through the authenticated pipeline
    Request(RequestArgs),

    /// Submit a video for transcription
    Transcribe(TranscribeArgs),

    /// List transcriptions, or fetch one by id
    Transcriptions(TranscriptionsArgs),

    /// Show the signed-in user's profile
    Profile(ProfileArgs),
}
