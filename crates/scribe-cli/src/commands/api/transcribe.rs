//! Transcribe command implementation.

use anyhow::{Context, Result};
use clap::Args;

use scribe_http::TranscriptionRequest;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct TranscribeArgs {
    /// Public URL of the video to transcribe
    pub video_url: String,

    /// Spoken language hint, e.g. "en"
    #[arg(long)]
    pub language: Option<String>,

    /// Print the created transcription as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: TranscribeArgs, client: &ClientArgs) -> Result<()> {
    let session = session::open(client)?;

    let mut request = TranscriptionRequest::new(args.video_url);
    if let Some(language) = args.language {
        request = request.with_language(language);
    }

    output::hint("Submitting video...");

    let transcription = session
        .submit_transcription(&request)
        .await
        .context("Failed to submit transcription")?;

    if args.json {
        return output::json(&transcription, false);
    }

    output::success("Transcription submitted");
    output::field("ID", &transcription.id);
    output::field("Status", &transcription.status);

    Ok(())
}
