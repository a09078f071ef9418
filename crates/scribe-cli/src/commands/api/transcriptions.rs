//! Transcriptions command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use scribe_http::Transcription;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct TranscriptionsArgs {
    /// Fetch a single transcription instead of listing
    #[arg(long)]
    pub id: Option<String>,

    /// Print JSON, one transcription per line
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: TranscriptionsArgs, client: &ClientArgs) -> Result<()> {
    let session = session::open(client)?;

    if let Some(id) = &args.id {
        let transcription = session
            .get_transcription(id)
            .await
            .context("Failed to fetch transcription")?;
        return show(&transcription, args.json);
    }

    let Some(transcriptions) = session
        .list_transcriptions()
        .await
        .context("Failed to list transcriptions")?
    else {
        output::hint("Session refused after refresh. Run 'scribe auth login' to sign in again.");
        return Ok(());
    };

    if transcriptions.is_empty() {
        output::hint("No transcriptions found.");
        return Ok(());
    }

    for transcription in &transcriptions {
        if args.json {
            output::json(transcription, false)?;
        } else {
            println!(
                "{}  {}  {}",
                transcription.id,
                transcription.status.cyan(),
                transcription.video_url.as_deref().unwrap_or("-").dimmed()
            );
        }
    }

    Ok(())
}

fn show(transcription: &Transcription, json: bool) -> Result<()> {
    if json {
        return output::json(transcription, true);
    }

    output::field("ID", &transcription.id);
    output::field("Status", &transcription.status);
    if let Some(url) = &transcription.video_url {
        output::field("Video", url);
    }
    if let Some(language) = &transcription.language {
        output::field("Language", language);
    }
    if let Some(created_at) = &transcription.created_at {
        output::field("Created", &created_at.to_rfc3339());
    }
    if let Some(text) = &transcription.text {
        println!();
        println!("{}", text);
    }

    Ok(())
}
