//! Raw request command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use scribe_http::{ApiRequest, Response};

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path under the API base URL, e.g. /api/user/profile
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub body: Option<String>,

    /// Print nothing if the refreshed session is still refused with 401
    #[arg(long)]
    pub tolerant: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: RequestArgs, client: &ClientArgs) -> Result<()> {
    let mut request =
        ApiRequest::from_parts(&args.method, args.path.as_str()).context("Invalid request")?;

    if let Some(body) = &args.body {
        let value: Value = serde_json::from_str(body).context("Request body is not valid JSON")?;
        request = request.json(&value)?;
    }

    let session = session::open(client)?;

    let response = if args.tolerant {
        match session.execute_tolerant(&request).await? {
            Some(response) => response,
            None => {
                output::hint("Renewed session was not accepted; nothing to show.");
                return Ok(());
            }
        }
    } else {
        session.execute(&request).await.context("Request failed")?
    };

    print_body(response, args.pretty).await
}

/// Print the response body as JSON when it parses, verbatim otherwise.
async fn print_body(response: Response, pretty: bool) -> Result<()> {
    let text = response
        .text()
        .await
        .context("Failed to read response body")?;

    if text.is_empty() {
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => output::json(&value, pretty),
        Err(_) => {
            println!("{}", text);
            Ok(())
        }
    }
}
