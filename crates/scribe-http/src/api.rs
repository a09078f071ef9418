//! Typed endpoints of the transcription service.
//!
//! Each call goes through the session's executor. Read paths use the
//! tolerant entry point and return `None` when the service still refuses
//! the session after a successful refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use scribe_core::Result;
use scribe_core::error::InvalidInputError;

use crate::request::ApiRequest;
use crate::session::Session;

/// Collection path for transcriptions.
pub const TRANSCRIPTIONS_PATH: &str = "/api/transcriptions";

/// Path of the signed-in user's profile.
pub const PROFILE_PATH: &str = "/api/user/profile";

/// Request body for submitting a video for transcription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionRequest {
    /// Public URL of the video to transcribe.
    pub video_url: String,
    /// Spoken language hint (e.g. "en"); detected by the service if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TranscriptionRequest {
    /// Create a request for `video_url` with no language hint.
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            language: None,
        }
    }

    /// Set the spoken language hint.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A transcription job and, once finished, its text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub minutes_remaining: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ListTranscriptionsResponse {
    transcriptions: Vec<Transcription>,
}

impl Session {
    /// Submit a video for transcription.
    #[instrument(skip(self, request), fields(api = %self.api_url()))]
    pub async fn submit_transcription(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Transcription> {
        debug!(video_url = %request.video_url, "Submitting transcription");

        let api_request = ApiRequest::post(TRANSCRIPTIONS_PATH)?.json(request)?;
        let response = self.execute(&api_request).await?;

        self.client().decode_json(response).await
    }

    /// List the user's transcriptions, or `None` if the renewed session is refused.
    #[instrument(skip(self), fields(api = %self.api_url()))]
    pub async fn list_transcriptions(&self) -> Result<Option<Vec<Transcription>>> {
        debug!("Listing transcriptions");

        let Some(response) = self
            .execute_tolerant(&ApiRequest::get(TRANSCRIPTIONS_PATH)?)
            .await?
        else {
            return Ok(None);
        };

        let body: ListTranscriptionsResponse = self.client().decode_json(response).await?;
        Ok(Some(body.transcriptions))
    }

    /// Fetch one transcription by id.
    #[instrument(skip(self), fields(api = %self.api_url()))]
    pub async fn get_transcription(&self, id: &str) -> Result<Transcription> {
        debug!("Getting transcription");

        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(InvalidInputError::Other {
                message: format!("invalid transcription id '{}'", id),
            }
            .into());
        }

        let request = ApiRequest::get(format!("{}/{}", TRANSCRIPTIONS_PATH, id))?;
        let response = self.execute(&request).await?;

        self.client().decode_json(response).await
    }

    /// Fetch the user's profile, or `None` if the renewed session is refused.
    #[instrument(skip(self), fields(api = %self.api_url()))]
    pub async fn profile(&self) -> Result<Option<UserProfile>> {
        debug!("Getting profile");

        match self
            .execute_tolerant(&ApiRequest::get(PROFILE_PATH)?)
            .await?
        {
            Some(response) => Ok(Some(self.client().decode_json(response).await?)),
            None => Ok(None),
        }
    }
}
