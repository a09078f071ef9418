//! Bearer credential attachment.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use scribe_core::error::InvalidInputError;
use scribe_core::{Result, TokenPair};

/// Build the headers for one outgoing request.
///
/// Starts from `base` and, when `tokens` is present, sets
/// `Authorization: Bearer <access token>`. Without tokens the request goes
/// out anonymously. Any `Authorization` header already in `base` is
/// dropped so the header appears at most once.
///
/// Pure: no I/O, no token store access.
pub fn attach_credentials(base: &HeaderMap, tokens: Option<&TokenPair>) -> Result<HeaderMap> {
    let mut headers = base.clone();
    headers.remove(AUTHORIZATION);

    if let Some(pair) = tokens {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", pair.access_token().as_str()))
            .map_err(|e| InvalidInputError::Header {
                name: AUTHORIZATION.to_string(),
                reason: e.to_string(),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
