//! Request helpers shared by the collectors.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::SignalError;

/// Send a request, require a 2xx status, and return the body as text.
///
/// # Errors
///
/// Returns [`SignalError::Http`] on network failure or
/// [`SignalError::UnexpectedStatus`] on a non-2xx response.
pub(super) async fn send_text(request: RequestBuilder) -> Result<String, SignalError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SignalError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Like [`send_text`], then parse the body as JSON.
///
/// # Errors
///
/// As [`send_text`], plus [`SignalError::Deserialize`] if the body does not
/// match `T`.
pub(super) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    context: &str,
) -> Result<T, SignalError> {
    let body = send_text(request).await?;
    parse_json(&body, context)
}

pub(super) fn parse_json<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, SignalError> {
    serde_json::from_str(body).map_err(|e| SignalError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
