//! Shared reqwest plumbing for the HTTP providers

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::provider::LlmError;

/// Client with a whole-request timeout; falls back to a default client if the
/// builder rejects the settings
pub(crate) fn client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "HTTP client builder failed, using defaults");
            reqwest::Client::new()
        })
}

pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout(timeout)
    } else {
        LlmError::ConnectionFailed(err.to_string())
    }
}

/// Map a non-2xx status to the matching error
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> LlmError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        LlmError::RateLimited
    } else {
        let body: String = body.chars().take(200).collect();
        LlmError::RequestFailed(format!("Status: {}, Body: {}", status, body))
    }
}

/// Send `body` as JSON and decode a JSON reply, mapping every failure to [`LlmError`]
pub(crate) async fn send_json<B, R>(
    request: reqwest::RequestBuilder,
    body: &B,
    timeout: Duration,
) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(status_error(status, &text));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))
}
