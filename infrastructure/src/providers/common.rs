//! Pieces shared by the HTTP backends.

use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use structcall_application::ports::llm_gateway::GatewayError;
use structcall_domain::Message;
use structcall_domain::util::preview;

/// Chat message as both chat APIs expect it.
#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))
}

/// Classify a `reqwest` send failure.
pub(crate) fn send_error(backend: &str, url: &str, e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(format!("failed to reach {} at {}: {}", backend, url, e))
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

/// Turn a non-2xx status into `RequestFailed` with a body excerpt.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::RequestFailed(format!(
        "HTTP {}: {}",
        status,
        preview(&body, 300)
    )))
}

/// Join a base URL and an API path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
