//! Ollama chat gateway.

use super::types::{ChatRequest, ChatResponse};
use crate::providers::common::{build_client, endpoint, ensure_success, send_error};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use structcall_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use structcall_domain::LlmResponse;
use tracing::debug;

/// Default local Ollama address. IPv4 loopback avoids `localhost`
/// resolving to `::1` when Ollama only listens on IPv4.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// [`LlmGateway`] backed by Ollama's native `/api/chat` endpoint.
pub struct OllamaGateway {
    client: Client,
    url: String,
    model: String,
    temperature: f32,
}

impl OllamaGateway {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: endpoint(base_url, "api/chat"),
            model: model.into(),
            temperature,
        })
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    fn describe(&self) -> String {
        format!("ollama/{}", self.model)
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let body = ChatRequest::new(&self.model, self.temperature, &request);
        debug!(
            url = %self.url,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "Sending Ollama chat request"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error("ollama", &self.url, e))?;
        let response = ensure_success(response).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(parsed.into())
    }
}
