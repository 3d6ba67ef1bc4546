//! OpenAI-compatible chat completions gateway.
//!
//! Works with api.openai.com and with local servers exposing the same API
//! (vLLM, llama.cpp server, Ollama's `/v1` endpoint).

use super::types::{CompletionBody, CompletionResponse};
use crate::providers::common::{build_client, endpoint, ensure_success, send_error};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use structcall_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use structcall_domain::LlmResponse;
use tracing::debug;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// [`LlmGateway`] backed by an OpenAI-compatible chat completions API.
pub struct OpenAiGateway {
    client: Client,
    url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl OpenAiGateway {
    /// `base_url` may include the `/v1` prefix or not.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        temperature: f32,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let base = base_url.trim_end_matches('/');
        let path = if base.ends_with("/v1") {
            "chat/completions"
        } else {
            "v1/chat/completions"
        };
        Ok(Self {
            client: build_client(timeout)?,
            url: endpoint(base, path),
            model: model.into(),
            temperature,
            api_key,
        })
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn describe(&self) -> String {
        format!("openai/{}", self.model)
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let body = CompletionBody::new(&self.model, self.temperature, &request);
        debug!(
            url = %self.url,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "Sending chat completion request"
        );

        let mut builder = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| send_error("openai", &self.url, e))?;
        let response = ensure_success(response).await?;

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        parsed
            .into_llm_response()
            .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".to_string()))
    }
}
