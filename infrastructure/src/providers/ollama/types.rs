//! Wire types for Ollama's native `/api/chat` endpoint.
//!
//! Ollama has no `tool_choice` field. A specific-tool choice is expressed by
//! advertising only that tool; `required` and `auto` both send the full set
//! and leave enforcement to the engine.

use crate::providers::common::WireMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use structcall_application::ports::llm_gateway::CompletionRequest;
use structcall_domain::{LlmResponse, ProposedToolCall, ToolArguments};

#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatOptions {
    pub temperature: f32,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, temperature: f32, request: &CompletionRequest<'a>) -> Self {
        let tools = request
            .offered_tools()
            .map(|tools| {
                let specific = request.tool_choice.tool_name();
                tools
                    .iter()
                    .filter(|tool| specific.is_none_or(|name| tool.name == name))
                    .map(|tool| tool.to_function_schema())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            model,
            messages: request.conversation.iter().map(WireMessage::from).collect(),
            tools,
            stream: false,
            options: ChatOptions { temperature },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ResponseToolCall>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponseToolCall {
    pub function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponseFunction {
    pub name: String,
    /// Usually an object; `null` or absent is read as an empty mapping.
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl From<ChatResponse> for LlmResponse {
    fn from(response: ChatResponse) -> Self {
        LlmResponse {
            tool_calls: response
                .message
                .tool_calls
                .into_iter()
                .map(|call| {
                    ProposedToolCall::new(
                        call.function.name,
                        call.function
                            .arguments
                            .map(ToolArguments::from)
                            .unwrap_or_default(),
                    )
                })
                .collect(),
            content: response.message.content,
            model: response.model,
        }
    }
}
