//! Wire types for OpenAI-compatible `/v1/chat/completions`.
//!
//! Tool arguments arrive as JSON-encoded strings here, which is the case
//! the response parser's string recovery exists for.

use crate::providers::common::WireMessage;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use structcall_application::ports::llm_gateway::CompletionRequest;
use structcall_domain::{LlmResponse, ProposedToolCall, ToolArguments, ToolChoice};

#[derive(Debug, Serialize)]
pub(super) struct CompletionBody<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
}

impl<'a> CompletionBody<'a> {
    pub fn new(model: &'a str, temperature: f32, request: &CompletionRequest<'a>) -> Self {
        let offered = request.offered_tools();
        Self {
            model,
            messages: request.conversation.iter().map(WireMessage::from).collect(),
            temperature,
            tools: offered
                .map(|tools| tools.iter().map(|t| t.to_function_schema()).collect())
                .unwrap_or_default(),
            tool_choice: offered.map(|_| tool_choice_value(request.tool_choice)),
        }
    }
}

fn tool_choice_value(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Required => json!("required"),
        ToolChoice::Auto => json!("auto"),
        ToolChoice::Tool(name) => json!({"type": "function", "function": {"name": name}}),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ChoiceToolCall>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: ChoiceFunction,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl CompletionResponse {
    /// The first choice as a domain response; `None` when there are no choices.
    pub fn into_llm_response(self) -> Option<LlmResponse> {
        let choice = self.choices.into_iter().next()?;
        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let arguments = call
                    .function
                    .arguments
                    .map(ToolArguments::from)
                    .unwrap_or_default();
                let proposed = ProposedToolCall::new(call.function.name, arguments);
                match call.id {
                    Some(id) => proposed.with_id(id),
                    None => proposed,
                }
            })
            .collect();

        Some(LlmResponse {
            tool_calls,
            content: choice.message.content,
            model: self.model,
        })
    }
}
