//! LLM Gateway port
//!
//! Defines the interface for the text-generation backend. The backend is a
//! black box: a conversation (plus optional tools and tool choice) goes in,
//! an [`LlmResponse`] comes out, or a transport-level failure is raised.

use async_trait::async_trait;
use structcall_domain::{Conversation, LlmResponse, ToolChoice, ToolSet};
use thiserror::Error;

/// Transport-level failures from the backend.
///
/// Every variant is retryable from the engine's point of view.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One request to the backend.
///
/// Borrowed so that every retry sends the exact same conversation and tool
/// set without copying them.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub conversation: &'a Conversation,
    /// Tools offered to the backend; `None` for a plain text request.
    pub tools: Option<&'a ToolSet>,
    /// How the backend should use `tools`; ignored when `tools` is `None`.
    pub tool_choice: &'a ToolChoice,
}

impl<'a> CompletionRequest<'a> {
    /// A plain text request without tools.
    pub fn text(conversation: &'a Conversation) -> Self {
        Self {
            conversation,
            tools: None,
            tool_choice: &ToolChoice::Auto,
        }
    }

    pub fn with_tools(
        conversation: &'a Conversation,
        tools: &'a ToolSet,
        tool_choice: &'a ToolChoice,
    ) -> Self {
        Self {
            conversation,
            tools: Some(tools),
            tool_choice,
        }
    }

    /// Tools actually offered, treating an empty set as none.
    pub fn offered_tools(&self) -> Option<&'a ToolSet> {
        self.tools.filter(|tools| !tools.is_empty())
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the backend.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Short backend identifier for logs (e.g. `ollama/llama3.1`).
    fn describe(&self) -> String;

    /// Send one request and wait for the complete response.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<LlmResponse, GatewayError>;
}
