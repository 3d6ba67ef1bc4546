//! One backend round trip inside an invocation.
//!
//! Attempts only live for the duration of one invocation call. They borrow
//! the conversation and tool set that were sent, so observers can inspect
//! exactly what went out without anything being copied or persisted.

use crate::session::conversation::Conversation;
use crate::session::response::LlmResponse;
use crate::tool::entities::ToolSet;
use serde::Serialize;

/// Outcome tag of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The backend proposed at least one tool call.
    ToolCallFound,
    /// No tool call, but `auto` mode accepted the free-text answer.
    TextFallback,
    /// No qualifying tool call; the invocation will retry if it can.
    NoToolCall,
    /// The backend call itself failed.
    TransportError,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::ToolCallFound => "tool_call_found",
            AttemptOutcome::TextFallback => "text_fallback",
            AttemptOutcome::NoToolCall => "no_tool_call",
            AttemptOutcome::TransportError => "transport_error",
        }
    }

    /// Whether this outcome ends the retry loop successfully.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::ToolCallFound | AttemptOutcome::TextFallback
        )
    }
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single attempt: what was sent, what came back, and how it was judged.
#[derive(Debug, Clone)]
pub struct InvocationAttempt<'a> {
    /// 1-based attempt number.
    pub ordinal: u32,
    /// Upper bound on attempts for this invocation.
    pub max_attempts: u32,
    pub conversation: &'a Conversation,
    pub tools: Option<&'a ToolSet>,
    /// Raw backend response; absent for transport errors.
    pub response: Option<&'a LlmResponse>,
    pub outcome: AttemptOutcome,
    /// Transport error message, when `outcome` is `TransportError`.
    pub error: Option<String>,
}

impl<'a> InvocationAttempt<'a> {
    pub fn answered(
        ordinal: u32,
        max_attempts: u32,
        conversation: &'a Conversation,
        tools: Option<&'a ToolSet>,
        response: &'a LlmResponse,
        outcome: AttemptOutcome,
    ) -> Self {
        Self {
            ordinal,
            max_attempts,
            conversation,
            tools,
            response: Some(response),
            outcome,
            error: None,
        }
    }

    pub fn failed(
        ordinal: u32,
        max_attempts: u32,
        conversation: &'a Conversation,
        tools: Option<&'a ToolSet>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            ordinal,
            max_attempts,
            conversation,
            tools,
            response: None,
            outcome: AttemptOutcome::TransportError,
            error: Some(error.into()),
        }
    }

    pub fn is_last(&self) -> bool {
        self.ordinal >= self.max_attempts
    }

    /// Name of the first proposed tool call, if any.
    pub fn tool_name(&self) -> Option<&'a str> {
        self.response
            .and_then(|r| r.tool_calls.first())
            .map(|c| c.name.as_str())
    }
}
