//! Port for structured conversation logging.
//!
//! Records what every invocation sent and how each attempt was judged, as
//! machine-readable events (one JSONL line each in the file adapter).
//! `tracing` stays the human-readable diagnostic channel; this port is the
//! transcript.

use serde_json::{Value, json};
use structcall_domain::{Conversation, InvocationAttempt, ToolSet};

/// Event type names emitted by the invocation engine.
pub mod event_types {
    pub const INVOCATION_STARTED: &str = "invocation_started";
    pub const LLM_REQUEST: &str = "llm_request";
    pub const ATTEMPT_OUTCOME: &str = "attempt_outcome";
    pub const INVOCATION_FINISHED: &str = "invocation_finished";
}

/// A structured conversation event.
///
/// The writer adds `type` and `timestamp` when the event is recorded.
pub struct ConversationEvent {
    /// One of [`event_types`].
    pub event_type: &'static str,
    /// Event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// The request sent on one attempt: full message list plus tool names.
    pub fn llm_request(
        ordinal: u32,
        conversation: &Conversation,
        tools: Option<&ToolSet>,
    ) -> Self {
        Self::new(
            event_types::LLM_REQUEST,
            json!({
                "attempt": ordinal,
                "messages": conversation,
                "tools": tools
                    .map(|tools| tools.names().collect::<Vec<_>>())
                    .unwrap_or_default(),
            }),
        )
    }

    /// How one attempt was judged, with the raw backend response.
    pub fn attempt_outcome(attempt: &InvocationAttempt<'_>) -> Self {
        Self::new(
            event_types::ATTEMPT_OUTCOME,
            json!({
                "attempt": attempt.ordinal,
                "max_attempts": attempt.max_attempts,
                "outcome": attempt.outcome,
                "tool": attempt.tool_name(),
                "response": attempt.response,
                "error": attempt.error,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible: a failing writer must never abort
/// an invocation, so implementations swallow their own I/O errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
