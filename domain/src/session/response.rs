//! LLM response types for tool-calling requests.
//!
//! A backend response exposes zero or more proposed tool invocations, in the
//! order the backend returned them, plus optional free-text content.
//!
//! ```text
//! backend → LlmResponse { tool_calls: [ProposedToolCall..], content: Option<String> }
//!                               │
//!                               └─ arguments: ToolArguments (Mapping | Encoded)
//! ```

use crate::tool::arguments::ToolArguments;
use serde::{Deserialize, Deserializer, Serialize};

/// A tool invocation proposed by the backend.
///
/// The argument payload is kept in its wire shape; the
/// [`ResponseParser`](crate::ResponseParser) normalizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedToolCall {
    /// Backend-assigned call ID, when the API provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the tool the backend wants to call.
    pub name: String,
    /// Argument payload as returned (mapping or JSON-encoded string).
    /// A missing or `null` payload is an empty mapping.
    #[serde(default, deserialize_with = "null_as_empty_mapping")]
    pub arguments: ToolArguments,
}

fn null_as_empty_mapping<'de, D>(deserializer: D) -> Result<ToolArguments, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ToolArguments>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProposedToolCall {
    pub fn new(name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A response from the backend for one request.
///
/// # Examples
///
/// ```
/// use structcall_domain::{LlmResponse, ProposedToolCall, ToolArguments};
///
/// let response = LlmResponse::from_text("42");
/// assert_eq!(response.text(), Some("42"));
/// assert!(!response.has_tool_calls());
///
/// let response = LlmResponse::default()
///     .with_tool_call(ProposedToolCall::new(
///         "sum_tool",
///         ToolArguments::Encoded(r#"{"a":2,"b":3}"#.to_string()),
///     ));
/// assert!(response.has_tool_calls());
/// assert_eq!(response.tool_calls[0].name, "sum_tool");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Proposed tool invocations, in backend order.
    #[serde(default)]
    pub tool_calls: Vec<ProposedToolCall>,
    /// Free-text content, if any.
    #[serde(default)]
    pub content: Option<String>,
    /// Model identifier (if returned by the API).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            tool_calls: Vec::new(),
            content: Some(text.into()),
            model: None,
        }
    }

    pub fn with_tool_call(mut self, call: ProposedToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Free-text content, ignoring empty or whitespace-only text.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// Raw content exactly as returned, empty when absent.
    pub fn raw_text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
