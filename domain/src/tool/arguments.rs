//! Tool-call argument payloads.
//!
//! Backends disagree on how tool arguments travel: Ollama returns a JSON
//! object, OpenAI-compatible servers return a JSON-encoded string. The payload
//! is decoded into an explicit variant at the boundary so the parser can
//! branch on the shape instead of inspecting values at run time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Argument payload of a proposed tool call, as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArguments {
    /// Already a structured mapping.
    Mapping(Map<String, Value>),
    /// A JSON document encoded as a string.
    Encoded(String),
    /// Any other JSON value (array, number, null...).
    Other(Value),
}

impl Default for ToolArguments {
    fn default() -> Self {
        ToolArguments::Mapping(Map::new())
    }
}

impl ToolArguments {
    pub fn kind(&self) -> &'static str {
        match self {
            ToolArguments::Mapping(_) => "mapping",
            ToolArguments::Encoded(_) => "string",
            ToolArguments::Other(value) => json_kind(value),
        }
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(map: Map<String, Value>) -> Self {
        ToolArguments::Mapping(map)
    }
}

impl From<Value> for ToolArguments {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => ToolArguments::Mapping(map),
            Value::String(s) => ToolArguments::Encoded(s),
            other => ToolArguments::Other(other),
        }
    }
}

/// The backend returned a tool-call payload that is not a usable mapping.
///
/// This is a contract violation by the backend and is never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse arguments for tool '{tool}': {reason}")]
pub struct ArgumentParseError {
    pub tool: String,
    pub reason: String,
}

impl ArgumentParseError {
    pub fn new(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
