//! Tool choice policy.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Governs what the backend is asked to do with the tool set, and how an
/// empty tool-call result is interpreted.
///
/// Serialized as a plain string: `"required"`, `"auto"`, or a tool name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ToolChoice {
    /// The backend must invoke some tool.
    #[default]
    Required,
    /// The backend may answer in free text or invoke a tool.
    Auto,
    /// The backend must invoke exactly this tool.
    Tool(String),
}

impl ToolChoice {
    pub fn tool(name: impl Into<String>) -> Self {
        ToolChoice::Tool(name.into())
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, ToolChoice::Auto)
    }

    /// Whether a response without a tool call fails this attempt.
    pub fn requires_tool_call(&self) -> bool {
        !self.is_auto()
    }

    /// The specific tool name, for [`ToolChoice::Tool`].
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            ToolChoice::Tool(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ToolChoice::Required => "required",
            ToolChoice::Auto => "auto",
            ToolChoice::Tool(name) => name,
        }
    }
}

impl std::fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "" => Err(DomainError::InvalidToolChoice(
                "tool choice must not be empty".to_string(),
            )),
            "required" => Ok(ToolChoice::Required),
            "auto" => Ok(ToolChoice::Auto),
            name => Ok(ToolChoice::Tool(name.to_string())),
        }
    }
}

impl TryFrom<String> for ToolChoice {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToolChoice> for String {
    fn from(choice: ToolChoice) -> Self {
        choice.as_str().to_string()
    }
}
