//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Duplicate tool name in tool set: {0}")]
    DuplicateTool(String),

    #[error("Invalid tool definition: {0}")]
    InvalidToolDefinition(String),

    #[error("Unsupported tool document: expected a list or a mapping of tools, found {0}")]
    UnsupportedToolDocument(&'static str),

    #[error("Invalid tool choice: {0}")]
    InvalidToolChoice(String),
}

impl DomainError {
    /// Check if this error was caused by a duplicate tool name
    pub fn is_duplicate_tool(&self) -> bool {
        matches!(self, DomainError::DuplicateTool(_))
    }
}
