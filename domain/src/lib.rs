//! Domain layer for structcall
//!
//! This crate contains the core types for turning an unreliable
//! text-generation backend into a contract-respecting function call.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Conversation**: ordered messages (system, prior turns, user) sent to
//!   the backend in exactly the order they were assembled
//! - **ToolSet**: named JSON-schema tool definitions, unique by name
//! - **ToolChoice**: `required`, `auto`, or a specific tool name
//! - **StructuredResult**: the argument mapping of the accepted tool call,
//!   or `{ "response": <text> }` for the free-text fallback
//! - **ResponseParser**: normalizes tool-call argument payloads (mapping or
//!   JSON-encoded string) into a `StructuredResult`

pub mod config;
pub mod core;
pub mod invocation;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use config::{
    OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use core::error::DomainError;
pub use invocation::{
    attempt::{AttemptOutcome, InvocationAttempt},
    parser::ResponseParser,
    policy::ExtraToolCallPolicy,
    result::StructuredResult,
};
pub use prompt::{TemplateError, render_template};
pub use session::{
    conversation::{Conversation, ConversationBuilder},
    entities::{Message, Role},
    response::{LlmResponse, ProposedToolCall},
};
pub use tool::{
    arguments::{ArgumentParseError, ToolArguments},
    choice::ToolChoice,
    entities::{ToolDefinition, ToolSet},
};
