//! Tool domain.
//!
//! - [`entities::ToolDefinition`]: one JSON-schema tool definition
//! - [`entities::ToolSet`]: ordered definitions, unique by name
//! - [`choice::ToolChoice`]: whether and which tool the backend must call
//! - [`arguments::ToolArguments`]: the argument payload of a proposed call

pub mod arguments;
pub mod choice;
pub mod entities;
