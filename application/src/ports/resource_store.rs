//! Resource store port
//!
//! Resolves named prompt texts and named tool-schema documents. The
//! filesystem-backed adapter with its shared cache lives in the
//! infrastructure layer; use cases only see this trait.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use structcall_domain::{DomainError, TemplateError, ToolDefinition, ToolSet};
use thiserror::Error;

/// Errors raised while resolving resources.
///
/// None of these are retried: they describe a missing or malformed local
/// resource, not a transient condition.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("{kind} file not found: {}", path.display())]
    NotFound { kind: ResourceKind, path: PathBuf },

    #[error("Invalid JSON in tools file '{file}': {source}")]
    SchemaDecode {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Variable '{variable}' not provided for prompt '{file}'")]
    MissingVariable { file: String, variable: String },

    #[error("Invalid template in prompt '{file}': {reason}")]
    InvalidTemplate { file: String, reason: String },

    #[error("Invalid tool set in '{file}': {source}")]
    InvalidToolSet {
        file: String,
        #[source]
        source: DomainError,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResourceError {
    /// Map a template rendering failure for prompt `file`.
    pub fn from_template(file: &str, error: TemplateError) -> Self {
        match error {
            TemplateError::MissingVariable(variable) => ResourceError::MissingVariable {
                file: file.to_string(),
                variable,
            },
            other => ResourceError::InvalidTemplate {
                file: file.to_string(),
                reason: other.to_string(),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }
}

/// Which subtree a resource lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Prompt,
    Tools,
}

impl ResourceKind {
    /// File extension scanned by `list`.
    pub fn extension(&self) -> &'static str {
        match self {
            ResourceKind::Prompt => "txt",
            ResourceKind::Tools => "json",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Prompt => write!(f, "Prompt"),
            ResourceKind::Tools => write!(f, "Tools"),
        }
    }
}

/// Snapshot of one resource subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceKindInfo {
    /// Filenames currently on disk, sorted.
    pub available: Vec<String>,
    /// Number of cached entries.
    pub cached: usize,
    pub directory: PathBuf,
}

/// Snapshot of both resource subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInfo {
    pub prompts: ResourceKindInfo,
    pub tools: ResourceKindInfo,
}

/// Port for loading prompts and tool schemas.
///
/// Implementations must be safe to share between concurrent invocations.
pub trait ResourceStorePort: Send + Sync {
    /// Load prompt text, from cache when `use_cache` and present.
    fn load_prompt(&self, name: &str, use_cache: bool) -> Result<String, ResourceError>;

    /// Load a prompt and substitute `{placeholders}` from `variables`.
    fn format_prompt(
        &self,
        name: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, ResourceError>;

    /// Load a parsed tool-schema document, from cache when `use_cache` and present.
    fn load_tools(&self, name: &str, use_cache: bool) -> Result<Value, ResourceError>;

    /// Load a tool-schema document and convert it into a [`ToolSet`].
    fn load_tool_set(&self, name: &str) -> Result<ToolSet, ResourceError> {
        let document = self.load_tools(name, true)?;
        ToolSet::from_document(&document).map_err(|source| ResourceError::InvalidToolSet {
            file: name.to_string(),
            source,
        })
    }

    /// Look up one tool by name inside a tools file. `Ok(None)` when absent.
    fn get_tool(
        &self,
        tools_file: &str,
        tool_name: &str,
    ) -> Result<Option<ToolDefinition>, ResourceError>;

    /// Evict one prompt, or every prompt when `name` is `None`.
    fn reload_prompts(&self, name: Option<&str>);

    /// Evict one tools file, or every tools file when `name` is `None`.
    fn reload_tools(&self, name: Option<&str>);

    /// What is on disk and in cache right now.
    fn info(&self) -> ResourceInfo;
}
