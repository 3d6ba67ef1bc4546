//! Infrastructure layer for structcall
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the filesystem resource store, the HTTP
//! text-generation backends, the JSONL conversation log and
//! configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod resources;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileBackendConfig, FileConfig, FileInvocationConfig, FileLoggingConfig,
    FileOutputConfig, FileResourcesConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{BackendSettings, OllamaGateway, OpenAiGateway, ProviderKind, build_gateway};
pub use resources::{AgentResources, PromptLoader, ResourceCache, ToolsLoader};
