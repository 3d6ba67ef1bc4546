//! Filesystem resource store
//!
//! Prompts are `*.txt` files under `<root>/agents/prompts`, tool schemas are
//! `*.json` files under `<root>/agents/tools`. Each loader keeps its own
//! filename-keyed cache, cleared only by an explicit reload.

mod agent_resources;
mod cache;
mod directory;
mod prompt_loader;
mod tools_loader;

pub use agent_resources::{AgentResources, DEFAULT_PROMPTS_DIR, DEFAULT_TOOLS_DIR};
pub use cache::ResourceCache;
pub use prompt_loader::PromptLoader;
pub use tools_loader::ToolsLoader;
