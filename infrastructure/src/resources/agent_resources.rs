//! Filesystem-backed resource store.
//!
//! [`AgentResources`] owns one [`PromptLoader`] and one [`ToolsLoader`] and
//! is the adapter behind [`ResourceStorePort`]. Construct it once and share
//! it (`Arc`) between every use case that needs prompts or tools; its caches
//! live exactly as long as the instance.

use super::prompt_loader::PromptLoader;
use super::tools_loader::ToolsLoader;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use structcall_application::ports::resource_store::{
    ResourceError, ResourceInfo, ResourceKindInfo, ResourceStorePort,
};
use structcall_domain::ToolDefinition;
use tracing::info;

/// Default prompts subtree, relative to the resource root.
pub const DEFAULT_PROMPTS_DIR: &str = "agents/prompts";
/// Default tools subtree, relative to the resource root.
pub const DEFAULT_TOOLS_DIR: &str = "agents/tools";

/// Combined prompt and tool loader.
#[derive(Debug)]
pub struct AgentResources {
    prompts: PromptLoader,
    tools: ToolsLoader,
}

impl AgentResources {
    /// Open both subtrees below `root`, creating missing directories.
    pub fn open(
        root: impl AsRef<Path>,
        prompts_dir: impl AsRef<Path>,
        tools_dir: impl AsRef<Path>,
    ) -> Result<Self, ResourceError> {
        let root = root.as_ref();
        let resources = Self {
            prompts: PromptLoader::new(root.join(prompts_dir))?,
            tools: ToolsLoader::new(root.join(tools_dir))?,
        };
        info!(
            "AgentResources initialized (prompts: {}, tools: {})",
            resources.prompts.directory().display(),
            resources.tools.directory().display()
        );
        Ok(resources)
    }

    /// Open the default `agents/prompts` and `agents/tools` layout.
    pub fn with_defaults(root: impl AsRef<Path>) -> Result<Self, ResourceError> {
        Self::open(root, DEFAULT_PROMPTS_DIR, DEFAULT_TOOLS_DIR)
    }

    pub fn prompts(&self) -> &PromptLoader {
        &self.prompts
    }

    pub fn tools(&self) -> &ToolsLoader {
        &self.tools
    }

    /// Clear both caches.
    pub fn reload_all(&self) {
        self.prompts.reload(None);
        self.tools.reload(None);
        info!("All resources reloaded");
    }
}

impl ResourceStorePort for AgentResources {
    fn load_prompt(&self, name: &str, use_cache: bool) -> Result<String, ResourceError> {
        self.prompts.load(name, use_cache)
    }

    fn format_prompt(
        &self,
        name: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, ResourceError> {
        self.prompts.format(name, variables)
    }

    fn load_tools(&self, name: &str, use_cache: bool) -> Result<Value, ResourceError> {
        self.tools.load(name, use_cache)
    }

    fn get_tool(
        &self,
        tools_file: &str,
        tool_name: &str,
    ) -> Result<Option<ToolDefinition>, ResourceError> {
        self.tools.get_tool(tools_file, tool_name)
    }

    fn reload_prompts(&self, name: Option<&str>) {
        self.prompts.reload(name);
    }

    fn reload_tools(&self, name: Option<&str>) {
        self.tools.reload(name);
    }

    fn info(&self) -> ResourceInfo {
        ResourceInfo {
            prompts: ResourceKindInfo {
                available: self.prompts.list(),
                cached: self.prompts.cache_size(),
                directory: self.prompts.directory().to_path_buf(),
            },
            tools: ResourceKindInfo {
                available: self.tools.list(),
                cached: self.tools.cache_size(),
                directory: self.tools.directory().to_path_buf(),
            },
        }
    }
}

impl fmt::Display for AgentResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AgentResources(prompts={}, tools={})",
            self.prompts.cache_size(),
            self.tools.cache_size()
        )
    }
}
