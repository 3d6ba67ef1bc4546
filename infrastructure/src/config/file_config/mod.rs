//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like fields stay strings here and are parsed (with issues
//! reported) when converted into runtime settings.

mod backend;
mod invocation;
mod logging;
mod output;
mod resources;

pub use backend::FileBackendConfig;
pub use invocation::FileInvocationConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use resources::FileResourcesConfig;

use serde::{Deserialize, Serialize};
use structcall_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Text-generation backend
    pub backend: FileBackendConfig,
    /// Retry loop settings
    pub invocation: FileInvocationConfig,
    /// Prompt and tool-schema directories
    pub resources: FileResourcesConfig,
    /// Conversation transcript
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.backend.to_settings().1);
        issues.extend(self.invocation.to_params().1);
        issues.extend(self.resources.validate());
        issues
    }
}
