//! Resource directory configuration from TOML (`[resources]` section)

use crate::resources::{DEFAULT_PROMPTS_DIR, DEFAULT_TOOLS_DIR};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use structcall_domain::{ConfigIssue, ConfigIssueCode};

/// Raw resource configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResourcesConfig {
    /// Base directory; the current directory when unset
    pub root: Option<PathBuf>,
    /// Prompts subtree, relative to `root`
    pub prompts_dir: PathBuf,
    /// Tools subtree, relative to `root`
    pub tools_dir: PathBuf,
}

impl Default for FileResourcesConfig {
    fn default() -> Self {
        Self {
            root: None,
            prompts_dir: PathBuf::from(DEFAULT_PROMPTS_DIR),
            tools_dir: PathBuf::from(DEFAULT_TOOLS_DIR),
        }
    }
}

impl FileResourcesConfig {
    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        [
            ("resources.prompts_dir", &self.prompts_dir),
            ("resources.tools_dir", &self.tools_dir),
        ]
        .into_iter()
        .filter(|(_, dir)| dir.as_os_str().is_empty())
        .map(|(field, _)| {
            ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: field.to_string(),
                },
                format!("{} must not be empty", field),
            )
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileResourcesConfig::default();
        assert_eq!(config.root_dir(), PathBuf::from("."));
        assert_eq!(config.prompts_dir, PathBuf::from("agents/prompts"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_empty_dir_is_error() {
        let config = FileResourcesConfig {
            tools_dir: PathBuf::new(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("resources.tools_dir"));
    }
}
