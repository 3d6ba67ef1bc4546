//! Backend configuration from TOML (`[backend]` section)

use crate::providers::{BackendSettings, ProviderKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use structcall_domain::{ConfigIssue, ConfigIssueCode};

/// Raw backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// `ollama` or `openai`
    pub provider: String,
    /// Server address; the provider default when unset
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    /// Environment variable holding the bearer token (OpenAI-compatible only)
    pub api_key_env: String,
    pub request_timeout_secs: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default().as_str().to_string(),
            base_url: None,
            model: "llama3.1".to_string(),
            temperature: 0.0,
            api_key_env: "OPENAI_API_KEY".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl FileBackendConfig {
    /// Parse the provider name. Unknown names fall back to the default.
    pub fn parse_provider(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match self.provider.parse::<ProviderKind>() {
            Ok(kind) => (kind, Vec::new()),
            Err(_) => (
                ProviderKind::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "backend.provider".to_string(),
                        value: self.provider.clone(),
                        valid_values: ProviderKind::VALID_VALUES
                            .iter()
                            .map(|v| v.to_string())
                            .collect(),
                    },
                    format!("backend.provider: unknown provider '{}'", self.provider),
                )],
            ),
        }
    }

    /// Build gateway settings, reading the API key from the environment.
    pub fn to_settings(&self) -> (BackendSettings, Vec<ConfigIssue>) {
        let (provider, mut issues) = self.parse_provider();

        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "backend.model".to_string(),
                },
                "backend.model must not be empty",
            ));
        }
        if self.request_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "backend.request_timeout_secs".to_string(),
                },
                "backend.request_timeout_secs must be at least 1",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "backend.temperature".to_string(),
                },
                format!(
                    "backend.temperature {} is outside 0.0..=2.0 and may be rejected",
                    self.temperature
                ),
            ));
        }

        let api_key = match provider {
            ProviderKind::OpenAi => std::env::var(&self.api_key_env)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            ProviderKind::Ollama => None,
        };

        let settings = BackendSettings {
            provider,
            base_url: self.base_url.clone().filter(|url| !url.trim().is_empty()),
            model: self.model.trim().to_string(),
            temperature: self.temperature,
            api_key,
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        };
        (settings, issues)
    }
}
