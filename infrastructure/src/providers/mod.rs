//! Backend adapters implementing [`LlmGateway`].
//!
//! | Provider | Endpoint | Tool arguments arrive as |
//! |----------|----------|--------------------------|
//! | `ollama` | `/api/chat` | JSON object |
//! | `openai` | `/v1/chat/completions` | JSON-encoded string |

mod common;
pub mod ollama;
pub mod openai;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use structcall_application::ports::llm_gateway::{GatewayError, LlmGateway};
use tracing::info;

pub use ollama::OllamaGateway;
pub use openai::OpenAiGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

impl ProviderKind {
    pub const VALID_VALUES: [&'static str; 2] = ["ollama", "openai"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => ollama::DEFAULT_OLLAMA_URL,
            ProviderKind::OpenAi => openai::DEFAULT_OPENAI_URL,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" | "openai-compatible" => Ok(ProviderKind::OpenAi),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Everything needed to construct a backend gateway.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub provider: ProviderKind,
    /// Overrides the provider's default address.
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    /// Bearer token, OpenAI-compatible only.
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl BackendSettings {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Construct the configured gateway.
pub fn build_gateway(settings: &BackendSettings) -> Result<Arc<dyn LlmGateway>, GatewayError> {
    let base_url = settings.base_url();
    info!(
        provider = %settings.provider,
        model = %settings.model,
        "Using backend at {}",
        base_url
    );

    Ok(match settings.provider {
        ProviderKind::Ollama => Arc::new(OllamaGateway::new(
            base_url,
            settings.model.clone(),
            settings.temperature,
            settings.request_timeout,
        )?),
        ProviderKind::OpenAi => Arc::new(OpenAiGateway::new(
            base_url,
            settings.model.clone(),
            settings.temperature,
            settings.api_key.clone(),
            settings.request_timeout,
        )?),
    })
}
