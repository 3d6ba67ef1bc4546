//! Invocation configuration from TOML (`[invocation]` section)

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use structcall_application::InvocationParams;
use structcall_domain::{ConfigIssue, ConfigIssueCode, ExtraToolCallPolicy};

/// Raw invocation configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInvocationConfig {
    /// Attempts per tool invocation (at least 1)
    pub max_retries: u32,
    /// `ignore`, `validate` or `reject`
    pub extra_tool_calls: String,
}

impl Default for FileInvocationConfig {
    fn default() -> Self {
        let params = InvocationParams::default();
        Self {
            max_retries: params.attempts(),
            extra_tool_calls: params.extra_tool_calls.as_str().to_string(),
        }
    }
}

impl FileInvocationConfig {
    /// Convert to engine parameters. Invalid values fall back to defaults
    /// and are reported as errors.
    pub fn to_params(&self) -> (InvocationParams, Vec<ConfigIssue>) {
        let mut params = InvocationParams::default();
        let mut issues = Vec::new();

        match NonZeroU32::new(self.max_retries) {
            Some(max) => params = params.with_max_retries(max),
            None => issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "invocation.max_retries".to_string(),
                },
                "invocation.max_retries must be at least 1",
            )),
        }

        match self.extra_tool_calls.parse::<ExtraToolCallPolicy>() {
            Ok(policy) => params = params.with_extra_tool_calls(policy),
            Err(_) => issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: "invocation.extra_tool_calls".to_string(),
                    value: self.extra_tool_calls.clone(),
                    valid_values: ExtraToolCallPolicy::VALID_VALUES
                        .iter()
                        .map(|v| v.to_string())
                        .collect(),
                },
                format!(
                    "invocation.extra_tool_calls: unknown policy '{}'",
                    self.extra_tool_calls
                ),
            )),
        }

        (params, issues)
    }
}
