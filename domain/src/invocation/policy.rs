//! Policy for tool calls after the first.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do when the backend proposes more than one tool call.
///
/// The first call is always the one whose arguments are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraToolCallPolicy {
    /// Discard later calls without looking at them.
    #[default]
    Ignore,
    /// Later calls must carry parseable arguments; they are then discarded.
    Validate,
    /// More than one call fails the invocation.
    Reject,
}

impl ExtraToolCallPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraToolCallPolicy::Ignore => "ignore",
            ExtraToolCallPolicy::Validate => "validate",
            ExtraToolCallPolicy::Reject => "reject",
        }
    }

    pub const VALID_VALUES: [&'static str; 3] = ["ignore", "validate", "reject"];
}

impl std::fmt::Display for ExtraToolCallPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExtraToolCallPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(ExtraToolCallPolicy::Ignore),
            "validate" => Ok(ExtraToolCallPolicy::Validate),
            "reject" => Ok(ExtraToolCallPolicy::Reject),
            other => Err(format!("unknown extra tool call policy: {}", other)),
        }
    }
}
