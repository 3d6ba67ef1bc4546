//! Invocation parameters: retry loop control.
//!
//! [`InvocationParams`] groups the static parameters that control the retry
//! loop in [`InvocationEngine`](crate::use_cases::invoke::InvocationEngine).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use structcall_domain::ExtraToolCallPolicy;

const DEFAULT_MAX_RETRIES: NonZeroU32 = match NonZeroU32::new(3) {
    Some(n) => n,
    None => unreachable!(),
};

/// Retry loop control parameters.
///
/// `max_retries` is the total number of backend calls an invocation may make,
/// so it can never be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationParams {
    /// Maximum number of attempts per `invoke_with_tools` call.
    pub max_retries: NonZeroU32,
    /// What to do with tool calls after the first.
    pub extra_tool_calls: ExtraToolCallPolicy,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            extra_tool_calls: ExtraToolCallPolicy::default(),
        }
    }
}

impl InvocationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max: NonZeroU32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_extra_tool_calls(mut self, policy: ExtraToolCallPolicy) -> Self {
        self.extra_tool_calls = policy;
        self
    }

    /// Attempt budget as a plain integer.
    pub fn attempts(&self) -> u32 {
        self.max_retries.get()
    }
}
