//! Progress notification port
//!
//! Defines the interface for reporting progress while an invocation retries.

use structcall_domain::InvocationAttempt;

/// Callback for progress updates during an invocation.
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait InvocationProgress: Send + Sync {
    /// Called before each backend call.
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// Called once an attempt has been judged.
    fn on_attempt_outcome(&self, attempt: &InvocationAttempt<'_>);

    /// Called when the invocation returns, successfully or not.
    fn on_invocation_finished(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoInvocationProgress;

impl InvocationProgress for NoInvocationProgress {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}
    fn on_attempt_outcome(&self, _attempt: &InvocationAttempt<'_>) {}
}
