//! Progress reporting while an invocation retries

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use structcall_application::InvocationProgress;
use structcall_domain::{AttemptOutcome, InvocationAttempt};

/// Reports attempts with an animated spinner on stderr
pub struct SpinnerProgress {
    label: String,
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn spinner(&self) -> ProgressBar {
        let mut slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.set_prefix(self.label.clone());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        })
        .clone()
    }
}

impl InvocationProgress for SpinnerProgress {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        self.spinner()
            .set_message(format!("attempt {}/{}", attempt, max_attempts));
    }

    fn on_attempt_outcome(&self, attempt: &InvocationAttempt<'_>) {
        if attempt.outcome.is_success() {
            return;
        }
        let pb = self.spinner();
        pb.println(format!(
            "  {} {}",
            "!".yellow(),
            describe_failure(attempt)
        ));
    }

    fn on_invocation_finished(&self, _success: bool) {
        if let Some(pb) = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Drop for SpinnerProgress {
    fn drop(&mut self) {
        let slot = self.bar.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = slot.take() {
            pb.finish_and_clear();
        }
    }
}

/// Plain line-per-attempt progress for non-terminal stderr
pub struct SimpleProgress;

impl InvocationProgress for SimpleProgress {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        eprintln!("{} attempt {}/{}", "->".cyan(), attempt, max_attempts);
    }

    fn on_attempt_outcome(&self, attempt: &InvocationAttempt<'_>) {
        if attempt.outcome.is_success() {
            let detail = attempt.tool_name().unwrap_or("text reply");
            eprintln!("  {} {}", "v".green(), detail);
        } else {
            eprintln!("  {} {}", "x".red(), describe_failure(attempt));
        }
    }
}

fn describe_failure(attempt: &InvocationAttempt<'_>) -> String {
    let retrying = !attempt.is_last();
    let what = match attempt.outcome {
        AttemptOutcome::TransportError => format!(
            "backend error: {}",
            attempt.error.as_deref().unwrap_or("unknown")
        ),
        _ => "no tool call in response".to_string(),
    };
    format!(
        "attempt {}/{} {}{}",
        attempt.ordinal,
        attempt.max_attempts,
        what,
        if retrying { ", retrying" } else { "" }
    )
}
