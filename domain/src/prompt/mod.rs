//! Prompt domain
//!
//! Placeholder substitution for prompt templates loaded from disk.

mod template;

pub use template::{TemplateError, render_template};
