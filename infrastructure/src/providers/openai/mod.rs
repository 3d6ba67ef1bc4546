//! OpenAI-compatible chat completions backend

mod gateway;
mod types;

pub use gateway::{DEFAULT_OPENAI_URL, OpenAiGateway};
