//! Ollama native chat API backend

mod gateway;
mod types;

pub use gateway::{DEFAULT_OLLAMA_URL, OllamaGateway};
