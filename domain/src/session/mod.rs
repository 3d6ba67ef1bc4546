//! LLM session domain.
//!
//! - [`entities::Message`]: a single message within a conversation
//! - [`conversation::Conversation`]: the ordered message sequence for one request
//! - [`response::LlmResponse`]: what the backend returned for one request

pub mod conversation;
pub mod entities;
pub mod response;
