//! Logging adapters
//!
//! - [`JsonlConversationLogger`]: JSONL conversation transcript

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
