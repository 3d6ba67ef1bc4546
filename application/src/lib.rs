//! Application layer for structcall
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::InvocationParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{InvocationProgress, NoInvocationProgress},
    resource_store::{
        ResourceError, ResourceInfo, ResourceKind, ResourceKindInfo, ResourceStorePort,
    },
};
pub use use_cases::answer_question::{
    AnswerQuestionError, AnswerQuestionInput, AnswerQuestionOutput, AnswerQuestionUseCase,
};
pub use use_cases::invoke::{InvocationEngine, InvokeError, ResultTransform, ToolInvocationInput};
