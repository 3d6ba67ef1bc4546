//! Answer Question use case.
//!
//! Resolves a named system prompt and tools file through the
//! [`ResourceStorePort`], wraps the user's question into an instruction that
//! names the target tool and its required fields, and hands the result to
//! [`InvocationEngine::invoke_with_tools`].
//!
//! Extra context sections (a generated SQL query, the rows it returned, ...)
//! are placed between the question and the closing instruction, which is how
//! the follow-up "insights" step reuses the same flow.

use crate::ports::resource_store::{ResourceError, ResourceStorePort};
use crate::use_cases::invoke::{InvocationEngine, InvokeError, ToolInvocationInput};
use serde::Serialize;
use std::sync::Arc;
use structcall_domain::util::truncate_str;
use structcall_domain::{StructuredResult, ToolChoice, ToolDefinition, ToolSet};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while answering a question.
#[derive(Error, Debug)]
pub enum AnswerQuestionError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

/// Input for the [`AnswerQuestionUseCase`].
#[derive(Debug, Clone)]
pub struct AnswerQuestionInput {
    /// The user's question, as typed.
    pub question: String,
    /// Prompt filename under the prompts directory.
    pub prompt_file: String,
    /// Tools filename under the tools directory.
    pub tools_file: String,
    /// Tool the instruction should name. Defaults to the only tool in the
    /// file, or to the tool named by `tool_choice`.
    pub tool_name: Option<String>,
    pub tool_choice: ToolChoice,
    /// Labelled sections appended after the question.
    pub context: Vec<(String, String)>,
}

impl AnswerQuestionInput {
    pub fn new(
        question: impl Into<String>,
        prompt_file: impl Into<String>,
        tools_file: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            prompt_file: prompt_file.into(),
            tools_file: tools_file.into(),
            tool_name: None,
            tool_choice: ToolChoice::Required,
            context: Vec::new(),
        }
    }

    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = tool_choice;
        self
    }

    pub fn with_context(mut self, label: impl Into<String>, text: impl Into<String>) -> Self {
        self.context.push((label.into(), text.into()));
        self
    }
}

/// Result of the [`AnswerQuestionUseCase`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerQuestionOutput {
    /// Tool the instruction targeted, when one could be determined.
    pub tool: Option<String>,
    pub result: StructuredResult,
}

/// Use case for answering a question through a prompt/tools pair.
#[derive(Clone)]
pub struct AnswerQuestionUseCase {
    resources: Arc<dyn ResourceStorePort>,
    engine: InvocationEngine,
}

impl AnswerQuestionUseCase {
    pub fn new(resources: Arc<dyn ResourceStorePort>, engine: InvocationEngine) -> Self {
        Self { resources, engine }
    }

    pub async fn execute(
        &self,
        input: AnswerQuestionInput,
    ) -> Result<AnswerQuestionOutput, AnswerQuestionError> {
        info!(
            "Answering question with {} / {}: {}",
            input.prompt_file,
            input.tools_file,
            truncate_str(&input.question, 100)
        );

        let system_prompt = self.resources.load_prompt(&input.prompt_file, true)?;
        let tools = self.resources.load_tool_set(&input.tools_file)?;
        let target = target_tool(&input, &tools);
        debug!(
            tool = target.map(|t| t.name.as_str()),
            "Resolved target tool"
        );

        let user_message = build_instruction(&input, target);
        let invocation = ToolInvocationInput::new(system_prompt, user_message, tools.clone())
            .with_tool_choice(input.tool_choice.clone());
        let result = self.engine.invoke_with_tools(&invocation).await?;

        Ok(AnswerQuestionOutput {
            tool: target.map(|t| t.name.clone()),
            result,
        })
    }
}

fn target_tool<'a>(input: &AnswerQuestionInput, tools: &'a ToolSet) -> Option<&'a ToolDefinition> {
    input
        .tool_choice
        .tool_name()
        .or(input.tool_name.as_deref())
        .and_then(|name| tools.get(name))
        .or_else(|| tools.single())
}

/// Wrap the question into an explicit tool-calling instruction.
fn build_instruction(input: &AnswerQuestionInput, target: Option<&ToolDefinition>) -> String {
    let mut message = match target {
        Some(tool) => format!("You MUST call the {} tool to answer.\n\n", tool.name),
        None => "You MUST call one of the available tools to answer.\n\n".to_string(),
    };
    message.push_str(&format!("Question: {}\n\n", input.question.trim()));

    for (label, text) in &input.context {
        message.push_str(&format!("{}:\n{}\n\n", label, text.trim_end()));
    }

    message.push_str("IMPORTANT: Call the tool with all required parameters only.");
    let required = target.map(ToolDefinition::required_parameters).unwrap_or_default();
    if !required.is_empty() {
        message.push_str(" You MUST provide ALL required fields with meaningful content: ");
        message.push_str(&required.join(", "));
    }
    message
}
