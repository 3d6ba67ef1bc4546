//! Structured invocation engine.
//!
//! Turns a non-deterministic backend into a contract-respecting function
//! call. Three entry points:
//!
//! | Method | Requests | Returns |
//! |--------|----------|---------|
//! | [`invoke_with_tools`](InvocationEngine::invoke_with_tools) | 1..=`max_retries` | tool arguments, or `{response}` in `auto` mode |
//! | [`invoke_simple`](InvocationEngine::invoke_simple) | 1 | free text |
//! | [`invoke_with_conversation`](InvocationEngine::invoke_with_conversation) | 1 | tool arguments or `{response}` |
//!
//! # Retry policy
//!
//! ```text
//! attempt k ─► backend ─┬─ transport error ─► k < N ? retry : propagate
//!                       ├─ tool call(s) ────► parse first ─┬─ ok ──► (transform) ► done
//!                       │                                  └─ bad JSON ► fail now
//!                       ├─ auto + text ─────► { "response": text } ► done
//!                       └─ nothing usable ──► retry, ToolCallRequired after N
//! ```
//!
//! A missing tool call is the backend declining this time and is retried.
//! Malformed arguments are a broken contract and fail immediately.

use crate::config::InvocationParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, event_types,
};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{InvocationProgress, NoInvocationProgress};
use serde_json::json;
use std::sync::Arc;
use structcall_domain::util::preview;
use structcall_domain::{
    ArgumentParseError, AttemptOutcome, Conversation, ExtraToolCallPolicy, InvocationAttempt,
    LlmResponse, Message, ProposedToolCall, ResponseParser, StructuredResult, ToolArguments,
    ToolChoice, ToolSet,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Caller-supplied post-processing of the accepted tool arguments.
pub type ResultTransform = dyn Fn(StructuredResult) -> StructuredResult + Send + Sync;

/// Errors that end an invocation.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Invalid invocation request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    ArgumentParse(#[from] ArgumentParseError),

    #[error("Model failed to call the required tool after {attempts} attempt(s)")]
    ToolCallRequired { attempts: u32 },

    #[error("Model proposed {count} tool calls where exactly one was allowed")]
    MultipleToolCalls { count: usize },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl InvokeError {
    /// Whether the backend transport failed (after exhausting retries).
    pub fn is_transport(&self) -> bool {
        matches!(self, InvokeError::Gateway(_))
    }
}

/// Input for [`InvocationEngine::invoke_with_tools`].
#[derive(Clone)]
pub struct ToolInvocationInput {
    pub system_prompt: String,
    pub user_message: String,
    pub tools: ToolSet,
    pub tool_choice: ToolChoice,
    /// Turns placed between the system prompt and the user message.
    pub prior_messages: Vec<Message>,
    pub transform: Option<Arc<ResultTransform>>,
}

impl ToolInvocationInput {
    pub fn new(
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
        tools: ToolSet,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
            tools,
            tool_choice: ToolChoice::Required,
            prior_messages: Vec::new(),
            transform: None,
        }
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = tool_choice;
        self
    }

    pub fn with_prior_messages(mut self, messages: Vec<Message>) -> Self {
        self.prior_messages = messages;
        self
    }

    pub fn with_transform(
        mut self,
        transform: impl Fn(StructuredResult) -> StructuredResult + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Check the request constraints before anything is sent.
    pub fn validate(&self) -> Result<(), InvokeError> {
        if self.system_prompt.trim().is_empty() {
            return Err(InvokeError::InvalidRequest(
                "system prompt must not be empty".to_string(),
            ));
        }
        if self.user_message.trim().is_empty() {
            return Err(InvokeError::InvalidRequest(
                "user message must not be empty".to_string(),
            ));
        }
        if self.tool_choice.requires_tool_call() && self.tools.is_empty() {
            return Err(InvokeError::InvalidRequest(format!(
                "tool choice '{}' needs at least one tool",
                self.tool_choice
            )));
        }
        if let Some(name) = self.tool_choice.tool_name()
            && !self.tools.contains(name)
        {
            return Err(InvokeError::InvalidRequest(format!(
                "tool choice names '{}', which is not in the tool set",
                name
            )));
        }
        Ok(())
    }

    fn conversation(&self) -> Conversation {
        Conversation::builder()
            .system(&self.system_prompt)
            .history(self.prior_messages.iter().cloned())
            .user(&self.user_message)
            .build()
    }
}

impl std::fmt::Debug for ToolInvocationInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInvocationInput")
            .field("system_prompt", &self.system_prompt)
            .field("user_message", &self.user_message)
            .field("tools", &self.tools)
            .field("tool_choice", &self.tool_choice)
            .field("prior_messages", &self.prior_messages)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Drives bounded retries against the backend.
///
/// Holds no per-invocation state: every retry counter and conversation is
/// local to one call, so a single engine can serve concurrent callers.
#[derive(Clone)]
pub struct InvocationEngine {
    gateway: Arc<dyn LlmGateway>,
    params: InvocationParams,
    progress: Arc<dyn InvocationProgress>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl InvocationEngine {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: InvocationParams) -> Self {
        info!(
            "InvocationEngine initialized with backend: {} (max_retries={})",
            gateway.describe(),
            params.max_retries
        );
        Self {
            gateway,
            params,
            progress: Arc::new(NoInvocationProgress),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn InvocationProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &InvocationParams {
        &self.params
    }

    /// Invoke the backend with tools until a qualifying result is produced.
    ///
    /// Makes at most `max_retries` backend calls and none after the first
    /// success or after a malformed argument payload.
    pub async fn invoke_with_tools(
        &self,
        input: &ToolInvocationInput,
    ) -> Result<StructuredResult, InvokeError> {
        input.validate()?;

        let conversation = input.conversation();
        let max_attempts = self.params.attempts();
        let request =
            CompletionRequest::with_tools(&conversation, &input.tools, &input.tool_choice);

        info!(
            tools = input.tools.len(),
            tool_choice = %input.tool_choice,
            "Starting invocation with tool calling"
        );
        self.conversation_logger.log(ConversationEvent::new(
            event_types::INVOCATION_STARTED,
            json!({
                "mode": "tools",
                "backend": self.gateway.describe(),
                "tool_choice": input.tool_choice,
                "max_attempts": max_attempts,
            }),
        ));

        let result = self
            .run_attempts(&request, input.transform.as_deref(), max_attempts)
            .await;
        self.finish(&result);
        result
    }

    async fn run_attempts(
        &self,
        request: &CompletionRequest<'_>,
        transform: Option<&ResultTransform>,
        max_attempts: u32,
    ) -> Result<StructuredResult, InvokeError> {
        for ordinal in 1..=max_attempts {
            info!("Attempt {}/{} - invoking model...", ordinal, max_attempts);
            self.progress.on_attempt_start(ordinal, max_attempts);
            self.conversation_logger
                .log(ConversationEvent::llm_request(
                    ordinal,
                    request.conversation,
                    request.tools,
                ));

            let response = match self.gateway.complete(*request).await {
                Ok(response) => response,
                Err(e) => {
                    error!("Error during invocation attempt {}: {}", ordinal, e);
                    self.record(&InvocationAttempt::failed(
                        ordinal,
                        max_attempts,
                        request.conversation,
                        request.tools,
                        e.to_string(),
                    ));
                    if ordinal == max_attempts {
                        return Err(InvokeError::Gateway(e));
                    }
                    continue;
                }
            };
            debug!(
                tool_calls = response.tool_calls.len(),
                "Model response received: {}",
                preview(response.raw_text(), 200)
            );

            let outcome = classify(&response, request.tool_choice);
            self.record(&InvocationAttempt::answered(
                ordinal,
                max_attempts,
                request.conversation,
                request.tools,
                &response,
                outcome,
            ));

            match outcome {
                AttemptOutcome::ToolCallFound => {
                    let arguments = self.accept_tool_calls(&response.tool_calls, request)?;
                    return Ok(match transform {
                        Some(transform) => transform(arguments),
                        None => arguments,
                    });
                }
                AttemptOutcome::TextFallback => {
                    info!("No tool call, but text response received.");
                    return Ok(StructuredResult::text_response(response.raw_text()));
                }
                AttemptOutcome::NoToolCall | AttemptOutcome::TransportError => {
                    warn!("No tool call detected on attempt {}. Retrying...", ordinal);
                }
            }
        }

        warn!(
            "Model failed to call the required tool after {} attempts",
            max_attempts
        );
        Err(InvokeError::ToolCallRequired {
            attempts: max_attempts,
        })
    }

    /// Single request without tools; returns the backend text verbatim.
    ///
    /// No retry: callers needing one compose it themselves.
    pub async fn invoke_simple(
        &self,
        system_prompt: &str,
        user_message: &str,
        prior_messages: &[Message],
    ) -> Result<String, InvokeError> {
        let conversation = Conversation::builder()
            .system(system_prompt)
            .history(prior_messages.iter().cloned())
            .user(user_message)
            .build();

        info!("Invoking model (simple mode)...");
        let response = self.send_once(&conversation, None, &ToolChoice::Auto).await?;
        Ok(response.content.unwrap_or_default())
    }

    /// Single request over a caller-supplied history.
    ///
    /// With tools, the first proposed call's arguments are returned when
    /// present; otherwise (or without tools) the text is wrapped as
    /// `{ "response": text }`.
    pub async fn invoke_with_conversation(
        &self,
        history: &Conversation,
        tools: Option<&ToolSet>,
        tool_choice: &ToolChoice,
    ) -> Result<StructuredResult, InvokeError> {
        let tools = tools.filter(|tools| !tools.is_empty());
        info!(
            messages = history.len(),
            tools = tools.map_or(0, ToolSet::len),
            "Invoking model with conversation history"
        );

        let response = self.send_once(history, tools, tool_choice).await?;
        if let Some(tools) = tools
            && response.has_tool_calls()
        {
            let request = CompletionRequest::with_tools(history, tools, tool_choice);
            return self.accept_tool_calls(&response.tool_calls, &request);
        }
        Ok(StructuredResult::text_response(response.raw_text()))
    }

    async fn send_once(
        &self,
        conversation: &Conversation,
        tools: Option<&ToolSet>,
        tool_choice: &ToolChoice,
    ) -> Result<LlmResponse, InvokeError> {
        let request = match tools {
            Some(tools) => CompletionRequest::with_tools(conversation, tools, tool_choice),
            None => CompletionRequest::text(conversation),
        };
        self.conversation_logger
            .log(ConversationEvent::llm_request(1, conversation, tools));

        match self.gateway.complete(request).await {
            Ok(response) => {
                self.record(&InvocationAttempt::answered(
                    1,
                    1,
                    conversation,
                    tools,
                    &response,
                    if response.has_tool_calls() {
                        AttemptOutcome::ToolCallFound
                    } else {
                        AttemptOutcome::TextFallback
                    },
                ));
                Ok(response)
            }
            Err(e) => {
                error!("Error during single invocation: {}", e);
                self.record(&InvocationAttempt::failed(
                    1,
                    1,
                    conversation,
                    tools,
                    e.to_string(),
                ));
                Err(InvokeError::Gateway(e))
            }
        }
    }

    /// Parse the first proposed call and apply the extra-call policy.
    fn accept_tool_calls(
        &self,
        calls: &[ProposedToolCall],
        request: &CompletionRequest<'_>,
    ) -> Result<StructuredResult, InvokeError> {
        let Some((first, rest)) = calls.split_first() else {
            return Err(InvokeError::ToolCallRequired { attempts: 1 });
        };
        info!("Tool call detected: {}", first.name);

        if let Some(tools) = request.tools
            && !tools.contains(&first.name)
        {
            warn!("Model called '{}', which is not in the tool set", first.name);
        }
        if let Some(expected) = request.tool_choice.tool_name()
            && expected != first.name
        {
            warn!(
                "Tool choice asked for '{}' but model called '{}'",
                expected, first.name
            );
        }

        if !rest.is_empty() {
            match self.params.extra_tool_calls {
                ExtraToolCallPolicy::Ignore => {
                    debug!("Ignoring {} additional tool call(s)", rest.len());
                }
                ExtraToolCallPolicy::Validate => {
                    for extra in rest {
                        ResponseParser::parse_arguments(extra)?;
                    }
                    debug!("Validated and discarded {} additional tool call(s)", rest.len());
                }
                ExtraToolCallPolicy::Reject => {
                    return Err(InvokeError::MultipleToolCalls { count: calls.len() });
                }
            }
        }

        if !matches!(first.arguments, ToolArguments::Mapping(_)) {
            warn!("Tool arguments not parsed as a mapping. Attempting recovery...");
        }
        Ok(ResponseParser::parse_arguments(first)?)
    }

    fn record(&self, attempt: &InvocationAttempt<'_>) {
        self.progress.on_attempt_outcome(attempt);
        self.conversation_logger
            .log(ConversationEvent::attempt_outcome(attempt));
    }

    fn finish(&self, result: &Result<StructuredResult, InvokeError>) {
        self.progress.on_invocation_finished(result.is_ok());
        let payload = match result {
            Ok(result) => json!({ "success": true, "result": result }),
            Err(e) => json!({ "success": false, "error": e.to_string() }),
        };
        self.conversation_logger.log(ConversationEvent::new(
            event_types::INVOCATION_FINISHED,
            payload,
        ));
    }
}

/// Judge a response against the tool choice.
fn classify(response: &LlmResponse, tool_choice: &ToolChoice) -> AttemptOutcome {
    if response.has_tool_calls() {
        AttemptOutcome::ToolCallFound
    } else if tool_choice.is_auto() && response.text().is_some() {
        AttemptOutcome::TextFallback
    } else {
        AttemptOutcome::NoToolCall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::num::NonZeroU32;
    use std::sync::Mutex;
    use structcall_domain::{Role, ToolDefinition};

    // ==================== Test Infrastructure ====================

    /// A scripted backend reply
    #[derive(Debug, Clone)]
    enum Scripted {
        Response(LlmResponse),
        Error(String),
    }

    /// What the mock saw for one request
    #[derive(Debug, Clone)]
    struct RecordedRequest {
        conversation: Conversation,
        tool_names: Option<Vec<String>>,
        tool_choice: ToolChoice,
    }

    /// Mock gateway that replays scripted replies in order
    struct ScriptedGateway {
        replies: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn describe(&self) -> String {
            "scripted".to_string()
        }

        async fn complete(
            &self,
            request: CompletionRequest<'_>,
        ) -> Result<LlmResponse, GatewayError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                conversation: request.conversation.clone(),
                tool_names: request
                    .tools
                    .map(|tools| tools.names().map(str::to_string).collect()),
                tool_choice: request.tool_choice.clone(),
            });
            match self.replies.lock().unwrap().pop_front() {
                Some(Scripted::Response(response)) => Ok(response),
                Some(Scripted::Error(e)) => Err(GatewayError::RequestFailed(e)),
                None => Ok(LlmResponse::default()),
            }
        }
    }

    /// Records every attempt outcome
    #[derive(Default)]
    struct RecordingProgress {
        outcomes: Mutex<Vec<(u32, AttemptOutcome)>>,
        finished: Mutex<Option<bool>>,
    }

    impl InvocationProgress for RecordingProgress {
        fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

        fn on_attempt_outcome(&self, attempt: &InvocationAttempt<'_>) {
            self.outcomes
                .lock()
                .unwrap()
                .push((attempt.ordinal, attempt.outcome));
        }

        fn on_invocation_finished(&self, success: bool) {
            *self.finished.lock().unwrap() = Some(success);
        }
    }

    /// Collects conversation events in memory
    #[derive(Default)]
    struct MemoryLogger {
        events: Mutex<Vec<(&'static str, Value)>>,
    }

    impl ConversationLogger for MemoryLogger {
        fn log(&self, event: ConversationEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    fn sum_tools() -> ToolSet {
        ToolSet::new(vec![ToolDefinition::new("sum_tool", "Add two integers").with_parameters(
            serde_json::json!({
                "type": "object",
                "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
                "required": ["a", "b"]
            }),
        )])
        .unwrap()
    }

    fn engine(gateway: Arc<ScriptedGateway>, max_retries: u32) -> InvocationEngine {
        InvocationEngine::new(
            gateway,
            InvocationParams::default().with_max_retries(NonZeroU32::new(max_retries).unwrap()),
        )
    }

    fn no_call() -> Scripted {
        Scripted::Response(LlmResponse::default())
    }

    fn text(content: &str) -> Scripted {
        Scripted::Response(LlmResponse::from_text(content))
    }

    fn call(name: &str, arguments: impl Into<ToolArguments>) -> Scripted {
        Scripted::Response(
            LlmResponse::default().with_tool_call(ProposedToolCall::new(name, arguments.into())),
        )
    }

    fn input() -> ToolInvocationInput {
        ToolInvocationInput::new("You add numbers.", "What is 2 + 3?", sum_tools())
    }

    // ==================== invoke_with_tools ====================

    #[tokio::test]
    async fn required_choice_exhausts_exactly_n_attempts() {
        for n in 1..=4 {
            let gateway = ScriptedGateway::new(vec![]);
            let err = engine(gateway.clone(), n)
                .invoke_with_tools(&input())
                .await
                .unwrap_err();
            assert!(matches!(err, InvokeError::ToolCallRequired { attempts } if attempts == n));
            assert_eq!(gateway.calls(), n as usize);
        }
    }

    #[tokio::test]
    async fn success_on_third_attempt_stops_calling() {
        let gateway = ScriptedGateway::new(vec![
            no_call(),
            no_call(),
            call("sum_tool", serde_json::json!({"a": 2, "b": 3})),
            call("sum_tool", serde_json::json!({"a": 9, "b": 9})),
        ]);
        let result = engine(gateway.clone(), 3)
            .invoke_with_tools(&input())
            .await
            .unwrap();

        assert_eq!(result.get_i64("a"), Some(2));
        assert_eq!(result.get_i64("b"), Some(3));
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test]
    async fn success_on_first_attempt_makes_one_call() {
        let gateway = ScriptedGateway::new(vec![call(
            "sum_tool",
            serde_json::json!({"a": 1, "b": 1}),
        )]);
        engine(gateway.clone(), 5)
            .invoke_with_tools(&input())
            .await
            .unwrap();
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_string_arguments_fail_without_retry() {
        // Bad JSON is a contract violation, not a transient miss: no retry.
        let gateway = ScriptedGateway::new(vec![
            call("sum_tool", ToolArguments::Encoded("{bad json".to_string())),
            call("sum_tool", serde_json::json!({"a": 2, "b": 3})),
        ]);
        let err = engine(gateway.clone(), 3)
            .invoke_with_tools(&input())
            .await
            .unwrap_err();

        assert!(matches!(err, InvokeError::ArgumentParse(ref e) if e.tool == "sum_tool"));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn encoded_string_arguments_are_recovered() {
        let gateway = ScriptedGateway::new(vec![call(
            "sum_tool",
            ToolArguments::Encoded(r#"{"a": 2, "b": 3}"#.to_string()),
        )]);
        let result = engine(gateway, 3).invoke_with_tools(&input()).await.unwrap();
        assert_eq!(result.get_i64("a"), Some(2));
    }

    #[tokio::test]
    async fn auto_choice_returns_text_fallback() {
        let gateway = ScriptedGateway::new(vec![text("42")]);
        let result = engine(gateway.clone(), 3)
            .invoke_with_tools(&input().with_tool_choice(ToolChoice::Auto))
            .await
            .unwrap();

        assert_eq!(result, StructuredResult::text_response("42"));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn required_choice_ignores_text_and_retries() {
        let gateway = ScriptedGateway::new(vec![
            text("I think the answer is 5"),
            call("sum_tool", serde_json::json!({"a": 2, "b": 3})),
        ]);
        let result = engine(gateway.clone(), 3)
            .invoke_with_tools(&input())
            .await
            .unwrap();
        assert_eq!(result.get_i64("b"), Some(3));
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn auto_choice_without_text_retries() {
        let gateway = ScriptedGateway::new(vec![text("   "), text("42")]);
        let result = engine(gateway.clone(), 3)
            .invoke_with_tools(&input().with_tool_choice(ToolChoice::Auto))
            .await
            .unwrap();
        assert_eq!(result.response_text(), Some("42"));
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn transport_error_is_retried() {
        let gateway = ScriptedGateway::new(vec![
            Scripted::Error("connection reset".to_string()),
            call("sum_tool", serde_json::json!({"a": 2, "b": 3})),
        ]);
        let result = engine(gateway.clone(), 2)
            .invoke_with_tools(&input())
            .await
            .unwrap();
        assert_eq!(result.get_i64("a"), Some(2));
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn transport_error_on_last_attempt_propagates() {
        let gateway = ScriptedGateway::new(vec![
            no_call(),
            Scripted::Error("503 Service Unavailable".to_string()),
        ]);
        let err = engine(gateway.clone(), 2)
            .invoke_with_tools(&input())
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Request failed: 503 Service Unavailable");
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn transform_is_applied_to_arguments() {
        let gateway = ScriptedGateway::new(vec![call(
            "sum_tool",
            serde_json::json!({"a": 2, "b": 3}),
        )]);
        let input = input().with_transform(|args| {
            let total = args.get_i64("a").unwrap_or(0) + args.get_i64("b").unwrap_or(0);
            let mut out = StructuredResult::default();
            out.insert("total", total);
            out
        });

        let result = engine(gateway, 3).invoke_with_tools(&input).await.unwrap();
        assert_eq!(result.get_i64("total"), Some(5));
        assert!(!result.contains_key("a"));
    }

    #[tokio::test]
    async fn transform_is_not_applied_to_text_fallback() {
        let gateway = ScriptedGateway::new(vec![text("42")]);
        let input = input()
            .with_tool_choice(ToolChoice::Auto)
            .with_transform(|_| StructuredResult::default());
        let result = engine(gateway, 1).invoke_with_tools(&input).await.unwrap();
        assert_eq!(result.response_text(), Some("42"));
    }

    #[tokio::test]
    async fn same_conversation_and_tools_sent_on_every_attempt() {
        let gateway = ScriptedGateway::new(vec![no_call(), no_call()]);
        let input = input().with_prior_messages(vec![
            Message::user("hello"),
            Message::assistant("hi, how can I help?"),
        ]);
        let _ = engine(gateway.clone(), 2).invoke_with_tools(&input).await;

        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].conversation, requests[1].conversation);

        let roles: Vec<Role> = requests[0].conversation.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(
            requests[0].conversation.system_prompt(),
            Some("You add numbers.")
        );
        assert_eq!(
            requests[0].tool_names.as_deref(),
            Some(&["sum_tool".to_string()][..])
        );
        assert_eq!(requests[0].tool_choice, ToolChoice::Required);
    }

    #[tokio::test]
    async fn only_first_tool_call_is_used() {
        let gateway = ScriptedGateway::new(vec![Scripted::Response(
            LlmResponse::default()
                .with_tool_call(ProposedToolCall::new(
                    "sum_tool",
                    serde_json::json!({"a": 1, "b": 2}).into(),
                ))
                .with_tool_call(ProposedToolCall::new(
                    "sum_tool",
                    ToolArguments::Encoded("{bad".to_string()),
                )),
        )]);
        let result = engine(gateway, 1).invoke_with_tools(&input()).await.unwrap();
        assert_eq!(result.get_i64("b"), Some(2));
    }

    #[tokio::test]
    async fn validate_policy_rejects_malformed_extra_calls() {
        let gateway = ScriptedGateway::new(vec![Scripted::Response(
            LlmResponse::default()
                .with_tool_call(ProposedToolCall::new(
                    "sum_tool",
                    serde_json::json!({"a": 1, "b": 2}).into(),
                ))
                .with_tool_call(ProposedToolCall::new(
                    "sum_tool",
                    ToolArguments::Encoded("{bad".to_string()),
                )),
        )]);
        let engine = InvocationEngine::new(
            gateway.clone(),
            InvocationParams::default().with_extra_tool_calls(ExtraToolCallPolicy::Validate),
        );
        let err = engine.invoke_with_tools(&input()).await.unwrap_err();
        assert!(matches!(err, InvokeError::ArgumentParse(_)));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn reject_policy_fails_on_multiple_calls() {
        let gateway = ScriptedGateway::new(vec![Scripted::Response(
            LlmResponse::default()
                .with_tool_call(ProposedToolCall::new("sum_tool", ToolArguments::default()))
                .with_tool_call(ProposedToolCall::new("sum_tool", ToolArguments::default())),
        )]);
        let engine = InvocationEngine::new(
            gateway.clone(),
            InvocationParams::default().with_extra_tool_calls(ExtraToolCallPolicy::Reject),
        );
        let err = engine.invoke_with_tools(&input()).await.unwrap_err();
        assert!(matches!(err, InvokeError::MultipleToolCalls { count: 2 }));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_requests_make_no_calls() {
        let gateway = ScriptedGateway::new(vec![]);
        let engine = engine(gateway.clone(), 3);

        let empty_tools = ToolInvocationInput::new("sys", "user", ToolSet::empty());
        assert!(matches!(
            engine.invoke_with_tools(&empty_tools).await,
            Err(InvokeError::InvalidRequest(_))
        ));

        let blank_prompt = ToolInvocationInput::new("  ", "user", sum_tools());
        assert!(matches!(
            engine.invoke_with_tools(&blank_prompt).await,
            Err(InvokeError::InvalidRequest(_))
        ));

        let unknown_choice = input().with_tool_choice(ToolChoice::tool("missing_tool"));
        assert!(matches!(
            engine.invoke_with_tools(&unknown_choice).await,
            Err(InvokeError::InvalidRequest(_))
        ));

        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn auto_choice_allows_empty_tool_set() {
        let gateway = ScriptedGateway::new(vec![text("free answer")]);
        let input =
            ToolInvocationInput::new("sys", "user", ToolSet::empty()).with_tool_choice(ToolChoice::Auto);
        let result = engine(gateway, 1).invoke_with_tools(&input).await.unwrap();
        assert_eq!(result.response_text(), Some("free answer"));
    }

    #[tokio::test]
    async fn progress_and_log_see_every_attempt() {
        let gateway = ScriptedGateway::new(vec![
            Scripted::Error("timeout".to_string()),
            no_call(),
            call("sum_tool", serde_json::json!({"a": 2, "b": 3})),
        ]);
        let progress = Arc::new(RecordingProgress::default());
        let logger = Arc::new(MemoryLogger::default());
        let engine = engine(gateway, 3)
            .with_progress(progress.clone())
            .with_conversation_logger(logger.clone());

        engine.invoke_with_tools(&input()).await.unwrap();

        assert_eq!(
            *progress.outcomes.lock().unwrap(),
            vec![
                (1, AttemptOutcome::TransportError),
                (2, AttemptOutcome::NoToolCall),
                (3, AttemptOutcome::ToolCallFound),
            ]
        );
        assert_eq!(*progress.finished.lock().unwrap(), Some(true));

        let events = logger.events.lock().unwrap();
        let types: Vec<&str> = events.iter().map(|(t, _)| *t).collect();
        assert_eq!(types.first(), Some(&"invocation_started"));
        assert_eq!(types.last(), Some(&"invocation_finished"));
        let requests: Vec<&Value> = events
            .iter()
            .filter(|(t, _)| *t == "llm_request")
            .map(|(_, payload)| payload)
            .collect();
        assert_eq!(requests.len(), 3);
        for (index, payload) in requests.iter().enumerate() {
            assert_eq!(payload["attempt"], index as u64 + 1);
            assert!(payload.get("outcome").is_none());
            assert!(payload.get("error").is_none());
        }
        assert_eq!(types.iter().filter(|t| **t == "attempt_outcome").count(), 3);
        assert_eq!(events.last().unwrap().1["result"]["a"], 2);
    }

    // ==================== invoke_simple ====================

    #[tokio::test]
    async fn invoke_simple_returns_text_verbatim() {
        let gateway = ScriptedGateway::new(vec![text("  Brasília\n")]);
        let answer = engine(gateway.clone(), 3)
            .invoke_simple(
                "You are concise.",
                "What is my name?",
                &[Message::user("My name is Lucas"), Message::assistant("Nice to meet you")],
            )
            .await
            .unwrap();

        assert_eq!(answer, "  Brasília\n");
        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].tool_names.is_none());
        assert_eq!(requests[0].conversation.len(), 4);
    }

    #[tokio::test]
    async fn invoke_simple_does_not_retry() {
        let gateway = ScriptedGateway::new(vec![
            Scripted::Error("down".to_string()),
            text("never reached"),
        ]);
        let err = engine(gateway.clone(), 3)
            .invoke_simple("sys", "user", &[])
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(gateway.calls(), 1);
    }

    // ==================== invoke_with_conversation ====================

    #[tokio::test]
    async fn conversation_without_tools_wraps_text() {
        let gateway = ScriptedGateway::new(vec![text("We discussed customer data.")]);
        let history = Conversation::new(vec![
            Message::system("You are a data analyst."),
            Message::user("Summarize what we discussed"),
        ]);
        let result = engine(gateway.clone(), 3)
            .invoke_with_conversation(&history, None, &ToolChoice::Auto)
            .await
            .unwrap();

        assert_eq!(result.response_text(), Some("We discussed customer data."));
        assert_eq!(gateway.requests()[0].conversation, history);
    }

    #[tokio::test]
    async fn conversation_with_tools_returns_arguments() {
        let gateway = ScriptedGateway::new(vec![call(
            "sum_tool",
            ToolArguments::Encoded(r#"{"a":4,"b":5}"#.to_string()),
        )]);
        let history = Conversation::new(vec![Message::user("add 4 and 5")]);
        let tools = sum_tools();
        let result = engine(gateway.clone(), 3)
            .invoke_with_conversation(&history, Some(&tools), &ToolChoice::Auto)
            .await
            .unwrap();

        assert_eq!(result.get_i64("b"), Some(5));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn conversation_with_tools_but_no_call_wraps_text_once() {
        let gateway = ScriptedGateway::new(vec![text("no tool needed"), text("unused")]);
        let history = Conversation::new(vec![Message::user("hi")]);
        let tools = sum_tools();
        let result = engine(gateway.clone(), 3)
            .invoke_with_conversation(&history, Some(&tools), &ToolChoice::Required)
            .await
            .unwrap();

        assert_eq!(result.response_text(), Some("no tool needed"));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn conversation_with_bad_arguments_fails() {
        let gateway = ScriptedGateway::new(vec![call(
            "sum_tool",
            ToolArguments::Encoded("{bad json".to_string()),
        )]);
        let history = Conversation::new(vec![Message::user("add")]);
        let tools = sum_tools();
        let err = engine(gateway, 3)
            .invoke_with_conversation(&history, Some(&tools), &ToolChoice::Auto)
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::ArgumentParse(_)));
    }

    #[test]
    fn classify_outcomes() {
        let tool_response = LlmResponse::default()
            .with_tool_call(ProposedToolCall::new("t", ToolArguments::default()));
        assert_eq!(
            classify(&tool_response, &ToolChoice::Auto),
            AttemptOutcome::ToolCallFound
        );
        assert_eq!(
            classify(&LlmResponse::from_text("hi"), &ToolChoice::Auto),
            AttemptOutcome::TextFallback
        );
        assert_eq!(
            classify(&LlmResponse::from_text("hi"), &ToolChoice::Required),
            AttemptOutcome::NoToolCall
        );
        assert_eq!(
            classify(&LlmResponse::default(), &ToolChoice::Auto),
            AttemptOutcome::NoToolCall
        );
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<InvocationEngine>();
    }
}
