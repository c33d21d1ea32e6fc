//! Run Chat use case.
//!
//! [`ConversationOrchestrator`] drives one user message through the
//! model/tool loop:
//!
//! ```text
//! AwaitingModel ──(tool calls)──▶ ExecutingTools ──▶ AwaitingModel ──▶ … ──▶ Done
//!       │                                                                    ▲
//!       └──────────────────────(no tool calls)────────────────────────────────┘
//! ```
//!
//! The loop is bounded by [`ChatParams::max_iterations`] model calls. Tool
//! failures are fed back to the model as structured error turns; gateway
//! failures abort the loop and are recovered at the top level with a direct
//! catalog search and an apology.

use crate::config::ChatParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::conversation_memory::ConversationMemory;
use crate::ports::llm_gateway::{GatewayError, GenerateRequest, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::conversation_lock::ConversationLocks;
use shopwise_domain::util::{extract_search_term, truncate_str};
use shopwise_domain::{
    ChatRequest, ChatTurn, ConversationalResponse, DomainError, LlmResponse, Product,
    ProductAccumulator, PromptTemplate, ToolCall, ToolExecutionResult, ToolKind,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can end a chat run.
///
/// Only [`ChatError::Gateway`] is recoverable; [`ConversationOrchestrator::handle`]
/// turns it into a fallback response.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<DomainError> for ChatError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidRequest(msg) => ChatError::InvalidRequest(msg),
            DomainError::Cancelled => ChatError::Cancelled,
        }
    }
}

/// How a chat run produced its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatExit {
    /// The model replied without requesting tools
    Completed,
    /// The iteration budget ran out while the model still wanted tools
    BudgetExhausted,
    /// No credentials; the fixed configuration reply was returned
    MissingCredentials,
    /// The loop failed and the fallback search answered instead
    Recovered,
}

/// Result of [`ConversationOrchestrator::handle`].
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: ConversationalResponse,
    /// Model calls made by the loop (0 when it never ran or was recovered)
    pub iterations: usize,
    pub exit: ChatExit,
}

/// Loop state for one run
#[derive(Debug)]
enum LoopState {
    AwaitingModel { prompt: String },
    ExecutingTools { calls: Vec<ToolCall> },
    Done(ChatExit),
}

/// Accumulators scoped to one run
struct RunState {
    history: Vec<ChatTurn>,
    products: ProductAccumulator,
    final_text: String,
    iterations: usize,
    tools_ran: bool,
}

/// Orchestrates one conversation run per inbound message.
///
/// Shared across concurrent conversations; runs on the same conversation id
/// are serialized.
pub struct ConversationOrchestrator {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    memory: Arc<dyn ConversationMemory>,
    conversation_logger: Arc<dyn ConversationLogger>,
    locks: Arc<ConversationLocks>,
    params: ChatParams,
}

impl ConversationOrchestrator {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
        memory: Arc<dyn ConversationMemory>,
    ) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            memory,
            conversation_logger: Arc::new(NoConversationLogger),
            locks: Arc::new(ConversationLocks::new()),
            params: ChatParams::default(),
        }
    }

    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &ChatParams {
        &self.params
    }

    /// Handle one user message.
    ///
    /// Returns `Err` only for a blank message or cancellation. A blank
    /// message is rejected with [`ChatError::InvalidRequest`] instead of a
    /// canned reply: it is a caller error, and nothing is sent to the model
    /// or saved. Every other outcome, including gateway failure, is a
    /// response with non-empty text.
    pub async fn handle(
        &self,
        request: ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome, ChatError> {
        request.validate()?;

        let Some(credentials) = request.credentials() else {
            info!(user_id = %request.user_id, "No credentials configured; skipping model call");
            return Ok(ChatOutcome {
                response: ConversationalResponse::text_only(PromptTemplate::missing_credentials()),
                iterations: 0,
                exit: ChatExit::MissingCredentials,
            });
        };

        if cancel.is_cancelled() {
            return Err(ChatError::Cancelled);
        }

        let _guard = match request.conversation_id {
            Some(id) => tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ChatError::Cancelled),
                guard = self.locks.acquire(id) => Some(guard),
            },
            None => None,
        };

        info!(
            conversation_id = ?request.conversation_id,
            user_id = %request.user_id,
            "Starting chat run: {}",
            truncate_str(&request.message, 100)
        );

        match self.run(&request, credentials, cancel).await {
            Ok(outcome) => Ok(outcome),
            Err(ChatError::Cancelled) => {
                info!(conversation_id = ?request.conversation_id, "Chat run cancelled");
                Err(ChatError::Cancelled)
            }
            Err(e) => {
                warn!(
                    conversation_id = ?request.conversation_id,
                    error = %e,
                    "Chat run failed; attempting fallback search"
                );
                let recovered = self.recover(&request, cancel).await;
                if matches!(recovered, Err(ChatError::Cancelled)) {
                    info!(conversation_id = ?request.conversation_id, "Fallback search cancelled");
                }
                recovered
            }
        }
    }

    async fn run(
        &self,
        request: &ChatRequest,
        credentials: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome, ChatError> {
        let tools = self
            .tool_schema
            .all_tools_schema(self.tool_executor.tool_definitions());
        let system_prompt = PromptTemplate::with_user(self.params.system_prompt(), &request.user_id);

        let mut run = RunState {
            history: self.load_history(request.conversation_id).await,
            products: ProductAccumulator::new(),
            final_text: String::new(),
            iterations: 0,
            tools_ran: false,
        };

        debug!(
            history_turns = run.history.len(),
            tools = tools.len(),
            "Chat loop starting"
        );

        let mut state = LoopState::AwaitingModel {
            prompt: PromptTemplate::user_prompt(&request.message, &request.context_products),
        };

        let exit = loop {
            state = match state {
                LoopState::AwaitingModel { prompt } => {
                    run.iterations += 1;
                    let response = self
                        .call_model(&prompt, &system_prompt, &run.history, &tools, credentials, cancel)
                        .await?;

                    debug!(
                        iteration = run.iterations,
                        tool_calls = response.tool_calls.len(),
                        "Model replied"
                    );

                    run.history.push(ChatTurn::user(prompt));
                    run.history.push(ChatTurn::model_with_calls(
                        response.text.clone(),
                        response.tool_calls.clone(),
                    ));
                    if response.has_text() {
                        run.final_text = response.text;
                    }

                    if response.tool_calls.is_empty() {
                        LoopState::Done(ChatExit::Completed)
                    } else {
                        LoopState::ExecutingTools {
                            calls: response.tool_calls,
                        }
                    }
                }
                LoopState::ExecutingTools { calls } => {
                    self.execute_tools(&calls, &mut run, cancel).await?;

                    if run.iterations >= self.params.max_iterations {
                        warn!(
                            iterations = run.iterations,
                            "Chat loop exceeded max_iterations ({})", self.params.max_iterations
                        );
                        LoopState::Done(ChatExit::BudgetExhausted)
                    } else {
                        LoopState::AwaitingModel {
                            prompt: PromptTemplate::narrate_tool_results().to_string(),
                        }
                    }
                }
                LoopState::Done(exit) => break exit,
            };
        };

        let products = run.products.into_products();
        let text = compose_text(run.final_text, exit, run.tools_ran, &products);

        info!(
            conversation_id = ?request.conversation_id,
            iterations = run.iterations,
            products = products.len(),
            "Chat run completed"
        );

        self.finish(request, &text, &products);
        self.persist(request, &text).await;

        Ok(ChatOutcome {
            response: ConversationalResponse::new(text, products),
            iterations: run.iterations,
            exit,
        })
    }

    async fn call_model(
        &self,
        prompt: &str,
        system_prompt: &str,
        history: &[ChatTurn],
        tools: &[serde_json::Value],
        credentials: &str,
        cancel: &CancellationToken,
    ) -> Result<LlmResponse, ChatError> {
        self.conversation_logger.log(ConversationEvent::new(
            "llm_request",
            serde_json::json!({
                "prompt": prompt,
                "history_turns": history.len(),
                "tools": tools.len(),
            }),
        ));

        let request = GenerateRequest {
            prompt,
            system_prompt,
            history,
            tools,
            credentials: Some(credentials),
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ChatError::Cancelled),
            result = self.gateway.generate(request) => result,
        };

        let response = response.map_err(|e| {
            if e.is_cancelled() {
                ChatError::Cancelled
            } else {
                ChatError::Gateway(e)
            }
        })?;

        self.conversation_logger.log(ConversationEvent::new(
            "llm_response",
            serde_json::json!({
                "text": response.text,
                "tool_calls": response.tool_calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "finish_reason": response.finish_reason,
            }),
        ));

        Ok(response)
    }

    async fn execute_tools(
        &self,
        calls: &[ToolCall],
        run: &mut RunState,
        cancel: &CancellationToken,
    ) -> Result<(), ChatError> {
        let budget = self.params.tool_time_budget;
        run.tools_ran = true;

        for call in calls {
            self.conversation_logger.log(ConversationEvent::new(
                "tool_call",
                serde_json::json!({
                    "call_id": call.call_id,
                    "tool": call.name,
                    "arguments": call.arguments_json(),
                }),
            ));
        }

        let results = if self.params.parallel_tools {
            self.tool_executor.execute_batch(calls, budget, cancel).await
        } else {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                let result = self.tool_executor.execute(call, budget, cancel).await;
                if result.is_cancelled() {
                    return Err(ChatError::Cancelled);
                }
                results.push(result);
            }
            results
        };

        for (call, result) in calls.iter().zip(results) {
            if result.is_cancelled() || cancel.is_cancelled() {
                return Err(ChatError::Cancelled);
            }
            self.absorb_result(call, &result, run);
        }
        Ok(())
    }

    fn absorb_result(&self, call: &ToolCall, result: &ToolExecutionResult, run: &mut RunState) {
        if result.is_success() {
            debug!(tool = %call.name, call_id = %call.call_id, "Tool succeeded");
        } else {
            warn!(
                tool = %call.name,
                call_id = %call.call_id,
                code = ?result.error_code,
                "Tool failed: {}",
                result.error_message.as_deref().unwrap_or("unknown error")
            );
        }

        if let Some(entries) = result.products() {
            let (parsed, skipped) = run.products.absorb_entries(entries);
            if skipped > 0 {
                debug!(tool = %call.name, parsed, skipped, "Skipped malformed product entries");
            }
        }

        let payload = result.to_payload();
        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            serde_json::json!({
                "call_id": call.call_id,
                "tool": call.name,
                "success": result.is_success(),
                "payload": payload,
            }),
        ));
        run.history.push(ChatTurn::tool_result(&call.name, payload));
    }

    /// Best-effort answer after the loop failed: one direct search on a
    /// term extracted from the message.
    ///
    /// Cancellation during the search returns before anything is logged or saved.
    async fn recover(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome, ChatError> {
        let search = ToolKind::SearchProducts.name();
        let mut products = ProductAccumulator::new();

        if self.tool_executor.has_tool(search) {
            let term = extract_search_term(&request.message);
            let call = ToolCall::new(search)
                .with_arg("query", term.clone())
                .with_arg("max_results", self.params.fallback_search_limit as i64);
            let result = self
                .tool_executor
                .execute(&call, self.params.tool_time_budget, cancel)
                .await;
            if result.is_cancelled() {
                return Err(ChatError::Cancelled);
            }
            if let Some(entries) = result.products() {
                products.absorb_entries(entries);
            }
            debug!(term = %term, found = products.len(), "Fallback search finished");
        }

        if cancel.is_cancelled() {
            return Err(ChatError::Cancelled);
        }

        let products = products.into_products();
        let text = if products.is_empty() {
            PromptTemplate::apology().to_string()
        } else {
            PromptTemplate::apology_with_results(products.len())
        };

        self.finish(request, &text, &products);
        self.persist(request, &text).await;

        Ok(ChatOutcome {
            response: ConversationalResponse::new(text, products),
            iterations: 0,
            exit: ChatExit::Recovered,
        })
    }

    async fn load_history(&self, conversation_id: Option<i64>) -> Vec<ChatTurn> {
        let Some(id) = conversation_id else {
            return Vec::new();
        };
        match self.memory.get_history(id, self.params.history_limit).await {
            Ok(history) => history,
            Err(e) => {
                warn!(conversation_id = id, error = %e, "Failed to load history; continuing without it");
                Vec::new()
            }
        }
    }

    /// Save the user message and the final reply
    async fn persist(&self, request: &ChatRequest, text: &str) {
        let Some(id) = request.conversation_id else {
            return;
        };
        for turn in [ChatTurn::user(request.message.clone()), ChatTurn::model(text)] {
            if let Err(e) = self.memory.save_turn(id, turn).await {
                warn!(conversation_id = id, error = %e, "Failed to save turn");
            }
        }
    }

    fn finish(&self, request: &ChatRequest, text: &str, products: &[Product]) {
        self.conversation_logger.log(ConversationEvent::new(
            "chat_response",
            serde_json::json!({
                "conversation_id": request.conversation_id,
                "user_id": request.user_id,
                "bytes": text.len(),
                "text": text,
                "product_ids": products.iter().map(|p| p.id).collect::<Vec<_>>(),
            }),
        ));
    }
}

/// Make sure the reply is non-empty and acknowledges attached products
fn compose_text(final_text: String, exit: ChatExit, tools_ran: bool, products: &[Product]) -> String {
    let mut text = final_text.trim().to_string();

    if text.is_empty() && exit == ChatExit::BudgetExhausted {
        text = PromptTemplate::tools_acknowledgement().to_string();
    }

    if text.is_empty() {
        text = if !products.is_empty() {
            PromptTemplate::products_found(products.len())
        } else if tools_ran {
            PromptTemplate::tools_acknowledgement().to_string()
        } else {
            PromptTemplate::apology().to_string()
        };
    } else if !products.is_empty() && !PromptTemplate::mentions_products(&text, products) {
        text.push_str("\n\n");
        text.push_str(&PromptTemplate::products_addendum(products.len()));
    }

    text
}
