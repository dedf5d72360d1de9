use super::outcome::{AgentAnswer, OrchestratorError, ToolCallRecord};
use crate::config::Settings;
use crate::core::{
    Completion, CompletionError, CompletionRequest, CompletionService, LLMClient, Message,
    ToolChoice, ToolInvocationRequest,
};
use crate::tools::executor::ToolDispatcher;
use crate::tools::{validate, ToolConfig, ToolContract, ToolRegistry, ToolResult, ValidatedArguments};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub model: String,
    pub tool_choice: ToolChoice,
    /// Maximum model -> tool round trips per question
    pub max_iterations: usize,
    pub system_prompt: Option<String>,
}

impl OrchestratorConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model: settings.llm.model.clone(),
            tool_choice: settings.llm.tool_choice,
            max_iterations: settings.agent.max_iterations,
            system_prompt: settings.llm.system_prompt.clone(),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

enum LoopState {
    AwaitingModel,
    ExecutingTool(Vec<PendingCall>),
    Done(String),
    Failed(OrchestratorError),
}

struct PendingCall {
    request: ToolInvocationRequest,
    action: PendingAction,
}

enum PendingAction {
    Dispatch(ValidatedArguments),
    /// Rejected before reaching a handler
    Resolved(ToolResult),
}

/// Drives one question through the model until it answers
///
/// Holds no per-request state, so one instance can serve concurrent
/// requests. Each call to [`Orchestrator::run`] owns its message history.
pub struct Orchestrator {
    completion: Arc<dyn CompletionService>,
    dispatcher: ToolDispatcher,
    contracts: Vec<ToolContract>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        registry: Arc<ToolRegistry>,
        tool_config: ToolConfig,
        config: OrchestratorConfig,
    ) -> Self {
        let contracts = registry.contracts();
        Self {
            completion,
            dispatcher: ToolDispatcher::new(registry, tool_config),
            contracts,
            config,
        }
    }

    /// Production wiring: built-in tools and the HTTP completion client
    pub fn from_settings(
        settings: &Settings,
        api_key: String,
        weather_api_key: Option<String>,
    ) -> anyhow::Result<Self> {
        let registry = ToolRegistry::with_defaults(&settings.tools, weather_api_key)?;
        let client = LLMClient::new(api_key, settings.llm.clone())?;

        Ok(Self::new(
            Arc::new(client),
            Arc::new(registry),
            ToolConfig::from(&settings.tools),
            OrchestratorConfig::from_settings(settings),
        ))
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.dispatcher.registry()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub async fn run(&self, question: &str) -> Result<AgentAnswer, OrchestratorError> {
        let mut messages = Vec::new();
        if let Some(prompt) = &self.config.system_prompt {
            messages.push(Message::system(prompt.clone()));
        }
        messages.push(Message::user(question));

        let mut round_trips = 0;
        let mut records = Vec::new();
        let mut state = LoopState::AwaitingModel;

        loop {
            state = match state {
                LoopState::AwaitingModel => {
                    tracing::info!(
                        "Orchestrator iteration {}/{}",
                        round_trips + 1,
                        self.config.max_iterations
                    );

                    match self.request_completion(&messages).await {
                        Ok(Completion::Answer { text }) => {
                            messages.push(Message::assistant(text.clone()));
                            LoopState::Done(text)
                        }
                        Ok(Completion::ToolCalls { content, calls }) if calls.is_empty() => {
                            match content {
                                Some(text) => {
                                    messages.push(Message::assistant(text.clone()));
                                    LoopState::Done(text)
                                }
                                None => LoopState::Failed(
                                    CompletionError::Malformed(
                                        "response has neither text nor tool calls".to_string(),
                                    )
                                    .into(),
                                ),
                            }
                        }
                        Ok(Completion::ToolCalls { .. })
                            if round_trips >= self.config.max_iterations =>
                        {
                            LoopState::Failed(OrchestratorError::TooManyIterations {
                                limit: self.config.max_iterations,
                            })
                        }
                        Ok(Completion::ToolCalls { content, calls }) => {
                            round_trips += 1;
                            let pending = calls.iter().map(|call| self.prepare(call)).collect();
                            messages.push(Message::assistant_tool_calls(content, calls));
                            LoopState::ExecutingTool(pending)
                        }
                        Err(e) => LoopState::Failed(e.into()),
                    }
                }

                LoopState::ExecutingTool(pending) => {
                    for call in pending {
                        let started = Instant::now();
                        let result = match call.action {
                            PendingAction::Dispatch(args) => {
                                tracing::info!("Dispatching tool: {}", call.request.tool_name);
                                self.dispatcher.dispatch(&call.request.tool_name, args).await
                            }
                            PendingAction::Resolved(result) => result,
                        };

                        tracing::debug!("Tool result: {}", result.to_message_content());

                        records.push(ToolCallRecord {
                            tool: call.request.tool_name.clone(),
                            success: result.is_success(),
                            duration_ms: started.elapsed().as_millis() as u64,
                        });
                        messages.push(Message::tool_result(&call.request, &result));
                    }
                    LoopState::AwaitingModel
                }

                LoopState::Done(answer) => {
                    tracing::info!("Final answer after {} round trips", round_trips);
                    return Ok(AgentAnswer {
                        answer,
                        iterations: round_trips,
                        tool_calls: records,
                        messages,
                    });
                }

                LoopState::Failed(e) => {
                    tracing::error!("Orchestration failed: {}", e);
                    return Err(e);
                }
            };
        }
    }

    async fn request_completion(&self, messages: &[Message]) -> Result<Completion, CompletionError> {
        self.completion
            .complete(CompletionRequest {
                messages,
                tools: &self.contracts,
                model: &self.config.model,
                tool_choice: self.config.tool_choice,
            })
            .await
    }

    /// Validate a requested call; failures never reach the handler
    fn prepare(&self, request: &ToolInvocationRequest) -> PendingCall {
        let validated = self
            .registry()
            .lookup(&request.tool_name)
            .and_then(|contract| validate(contract, &request.raw_arguments));

        let action = match validated {
            Ok(args) => PendingAction::Dispatch(args),
            Err(e) => {
                tracing::warn!("Rejected call to '{}': {}", request.tool_name, e);
                PendingAction::Resolved(ToolResult::failure(e))
            }
        };

        PendingCall {
            request: request.clone(),
            action,
        }
    }
}
