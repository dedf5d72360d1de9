use crate::core::{CompletionError, Message};
use serde::Serialize;

/// One dispatched (or rejected) tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallRecord {
    pub tool: String,
    pub success: bool,
    pub duration_ms: u64,
}

/// Result of a conversation that reached a final answer
#[derive(Debug, Clone)]
pub struct AgentAnswer {
    pub answer: String,
    /// Model/tool round trips taken
    pub iterations: usize,
    pub tool_calls: Vec<ToolCallRecord>,
    /// Full conversation, final assistant turn included
    pub messages: Vec<Message>,
}

/// Errors that end a conversation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrchestratorError {
    #[error("model kept requesting tools after {limit} round trips")]
    TooManyIterations { limit: usize },

    #[error(transparent)]
    CompletionService(#[from] CompletionError),
}

impl OrchestratorError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TooManyIterations { .. } => "too_many_iterations",
            Self::CompletionService(_) => "completion_service",
        }
    }
}
