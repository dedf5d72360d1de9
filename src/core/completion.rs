//! Completion service boundary
//!
//! The orchestrator only knows this trait. Whether the model behind it is
//! a hosted API or a test script is invisible to the loop.

use super::conversation::{Message, ToolInvocationRequest};
use crate::tools::ToolContract;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How freely the model may call tools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
    None,
    Required,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Required => "required",
        }
    }
}

/// Everything one completion call needs
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub tools: &'a [ToolContract],
    pub model: &'a str,
    pub tool_choice: ToolChoice,
}

/// What the model decided to do
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Terminal text answer
    Answer { text: String },
    /// One or more tools to run before asking again
    ToolCalls {
        content: Option<String>,
        calls: Vec<ToolInvocationRequest>,
    },
}

impl Completion {
    pub fn answer(text: impl Into<String>) -> Self {
        Self::Answer { text: text.into() }
    }

    pub fn tool_call(call: ToolInvocationRequest) -> Self {
        Self::ToolCalls {
            content: None,
            calls: vec![call],
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Transport failures, rate limits and server errors may succeed on retry
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion, CompletionError>;
}
