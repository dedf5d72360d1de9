use crate::agent::{AgentAnswer, ToolCallRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub iterations: usize,
    pub tool_calls: Vec<ToolCallRecord>,
}

impl From<AgentAnswer> for AskResponse {
    fn from(answer: AgentAnswer) -> Self {
        Self {
            answer: answer.answer,
            iterations: answer.iterations,
            tool_calls: answer.tool_calls,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Registered tool count
    pub tools: usize,
}
