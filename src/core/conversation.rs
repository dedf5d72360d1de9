//! Conversation turns exchanged with the completion service

use crate::tools::ToolResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// A model-issued request to run one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    /// Correlates the request with its tool-result turn
    pub id: String,
    pub tool_name: String,
    pub raw_arguments: Map<String, Value>,
}

impl ToolInvocationRequest {
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>, raw_arguments: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            raw_arguments,
        }
    }
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Option<String>,
    /// Set on assistant turns that request tools
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolInvocationRequest>,
    /// Set on tool-result turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Message {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    pub fn assistant_tool_calls(content: Option<String>, calls: Vec<ToolInvocationRequest>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls: calls,
            tool_call_id: None,
            tool_name: None,
        }
    }

    pub fn tool_result(request: &ToolInvocationRequest, result: &ToolResult) -> Self {
        Self {
            role: Role::Tool,
            content: Some(result.to_message_content()),
            tool_calls: Vec::new(),
            tool_call_id: Some(request.id.clone()),
            tool_name: Some(request.tool_name.clone()),
        }
    }

    pub fn is_tool_result(&self) -> bool {
        self.role == Role::Tool
    }
}
