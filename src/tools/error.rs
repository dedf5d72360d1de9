//! Tool error types.

/// Per-call failure reported back to the model as a tool-result turn.
///
/// None of these abort a conversation: the orchestrator converts every
/// variant into a [`ToolResult::Failure`](super::ToolResult::Failure).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    #[error("missing required argument '{name}'")]
    MissingRequiredArgument { name: String },

    #[error("unknown argument '{name}'")]
    UnknownArgument { name: String },

    #[error("argument '{name}' expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("{reason}")]
    Execution { reason: String },

    #[error("tool timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl ToolError {
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable name, used in tool-result payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "unknown_tool",
            Self::MissingRequiredArgument { .. } => "missing_required_argument",
            Self::UnknownArgument { .. } => "unknown_argument",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::Execution { .. } => "tool_execution",
            Self::Timeout { .. } => "timeout",
        }
    }

    /// Only timeouts are worth another attempt; everything else is
    /// deterministic for the same arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Error raised while building the tool catalog. Fatal at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("tool '{name}' is already registered")]
    DuplicateTool { name: String },

    #[error("tool '{name}' has an invalid contract: {reason}")]
    InvalidContract { name: String, reason: String },
}
