//! Tool Dispatcher with Timeout and Retry
//!
//! Information Hiding:
//! - Handler lookup hidden behind the registry
//! - Timeout, panic capture and backoff hidden
//! - Every outcome folded into a `ToolResult`

use super::{Tool, ToolConfig, ToolError, ToolRegistry, ToolResult, ValidatedArguments};
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration};

/// Routes validated calls to their handlers
///
/// Never fails at the outer level: unknown tools, handler errors,
/// panics and timeouts all come back as [`ToolResult::Failure`].
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    config: ToolConfig,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, config: ToolConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Run `tool_name` with already validated arguments
    pub async fn dispatch(&self, tool_name: &str, args: ValidatedArguments) -> ToolResult {
        let tool = match self.registry.handler(tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                tracing::warn!("Dispatch rejected: {}", e);
                return ToolResult::failure(e);
            }
        };

        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let backoff_ms = self.calculate_backoff(attempt);
                tracing::warn!(
                    "Retrying tool '{}' (attempt {}/{}) after {}ms",
                    tool_name,
                    attempt + 1,
                    max_attempts,
                    backoff_ms
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }

            match self.invoke(&tool, args.clone()).await {
                Ok(value) => return ToolResult::success(value),
                Err(e) if e.is_retryable() => {
                    tracing::warn!("Tool '{}' failed: {}", tool_name, e);
                    last_error = Some(e);
                }
                Err(e) => {
                    tracing::warn!("Tool '{}' failed: {}", tool_name, e);
                    return ToolResult::failure(e);
                }
            }
        }

        ToolResult::failure(last_error.unwrap_or_else(|| {
            ToolError::execution(format!("tool '{}' was never attempted", tool_name))
        }))
    }

    /// One bounded, panic-safe handler call
    async fn invoke(&self, tool: &Arc<dyn Tool>, args: ValidatedArguments) -> Result<Value, ToolError> {
        let call = AssertUnwindSafe(tool.call(args)).catch_unwind();

        match timeout(Duration::from_secs(self.config.timeout_secs), call).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(e))) => Err(ToolError::execution(format!("{:#}", e))),
            Ok(Err(panic)) => Err(ToolError::execution(format!(
                "tool panicked: {}",
                panic_message(&*panic)
            ))),
            Err(_) => Err(ToolError::Timeout {
                secs: self.config.timeout_secs,
            }),
        }
    }

    /// Exponential backoff delay (internal implementation)
    fn calculate_backoff(&self, attempt: u32) -> u64 {
        let base_delay = 100;
        let max_delay = 5000;

        let delay = 2_u64.saturating_pow(attempt).saturating_mul(base_delay);
        delay.min(max_delay)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
