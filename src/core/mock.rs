//! Scripted completion service for tests
//!
//! Responses are served from a FIFO queue. Every request is recorded so
//! tests can assert on what the orchestrator actually sent.

use super::completion::{Completion, CompletionError, CompletionRequest, CompletionService, ToolChoice};
use super::conversation::{Message, ToolInvocationRequest};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Snapshot of one request received by [`ScriptedCompletionService`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
    pub model: String,
    pub tool_choice: ToolChoice,
}

#[derive(Default)]
pub struct ScriptedCompletionService {
    script: Mutex<VecDeque<Result<Completion, CompletionError>>>,
    fallback: Option<Completion>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_call_id: AtomicUsize,
}

impl ScriptedCompletionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Served whenever the queue is empty
    pub fn with_fallback(mut self, completion: Completion) -> Self {
        self.fallback = Some(completion);
        self
    }

    pub fn queue_answer(&self, text: impl Into<String>) -> &Self {
        self.push(Ok(Completion::answer(text)))
    }

    /// Queue a single tool call; `arguments` should be a JSON object
    pub fn queue_tool_call(&self, tool_name: impl Into<String>, arguments: Value) -> &Self {
        let call = self.call(tool_name, arguments);
        self.push(Ok(Completion::tool_call(call)))
    }

    pub fn queue_tool_calls<I, S>(&self, calls: I) -> &Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let calls = calls
            .into_iter()
            .map(|(name, arguments)| self.call(name, arguments))
            .collect();
        self.push(Ok(Completion::ToolCalls {
            content: None,
            calls,
        }))
    }

    pub fn queue_error(&self, error: CompletionError) -> &Self {
        self.push(Err(error))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Builds a call with a generated `call_N` id
    pub fn call(&self, tool_name: impl Into<String>, arguments: Value) -> ToolInvocationRequest {
        let n = self.next_call_id.fetch_add(1, Ordering::SeqCst) + 1;
        let raw_arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        ToolInvocationRequest::new(format!("call_{}", n), tool_name, raw_arguments)
    }

    fn push(&self, entry: Result<Completion, CompletionError>) -> &Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
        self
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletionService {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                messages: request.messages.to_vec(),
                tool_names: request.tools.iter().map(|t| t.name.clone()).collect(),
                model: request.model.to_string(),
                tool_choice: request.tool_choice,
            });
        }

        let next = self.script.lock().ok().and_then(|mut script| script.pop_front());

        match (next, &self.fallback) {
            (Some(entry), _) => entry,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(CompletionError::Malformed("script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_serves_queue_in_order_and_records() {
        let service = ScriptedCompletionService::new();
        service
            .queue_tool_call("sum_of_two_numbers", json!({"firstNumber": 1, "secondNumber": 2}))
            .queue_answer("3");

        let messages = vec![Message::user("1 + 2?")];
        let request = CompletionRequest {
            messages: &messages,
            tools: &[],
            model: "scripted",
            tool_choice: ToolChoice::Auto,
        };

        match service.complete(request).await.unwrap() {
            Completion::ToolCalls { calls, .. } => assert_eq!(calls[0].id, "call_1"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(service.complete(request).await.unwrap(), Completion::answer("3"));
        assert!(matches!(
            service.complete(request).await,
            Err(CompletionError::Malformed(_))
        ));

        let recorded = service.requests();
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0].model, "scripted");
        assert_eq!(recorded[0].messages, messages);
    }

    #[tokio::test]
    async fn test_fallback_when_queue_is_empty() {
        let service = ScriptedCompletionService::new().with_fallback(Completion::answer("done"));
        let request = CompletionRequest {
            messages: &[],
            tools: &[],
            model: "scripted",
            tool_choice: ToolChoice::Auto,
        };

        assert_eq!(service.complete(request).await.unwrap(), Completion::answer("done"));
        assert_eq!(service.complete(request).await.unwrap(), Completion::answer("done"));
        assert_eq!(service.request_count(), 2);
    }
}
