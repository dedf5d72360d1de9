use super::completion::{Completion, CompletionError, CompletionRequest, CompletionService};
use super::conversation::{Message, Role, ToolInvocationRequest};
use crate::config::LLMConfig;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: &'static str,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded argument object
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: WireFunctionCall,
}

/// OpenAI-compatible chat completions client
pub struct LLMClient {
    client: Client,
    api_key: String,
    settings: LLMConfig,
}

impl LLMClient {
    pub fn new(api_key: String, settings: LLMConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    async fn send_once(&self, request: &ChatRequest<'_>) -> Result<ChatResponse, CompletionError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| CompletionError::Malformed(format!("response decode error: {}", e)))
    }
}

#[async_trait]
impl CompletionService for LLMClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion, CompletionError> {
        let tools: Vec<WireTool<'_>> = request
            .tools
            .iter()
            .map(|contract| WireTool {
                tool_type: "function",
                function: WireFunction {
                    name: &contract.name,
                    description: &contract.description,
                    parameters: contract.json_schema(),
                },
            })
            .collect();

        let chat_request = ChatRequest {
            model: request.model,
            messages: request.messages.iter().map(to_wire_message).collect(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            tool_choice: (!tools.is_empty()).then(|| request.tool_choice.as_str()),
            tools,
        };

        let max_attempts = self.settings.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.send_once(&chat_request).await {
                Ok(response) => {
                    let completion = parse_completion(response)?;
                    tracing::debug!("[LLMClient] Completion: {:?}", completion);
                    return Ok(completion);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = retry_delay_ms(attempt);
                    tracing::warn!(
                        "[LLMClient] {} (attempt {}/{}), retrying after {}ms",
                        e,
                        attempt,
                        max_attempts,
                        delay
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    tracing::error!("[LLMClient] {}", e);
                    return Err(e);
                }
            }
        }
    }
}

/// Exponential backoff before retry number `attempt` (1-based), capped
fn retry_delay_ms(attempt: u32) -> u64 {
    const BASE_DELAY_MS: u64 = 500;
    const MAX_DELAY_MS: u64 = 30_000;

    2_u64
        .saturating_pow(attempt.saturating_sub(1))
        .saturating_mul(BASE_DELAY_MS)
        .min(MAX_DELAY_MS)
}

fn to_wire_message(message: &Message) -> WireMessage {
    let tool_calls = (message.role == Role::Assistant && !message.tool_calls.is_empty()).then(|| {
        message
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: call.id.clone(),
                call_type: "function",
                function: WireFunctionCall {
                    name: call.tool_name.clone(),
                    arguments: Value::Object(call.raw_arguments.clone()).to_string(),
                },
            })
            .collect()
    });

    WireMessage {
        role: message.role.as_str(),
        content: message.content.clone(),
        tool_calls,
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn parse_completion(response: ChatResponse) -> Result<Completion, CompletionError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| CompletionError::Malformed("response has no choices".to_string()))?;

    let content = message.content.filter(|text| !text.trim().is_empty());
    let tool_calls = message.tool_calls.unwrap_or_default();

    if !tool_calls.is_empty() {
        let calls = tool_calls
            .into_iter()
            .map(|call| {
                Ok(ToolInvocationRequest::new(
                    call.id,
                    call.function.name,
                    parse_arguments(&call.function.arguments)?,
                ))
            })
            .collect::<Result<Vec<_>, CompletionError>>()?;
        return Ok(Completion::ToolCalls { content, calls });
    }

    content
        .map(|text| Completion::Answer { text })
        .ok_or_else(|| CompletionError::Malformed("response has neither text nor tool calls".to_string()))
}

fn parse_arguments(raw: &str) -> Result<Map<String, Value>, CompletionError> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CompletionError::Malformed(format!(
            "tool arguments must be a JSON object, got: {}",
            other
        ))),
        Err(e) => Err(CompletionError::Malformed(format!(
            "tool arguments are not valid JSON: {}",
            e
        ))),
    }
}
