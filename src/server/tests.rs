use super::{router, AppState};
use crate::agent::{Orchestrator, OrchestratorConfig};
use crate::config::ToolsConfig;
use crate::core::{CompletionError, ScriptedCompletionService};
use crate::tools::{ToolConfig, ToolRegistry};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(service: Arc<ScriptedCompletionService>, config: OrchestratorConfig) -> Router {
    let registry = ToolRegistry::with_defaults(&ToolsConfig::default(), None).unwrap();
    let orchestrator = Orchestrator::new(service, Arc::new(registry), ToolConfig::default(), config);
    router(AppState::new(Arc::new(orchestrator)))
}

fn ask_request(method: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_post_question_returns_answer() {
    let service = Arc::new(ScriptedCompletionService::new());
    service
        .queue_tool_call("sum_of_two_numbers", json!({"firstNumber": 7, "secondNumber": 5}))
        .queue_answer("12");

    let response = app(service, OrchestratorConfig::default())
        .oneshot(ask_request("POST", json!({"question": "What is 7 plus 5?"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["answer"], "12");
    assert_eq!(body["iterations"], 1);
    assert_eq!(body["tool_calls"][0]["tool"], "sum_of_two_numbers");
    assert_eq!(body["tool_calls"][0]["success"], true);
    assert!(body["tool_calls"][0]["duration_ms"].is_u64());
}

#[tokio::test]
async fn test_get_with_json_body_is_accepted() {
    let service = Arc::new(ScriptedCompletionService::new());
    service.queue_answer("Hello there");

    let response = app(service, OrchestratorConfig::default())
        .oneshot(ask_request("GET", r#"{"question": "Hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["answer"], "Hello there");
}

#[tokio::test]
async fn test_bad_requests() {
    for body in [r#"{"question": "   "}"#, r#"{"query": "Hi"}"#, "not json"] {
        let service = Arc::new(ScriptedCompletionService::new());
        let response = app(service.clone(), OrchestratorConfig::default())
            .oneshot(ask_request("POST", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(json_body(response).await["error"]["kind"], "invalid_request");
        assert_eq!(service.request_count(), 0);
    }
}

#[tokio::test]
async fn test_completion_failure_maps_to_bad_gateway() {
    let service = Arc::new(ScriptedCompletionService::new());
    service.queue_error(CompletionError::Status {
        status: 503,
        body: "unavailable".to_string(),
    });

    let response = app(service, OrchestratorConfig::default())
        .oneshot(ask_request("POST", r#"{"question": "Hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["kind"], "completion_service");
    assert!(body["error"]["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_runaway_model_maps_to_server_error() {
    let service = Arc::new(ScriptedCompletionService::new());
    service
        .queue_tool_call("even_odd_check", json!({"number": 1}))
        .queue_tool_call("even_odd_check", json!({"number": 2}));

    let config = OrchestratorConfig {
        max_iterations: 1,
        ..OrchestratorConfig::default()
    };

    let response = app(service, config)
        .oneshot(ask_request("POST", r#"{"question": "Loop"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["kind"], "too_many_iterations");
}

#[tokio::test]
async fn test_health() {
    let response = app(Arc::new(ScriptedCompletionService::new()), OrchestratorConfig::default())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"ok": true, "tools": 6}));
}
