use super::dto::{AskRequest, AskResponse, HealthResponse};
use super::error::ApiError;
use super::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

/// Answer one question, calling tools as the model requests
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;

    let question = request.question.trim();
    if question.is_empty() {
        return Err(ApiError::invalid_request("question must not be empty"));
    }

    tracing::info!("Question received: {}", question);
    let answer = state.orchestrator.run(question).await?;

    Ok(Json(answer.into()))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        tools: state.orchestrator.registry().len(),
    })
}
