//! toolchat - LLM question answering with a typed, locally executed tool catalog
//!
//! A question goes to a chat-completion model together with the tool
//! contracts. Tool calls requested by the model are validated, dispatched
//! and fed back until the model produces a final answer.

pub mod agent;
pub mod cli;
pub mod config;
pub mod core;
pub mod server;
pub mod tools;
pub mod utils;

pub use agent::{AgentAnswer, Orchestrator, OrchestratorConfig, OrchestratorError, ToolCallRecord};
pub use config::Settings;
pub use tools::{Tool, ToolContract, ToolRegistry, ToolResult};

/// Build the production orchestrator from settings and environment credentials
pub fn init(settings: &Settings) -> anyhow::Result<Orchestrator> {
    let api_key = Settings::api_key()?;
    let orchestrator = Orchestrator::from_settings(settings, api_key, Settings::weather_api_key())?;

    tracing::info!(
        "toolchat initialized with {} tools (model: {})",
        orchestrator.registry().len(),
        settings.llm.model
    );
    Ok(orchestrator)
}
