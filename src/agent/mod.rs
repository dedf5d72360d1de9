//! Tool-calling conversation loop
//!
//! Information Hiding:
//! - Loop states and transitions private to the orchestrator
//! - Completion service reached only through its trait
//! - Per-call validation and dispatch failures fed back to the model

mod orchestrator;
mod outcome;

pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use outcome::{AgentAnswer, OrchestratorError, ToolCallRecord};
