mod settings;

pub use settings::{
    AgentConfig, LLMConfig, LoggingConfig, ServerConfig, Settings, ToolsConfig,
};
