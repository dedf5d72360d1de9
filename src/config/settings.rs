use crate::core::ToolChoice;
use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LLMConfig,
    pub agent: AgentConfig,
    pub tools: ToolsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub tool_choice: ToolChoice,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            tool_choice: ToolChoice::Auto,
            request_timeout_secs: 60,
            max_retries: 2,
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_iterations: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub weather_base_url: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 1,
            weather_base_url: "https://api.openweathermap.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `config/{CONFIG_ENV}`, then `APP__*` variables, then `PORT`
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());
        Self::load(File::with_name(&format!("config/{}", config_env)).required(false))
    }

    /// Same layering with an explicit, mandatory configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(File::from(path.as_ref()).required(true))
    }

    fn load<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let port = env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok());

        let config = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(Environment::with_prefix("APP").separator("__"))
            .set_override_option("server.port", port.map(i64::from))?
            .build()?;

        config.try_deserialize()
    }

    pub fn api_key() -> Result<String> {
        env::var("OPENAI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))
    }

    pub fn weather_api_key() -> Option<String> {
        env::var("OPENWEATHER_API_KEY").ok()
    }
}
