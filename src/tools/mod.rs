//! Tool System - Typed tool catalog for the orchestration loop
//!
//! Information Hiding:
//! - Tool bodies hidden behind the `Tool` trait
//! - Parameter contracts expressed as a closed set of types
//! - Registry, validation and dispatch kept in their own modules
//! - Handler failures captured as `ToolResult::Failure`, never propagated

pub mod arithmetic;
pub mod conversion;
pub mod error;
pub mod executor;
pub mod function;
pub mod macros;
pub mod registry;
pub mod validation;
pub mod weather;

pub use error::{RegistryError, ToolError};
pub use function::{tool_fn, FnTool};
pub use registry::ToolRegistry;
pub use validation::{validate, ValidatedArguments};

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Declared type of a single tool argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterType {
    /// Whole number
    Integer,
    /// Any finite number
    Number,
    String,
    /// String restricted to the listed values
    Enum { values: Vec<String> },
}

impl ParameterType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Enum { .. } => "enum",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum { values } => write!(f, "one of [{}]", values.join(", ")),
            other => f.write_str(other.name()),
        }
    }
}

/// Schema for one named argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(flatten)]
    pub param_type: ParameterType,
    pub description: String,
}

impl ParameterSchema {
    pub fn new(param_type: ParameterType, description: impl Into<String>) -> Self {
        Self {
            param_type,
            description: description.into(),
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(ParameterType::Integer, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(ParameterType::Number, description)
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(ParameterType::String, description)
    }

    pub fn one_of<I, S>(values: I, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            ParameterType::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
            description,
        )
    }

    /// JSON-schema fragment sent to the completion service
    pub fn json_schema(&self) -> Value {
        let mut schema = Map::new();
        match &self.param_type {
            ParameterType::Enum { values } => {
                schema.insert("type".to_string(), json!("string"));
                schema.insert("enum".to_string(), json!(values));
            }
            other => {
                schema.insert("type".to_string(), json!(other.name()));
            }
        }
        if !self.description.is_empty() {
            schema.insert("description".to_string(), json!(self.description));
        }
        Value::Object(schema)
    }
}

/// Declarative description of one callable tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContract {
    pub name: String,
    pub description: String,
    pub parameters: IndexMap<String, ParameterSchema>,
    pub required: Vec<String>,
}

impl ToolContract {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Add a parameter, keeping declaration order
    pub fn param(mut self, name: impl Into<String>, schema: ParameterSchema, required: bool) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.parameters.insert(name, schema);
        self
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Structural checks applied at registration time
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("tool name must not be empty".to_string());
        }
        if let Some(missing) = self
            .required
            .iter()
            .find(|name| !self.parameters.contains_key(name.as_str()))
        {
            return Err(format!(
                "required argument '{}' is not a declared parameter",
                missing
            ));
        }
        for (name, schema) in &self.parameters {
            if let ParameterType::Enum { values } = &schema.param_type {
                if values.is_empty() {
                    return Err(format!("enum parameter '{}' has no allowed values", name));
                }
            }
        }
        Ok(())
    }

    /// Object schema for the function definition sent to the model
    pub fn json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|(name, schema)| (name.clone(), schema.json_schema()))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

impl fmt::Display for ToolContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// Outcome of one tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(Value),
    Failure(ToolError),
}

impl ToolResult {
    pub fn success(value: Value) -> Self {
        Self::Success(value)
    }

    pub fn failure(error: ToolError) -> Self {
        Self::Failure(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&ToolError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e),
        }
    }

    /// Text placed in the tool-result turn
    pub fn to_message_content(&self) -> String {
        match self {
            Self::Success(value) => value.to_string(),
            Self::Failure(error) => json!({
                "error": {
                    "kind": error.kind(),
                    "message": error.to_string(),
                }
            })
            .to_string(),
        }
    }
}

/// Tool trait - every callable capability implements this
///
/// Handlers only ever see arguments that already passed
/// [`validate`] against their own contract.
#[async_trait]
pub trait Tool: Send + Sync {
    fn contract(&self) -> ToolContract;

    async fn call(&self, args: ValidatedArguments) -> Result<Value>;
}

/// Dispatch configuration
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 1,
        }
    }
}

impl From<&crate::config::ToolsConfig> for ToolConfig {
    fn from(config: &crate::config::ToolsConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            max_attempts: config.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_contract() -> ToolContract {
        ToolContract::new("get_current_weather", "Get the current weather")
            .param(
                "location",
                ParameterSchema::string("The city and state"),
                true,
            )
            .param(
                "unit",
                ParameterSchema::one_of(["celsius", "fahrenheit"], ""),
                false,
            )
    }

    #[test]
    fn test_contract_json_schema() {
        let schema = weather_contract().json_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["location"]["type"], "string");
        assert_eq!(schema["properties"]["unit"]["type"], "string");
        assert_eq!(
            schema["properties"]["unit"]["enum"],
            json!(["celsius", "fahrenheit"])
        );
        assert!(schema["properties"]["unit"].get("description").is_none());
        assert_eq!(schema["required"], json!(["location"]));
    }

    #[test]
    fn test_contract_preserves_parameter_order() {
        let contract = weather_contract();
        let names: Vec<_> = contract.parameters.keys().cloned().collect();
        assert_eq!(names, vec!["location", "unit"]);
    }

    #[test]
    fn test_contract_check_rejects_undeclared_required() {
        let mut contract = weather_contract();
        contract.required.push("country".to_string());

        let err = contract.check().unwrap_err();
        assert!(err.contains("country"));
    }

    #[test]
    fn test_contract_check_rejects_empty_name_and_enum() {
        assert!(ToolContract::new("  ", "nothing").check().is_err());

        let contract = ToolContract::new("pick", "Pick one").param(
            "choice",
            ParameterSchema::one_of(Vec::<String>::new(), "empty"),
            true,
        );
        assert!(contract.check().is_err());
    }

    #[test]
    fn test_tool_result_message_content() {
        let ok = ToolResult::success(json!({"result": 5}));
        assert_eq!(ok.to_message_content(), r#"{"result":5}"#);

        let failed = ToolResult::failure(ToolError::UnknownTool {
            name: "does_not_exist".to_string(),
        });
        let content: Value = serde_json::from_str(&failed.to_message_content()).unwrap();
        assert_eq!(content["error"]["kind"], "unknown_tool");
        assert_eq!(content["error"]["message"], "unknown tool 'does_not_exist'");
    }
}
