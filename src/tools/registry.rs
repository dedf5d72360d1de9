//! Tool Registry
//!
//! Information Hiding:
//! - Tool storage and lookup implementation hidden
//! - Contract checks applied once, at registration
//! - Catalog order is registration order
//!
//! Built once at startup and shared read-only across requests.

use super::{RegistryError, Tool, ToolContract, ToolError};
use crate::config::ToolsConfig;
use indexmap::IndexMap;
use std::sync::Arc;

struct RegisteredTool {
    contract: ToolContract,
    tool: Arc<dyn Tool>,
}

/// Ordered catalog of tools, keyed by unique name
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    ///
    /// The contract is captured once here; later lookups never call
    /// [`Tool::contract`] again.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let contract = tool.contract();

        contract
            .check()
            .map_err(|reason| RegistryError::InvalidContract {
                name: contract.name.clone(),
                reason,
            })?;

        if self.tools.contains_key(&contract.name) {
            return Err(RegistryError::DuplicateTool {
                name: contract.name,
            });
        }

        tracing::info!("Registering tool: {}", contract.name);
        self.tools
            .insert(contract.name.clone(), RegisteredTool { contract, tool });
        Ok(())
    }

    /// Contract for `name`
    pub fn lookup(&self, name: &str) -> Result<&ToolContract, ToolError> {
        self.tools
            .get(name)
            .map(|entry| &entry.contract)
            .ok_or_else(|| ToolError::UnknownTool {
                name: name.to_string(),
            })
    }

    /// Handler for `name`
    pub fn handler(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.tools
            .get(name)
            .map(|entry| Arc::clone(&entry.tool))
            .ok_or_else(|| ToolError::UnknownTool {
                name: name.to_string(),
            })
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// All contracts, in registration order
    pub fn contracts(&self) -> Vec<ToolContract> {
        self.tools.values().map(|entry| entry.contract.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registry with the built-in catalog
    pub fn with_defaults(
        config: &ToolsConfig,
        weather_api_key: Option<String>,
    ) -> Result<Self, RegistryError> {
        use super::{arithmetic, conversion, weather::WeatherTool};

        let mut registry = Self::new();

        registry.register(Arc::new(arithmetic::SumTool))?;
        registry.register(Arc::new(arithmetic::EvenOddTool))?;
        registry.register(Arc::new(arithmetic::PrimeCheckTool))?;
        registry.register(Arc::new(WeatherTool::new(
            config.weather_base_url.clone(),
            weather_api_key,
            config.timeout_secs,
        )))?;
        registry.register(Arc::new(conversion::UnitConversionTool))?;
        registry.register(Arc::new(conversion::CurrencyConversionTool))?;

        Ok(registry)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
