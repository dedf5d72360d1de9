//! Closure-backed tools
//!
//! Lets a contract and an async closure stand in for a full `Tool` impl.
//!
//! ```ignore
//! let echo = tool_fn(
//!     ToolContract::new("echo", "Echo the input")
//!         .param("text", ParameterSchema::string("Text to echo"), true),
//!     |args| async move { Ok(serde_json::json!({ "echo": args.string("text")? })) },
//! );
//! registry.register(Arc::new(echo))?;
//! ```

use super::{Tool, ToolContract, ValidatedArguments};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;

pub struct FnTool<F> {
    contract: ToolContract,
    handler: F,
}

impl<F> std::fmt::Debug for FnTool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.contract.name)
            .finish()
    }
}

pub fn tool_fn<F, Fut>(contract: ToolContract, handler: F) -> FnTool<F>
where
    F: Fn(ValidatedArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    FnTool { contract, handler }
}

#[async_trait]
impl<F, Fut> Tool for FnTool<F>
where
    F: Fn(ValidatedArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    fn contract(&self) -> ToolContract {
        self.contract.clone()
    }

    async fn call(&self, args: ValidatedArguments) -> Result<Value> {
        (self.handler)(args).await
    }
}
