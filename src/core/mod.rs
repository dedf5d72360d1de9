pub mod completion;
pub mod conversation;
pub mod llm;
pub mod mock;

pub use completion::{Completion, CompletionError, CompletionRequest, CompletionService, ToolChoice};
pub use conversation::{Message, Role, ToolInvocationRequest};
pub use llm::LLMClient;
pub use mock::{RecordedRequest, ScriptedCompletionService};
