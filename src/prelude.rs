//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentOptions};
pub use crate::client::{ChatClient, ChatRequest, OpenAiClient};
pub use crate::config::Config;
pub use crate::error::{HarnessError, Result};
pub use crate::tools::{AgentTool, Tool, ToolParameters, ToolRegistry};
pub use crate::types::{
    ChatDelta, ChatMessage, InferenceSettings, Role, ToolCallRequest, TurnEvent,
};
