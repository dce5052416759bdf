//! Core data types shared across the runtime.

pub mod generation;
pub mod message;
pub mod stream;

pub use generation::{FinishReason, InferenceSettings};
pub use message::{ChatMessage, Role, ToolCallRequest};
pub use stream::{ChatDelta, ToolCallDelta, TurnEvent};
