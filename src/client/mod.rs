//! Completion client adapter.
//!
//! [`ChatClient`] is the seam between the round controller and the
//! completion endpoint: one batch call or one delta stream per round,
//! nothing else. Transport failures surface immediately; retry policy, if
//! any, belongs to the caller.

pub mod aggregate;
pub mod openai;

pub use aggregate::ToolCallAggregator;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::tools::ToolDescriptor;
use crate::types::{ChatDelta, ChatMessage, InferenceSettings};

/// A request sent to the completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub settings: InferenceSettings,
    pub tools: Option<Vec<ToolDescriptor>>,
}

/// Core trait implemented by completion clients.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// The model this client instance serves.
    fn model_id(&self) -> &str;

    /// Send a request and await the single finalized message.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage>;

    /// Send a request and return the incremental delta stream.
    async fn complete_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<ChatDelta>>>;
}
