//! Shared test helpers and scripted completion client.
#![allow(dead_code)] // not every test binary uses every helper

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::BoxStream;

use envgym::client::{ChatClient, ChatRequest};
use envgym::error::{HarnessError, Result};
use envgym::tools::{AgentTool, Tool, ToolError, ToolParameters};
use envgym::types::{ChatDelta, ChatMessage, ToolCallRequest};

/// One canned reply the scripted client will serve.
pub enum ScriptedReply {
    /// A finalized message (converted to deltas in streaming mode).
    Message(ChatMessage),
    /// An explicit delta sequence, streaming mode only.
    Stream(Vec<Result<ChatDelta>>),
    /// A transport failure.
    TransportError(String),
}

/// Completion client that serves queued replies and records every request.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_text(&self, text: &str) {
        self.queue(ScriptedReply::Message(ChatMessage::assistant(text)));
    }

    pub fn queue_tool_call(&self, id: &str, name: &str, arguments: &str) {
        self.queue_tool_calls(vec![ToolCallRequest {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }]);
    }

    pub fn queue_tool_calls(&self, calls: Vec<ToolCallRequest>) {
        self.queue(ScriptedReply::Message(ChatMessage::assistant_with_calls(
            "", calls,
        )));
    }

    pub fn queue_stream(&self, deltas: Vec<Result<ChatDelta>>) {
        self.queue(ScriptedReply::Stream(deltas));
    }

    pub fn queue_transport_error(&self, message: &str) {
        self.queue(ScriptedReply::TransportError(message.to_string()));
    }

    pub fn queue(&self, reply: ScriptedReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> ChatRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    fn next_reply(&self) -> ScriptedReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ScriptedReply::Message(ChatMessage::assistant("")))
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage> {
        self.requests.lock().unwrap().push(request.clone());
        match self.next_reply() {
            ScriptedReply::Message(message) => Ok(message),
            ScriptedReply::Stream(_) => {
                panic!("scripted stream reply consumed by a batch request")
            }
            ScriptedReply::TransportError(message) => Err(HarnessError::api(500, message)),
        }
    }

    async fn complete_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<ChatDelta>>> {
        self.requests.lock().unwrap().push(request.clone());
        let deltas = match self.next_reply() {
            ScriptedReply::Stream(deltas) => deltas,
            ScriptedReply::Message(message) => message_as_deltas(&message),
            ScriptedReply::TransportError(message) => {
                return Err(HarnessError::api(500, message));
            }
        };
        Ok(Box::pin(futures::stream::iter(deltas)))
    }
}

/// Render a finalized message as the delta sequence a provider would send
/// for it: text first, then each tool call as one unfragmented delta.
pub fn message_as_deltas(message: &ChatMessage) -> Vec<Result<ChatDelta>> {
    let mut deltas = Vec::new();
    if !message.content.is_empty() {
        deltas.push(Ok(ChatDelta::Text(message.content.clone())));
    }
    for (index, call) in message.tool_calls.iter().enumerate() {
        deltas.push(Ok(ChatDelta::ToolCall(envgym::types::ToolCallDelta {
            index: index as u32,
            id: Some(call.id.clone()),
            name: Some(call.name.clone()),
            arguments: Some(call.arguments.clone()),
        })));
    }
    deltas.push(Ok(ChatDelta::Done));
    deltas
}

/// A tool that records every invocation's raw argument text.
pub struct RecordingTool {
    name: String,
    invocations: Arc<Mutex<Vec<String>>>,
    output: Box<dyn Fn(usize) -> String + Send + Sync>,
}

impl RecordingTool {
    /// Tool returning `output` on every call.
    pub fn fixed(name: &str, output: &str) -> (Arc<dyn Tool>, Arc<Mutex<Vec<String>>>) {
        let fixed = output.to_string();
        Self::with_output(name, move |_| fixed.clone())
    }

    /// Tool whose output is derived from the 1-based invocation count.
    pub fn with_output<F>(name: &str, output: F) -> (Arc<dyn Tool>, Arc<Mutex<Vec<String>>>)
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        let invocations = Arc::new(Mutex::new(Vec::new()));
        let tool = Arc::new(Self {
            name: name.to_string(),
            invocations: invocations.clone(),
            output: Box::new(output),
        });
        (tool, invocations)
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "records invocations"
    }

    fn parameters(&self) -> &ToolParameters {
        static PARAMS: std::sync::OnceLock<ToolParameters> = std::sync::OnceLock::new();
        PARAMS.get_or_init(ToolParameters::empty)
    }

    async fn execute(
        &self,
        args: &envgym::tools::ToolArguments,
    ) -> std::result::Result<String, ToolError> {
        let mut invocations = self.invocations.lock().unwrap();
        invocations.push(serde_json::to_string(args.raw()).expect("arguments serialize"));
        let count = invocations.len();
        Ok((self.output)(count))
    }
}

/// A tool that always fails.
pub fn failing_tool(name: &str) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        name,
        "fails unconditionally",
        ToolParameters::empty(),
        |_args| async move { Err(ToolError::execution("boom")) },
    ))
}
