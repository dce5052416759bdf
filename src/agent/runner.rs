//! The bounded tool-calling round loop.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::time::{self, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::client::{ChatClient, ChatRequest, ToolCallAggregator};
use crate::error::{HarnessError, Result};
use crate::history::build_transcript;
use crate::tools::{ToolDescriptor, ToolRegistry};
use crate::types::{ChatDelta, ChatMessage, InferenceSettings, ToolCallRequest, TurnEvent};

use super::options::AgentOptions;

/// Round budget applied when tools are registered and the caller did not
/// override it. A toolless agent gets a single round.
pub const DEFAULT_MAX_RECURSIONS: u32 = 20;

/// Fallback returned when the budget runs out before the model stops
/// requesting tools.
pub const MAX_RECURSIONS_MESSAGE: &str = "Maximum tool recursions reached.";

const DEFAULT_STREAM_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// A single conversation runtime: one completion client, one immutable tool
/// registry, one set of options.
///
/// Each `process_turn*` call owns its transcript for the duration of the
/// call and discards it afterwards; an `Agent` holds no mutable state, so
/// one instance can serve concurrent turns if the caller wants to schedule
/// them.
pub struct Agent {
    client: Arc<dyn ChatClient>,
    registry: Arc<ToolRegistry>,
    options: AgentOptions,
}

impl Agent {
    pub fn new(
        client: Arc<dyn ChatClient>,
        registry: Arc<ToolRegistry>,
        options: AgentOptions,
    ) -> Self {
        Self {
            client,
            registry,
            options,
        }
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    fn budget(&self) -> u32 {
        self.options.max_recursions.unwrap_or(if self.registry.is_empty() {
            1
        } else {
            DEFAULT_MAX_RECURSIONS
        })
    }

    fn tool_descriptors(&self) -> Option<Vec<ToolDescriptor>> {
        if self.registry.is_empty() {
            None
        } else {
            Some(self.registry.describe())
        }
    }

    fn effective_settings(&self) -> InferenceSettings {
        self.options
            .inference
            .merged_over(&InferenceSettings::harness_defaults())
    }

    fn initial_transcript(&self, user_input: &str, prior_turns: &[ChatMessage]) -> Vec<ChatMessage> {
        let (template, variables) = self.options.template_and_variables();
        build_transcript(template, &variables, prior_turns, user_input)
    }

    /// Run one turn in batch mode: loop rounds until the model answers
    /// without tool calls, the budget runs out, or transport fails.
    pub async fn process_turn(
        &self,
        user_input: &str,
        prior_turns: &[ChatMessage],
    ) -> Result<ChatMessage> {
        let turn_id = Uuid::new_v4();
        let mut messages = self.initial_transcript(user_input, prior_turns);
        let settings = self.effective_settings();
        let tools = self.tool_descriptors();
        let deadline = self.options.turn_deadline.map(|d| Instant::now() + d);
        let mut remaining = self.budget();

        while remaining > 0 {
            check_deadline(deadline, self.options.turn_deadline)?;
            debug!(%turn_id, remaining, transcript = messages.len(), "round start");

            let request = ChatRequest {
                messages: messages.clone(),
                settings: settings.clone(),
                tools: tools.clone(),
            };
            let reply = self.client.complete(&request).await?;

            if !reply.has_tool_calls() {
                debug!(%turn_id, "turn complete");
                return Ok(ChatMessage::assistant(reply.content));
            }

            let calls = reply.tool_calls.clone();
            messages.push(ChatMessage::assistant_with_calls(reply.content, calls.clone()));
            execute_calls(&self.registry, &calls, &mut messages).await;
            remaining -= 1;
        }

        debug!(%turn_id, "recursion budget exhausted");
        Ok(ChatMessage::assistant(MAX_RECURSIONS_MESSAGE))
    }

    /// Run one turn in streaming mode.
    ///
    /// Text fragments are forwarded in arrival order as they stream in; the
    /// turn ends with exactly one `Completed` event, or one `Failed` event
    /// when transport fails, the stream breaks mid-response, or a timeout
    /// fires. A broken stream abandons the round before any of its
    /// partially-assembled tool calls is executed.
    pub fn process_turn_streaming(
        &self,
        user_input: &str,
        prior_turns: &[ChatMessage],
    ) -> BoxStream<'static, TurnEvent> {
        let turn_id = Uuid::new_v4();
        let client = Arc::clone(&self.client);
        let registry = Arc::clone(&self.registry);
        let mut messages = self.initial_transcript(user_input, prior_turns);
        let settings = self.effective_settings();
        let tools = self.tool_descriptors();
        let turn_deadline = self.options.turn_deadline;
        let idle_timeout = self
            .options
            .stream_idle_timeout
            .unwrap_or(DEFAULT_STREAM_IDLE_TIMEOUT);
        let mut remaining = self.budget();

        let stream = async_stream::stream! {
            let deadline = turn_deadline.map(|d| Instant::now() + d);

            while remaining > 0 {
                if let Err(err) = check_deadline(deadline, turn_deadline) {
                    yield TurnEvent::Failed(err.to_string());
                    return;
                }
                debug!(%turn_id, remaining, transcript = messages.len(), "round start");

                let request = ChatRequest {
                    messages: messages.clone(),
                    settings: settings.clone(),
                    tools: tools.clone(),
                };
                let mut upstream = match client.complete_stream(&request).await {
                    Ok(stream) => stream,
                    Err(err) => {
                        yield TurnEvent::Failed(err.to_string());
                        return;
                    }
                };

                let mut aggregator = ToolCallAggregator::new();
                let mut accumulated = String::new();
                let mut idle_sleep =
                    (!idle_timeout.is_zero()).then(|| Box::pin(time::sleep(idle_timeout)));

                loop {
                    tokio::select! {
                        _ = idle_sleep.as_mut().unwrap(), if idle_sleep.is_some() => {
                            yield TurnEvent::Failed(
                                HarnessError::MalformedStream("stream idle timeout".into())
                                    .to_string(),
                            );
                            return;
                        }
                        delta = upstream.next() => {
                            let Some(delta) = delta else { break; };
                            match delta {
                                Ok(delta) => {
                                    if let Some(sleep) = idle_sleep.as_mut() {
                                        sleep.as_mut().reset(Instant::now() + idle_timeout);
                                    }
                                    match delta {
                                        ChatDelta::Text(text) => {
                                            accumulated.push_str(&text);
                                            yield TurnEvent::TextDelta(text);
                                        }
                                        ChatDelta::ToolCall(fragment) => {
                                            aggregator.apply(&fragment);
                                        }
                                        ChatDelta::Done => break,
                                    }
                                }
                                Err(err) => {
                                    // Abandon the round: nothing assembled so
                                    // far may be executed.
                                    yield TurnEvent::Failed(
                                        HarnessError::MalformedStream(err.to_string()).to_string(),
                                    );
                                    return;
                                }
                            }
                        }
                    }
                }

                let calls = aggregator.finish();
                if calls.is_empty() {
                    debug!(%turn_id, "turn complete");
                    yield TurnEvent::Completed(ChatMessage::assistant(accumulated));
                    return;
                }

                messages.push(ChatMessage::assistant_with_calls(
                    accumulated,
                    calls.clone(),
                ));
                execute_calls(&registry, &calls, &mut messages).await;
                remaining -= 1;
            }

            debug!(%turn_id, "recursion budget exhausted");
            yield TurnEvent::Completed(ChatMessage::assistant(MAX_RECURSIONS_MESSAGE));
        };

        Box::pin(stream)
    }
}

fn check_deadline(deadline: Option<Instant>, configured: Option<Duration>) -> Result<()> {
    if let Some(deadline) = deadline {
        if Instant::now() >= deadline {
            let millis = configured.map(|d| d.as_millis() as u64).unwrap_or_default();
            return Err(HarnessError::DeadlineExceeded(millis));
        }
    }
    Ok(())
}

/// Invoke each request strictly in response order, appending one tool
/// message per result so the next round sees them in a deterministic order.
async fn execute_calls(
    registry: &ToolRegistry,
    calls: &[ToolCallRequest],
    messages: &mut Vec<ChatMessage>,
) {
    for call in calls {
        let output = registry.invoke(&call.name, &call.arguments).await;
        messages.push(ChatMessage::tool_result(call.id.clone(), output));
    }
}
