//! Transcript assembly and system-prompt templating.
//!
//! Builds the ordered message list handed to the completion endpoint: one
//! system message rendered from a `{{KEY}}` template, the prior turns mapped
//! 1:1, then the new user input. The list is append-only for the duration of
//! a turn; nothing here truncates or reorders.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::ChatMessage;

/// Default system-prompt template for the environment-setup agent.
///
/// `{{AGENT_NAME}}` and `{{AGENT_DESCRIPTION}}` are filled from the agent
/// options; additional variables may be supplied by the caller.
pub const DEFAULT_SYSTEM_TEMPLATE: &str = "\
You are {{AGENT_NAME}}.
{{AGENT_DESCRIPTION}}
You will engage in an open-ended conversation, providing helpful and accurate information based on your expertise.
When using tools, make sure to properly format your tool calls and handle the responses appropriately.
The conversation will proceed as follows:
- The human may ask an initial question or provide a prompt on any topic.
- You will provide a relevant and informative response.
- If tools are available and relevant to the request, use them to provide more accurate information.
- The human may then follow up with additional questions or prompts.
Throughout the conversation, you should aim to:
- Understand the context and intent behind each question or prompt.
- Use available tools when they can provide better or more accurate information.
- Provide substantive and well-reasoned responses that directly address the query.
- Ask for clarification if any part of the question or prompt is ambiguous.
- Maintain a consistent, respectful, and engaging tone.";

/// A value substituted into a system-prompt template. Lists are joined with
/// newlines when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for TemplateValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Named variables available to [`render_template`].
pub type TemplateVariables = HashMap<String, TemplateValue>;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"))
}

/// Substitute `{{KEY}}` placeholders in `template` from `variables`.
///
/// Unmatched placeholders are left verbatim, not an error.
pub fn render_template(template: &str, variables: &TemplateVariables) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match variables.get(&caps[1]) {
                Some(TemplateValue::Text(text)) => text.clone(),
                Some(TemplateValue::List(items)) => items.join("\n"),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Build the ordered transcript for one turn: rendered system message, prior
/// turns in their original order, then the new user input.
pub fn build_transcript(
    system_template: &str,
    variables: &TemplateVariables,
    prior_turns: &[ChatMessage],
    user_input: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(prior_turns.len() + 2);
    messages.push(ChatMessage::system(render_template(
        system_template,
        variables,
    )));
    messages.extend(prior_turns.iter().cloned());
    messages.push(ChatMessage::user(user_input));
    messages
}
