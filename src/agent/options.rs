//! Agent configuration.

use std::time::Duration;

use crate::history::{TemplateValue, TemplateVariables, DEFAULT_SYSTEM_TEMPLATE};
use crate::types::InferenceSettings;

/// Options controlling one agent.
///
/// All fields are optional overrides; the effective inference settings are
/// the caller's fields layered over the harness defaults, field by field
/// (see [`InferenceSettings::merged_over`]).
#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Agent name, available to the system template as `{{AGENT_NAME}}`.
    pub name: String,
    /// Agent description, available as `{{AGENT_DESCRIPTION}}`.
    pub description: String,
    /// System-prompt template; `None` uses the built-in default.
    pub system_template: Option<String>,
    /// Extra template variables.
    pub variables: TemplateVariables,
    /// Inference overrides, merged over the harness defaults.
    pub inference: InferenceSettings,
    /// Round budget; `None` derives it from the tool set (20 with tools,
    /// 1 without).
    pub max_recursions: Option<u32>,
    /// Cooperative whole-turn deadline, checked at each round start.
    pub turn_deadline: Option<Duration>,
    /// Idle timeout inside the streaming drain loop; `None` uses 120s,
    /// `Duration::ZERO` disables the check.
    pub stream_idle_timeout: Option<Duration>,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            name: "environment setup agent".to_string(),
            description: "An agent that prepares and validates build environments for software repositories.".to_string(),
            system_template: None,
            variables: TemplateVariables::new(),
            inference: InferenceSettings::default(),
            max_recursions: None,
            turn_deadline: None,
            stream_idle_timeout: None,
        }
    }
}

impl AgentOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_system_template(mut self, template: impl Into<String>) -> Self {
        self.system_template = Some(template.into());
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<TemplateValue>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn with_inference(mut self, inference: InferenceSettings) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_max_recursions(mut self, max_recursions: u32) -> Self {
        self.max_recursions = Some(max_recursions);
        self
    }

    pub fn with_turn_deadline(mut self, deadline: Duration) -> Self {
        self.turn_deadline = Some(deadline);
        self
    }

    pub fn with_stream_idle_timeout(mut self, timeout: Duration) -> Self {
        self.stream_idle_timeout = Some(timeout);
        self
    }

    /// The system template to render, with the agent's name and description
    /// exposed as variables unless the caller already bound them.
    pub(crate) fn template_and_variables(&self) -> (&str, TemplateVariables) {
        let template = self
            .system_template
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_TEMPLATE);
        let mut variables = self.variables.clone();
        variables
            .entry("AGENT_NAME".to_string())
            .or_insert_with(|| TemplateValue::Text(self.name.clone()));
        variables
            .entry("AGENT_DESCRIPTION".to_string())
            .or_insert_with(|| TemplateValue::Text(self.description.clone()));
        (template, variables)
    }
}
