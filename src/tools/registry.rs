//! Tool registry and executor.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolError};

/// Wire projection of one registered tool, sent to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Immutable name→tool mapping, fixed at construction.
///
/// Resolution is exact-name lookup, case-sensitive. Lookup misses, malformed
/// arguments, and errors inside a tool are all rendered as model-visible
/// strings rather than raised: a failing tool never aborts a round. The
/// registry is read-only after construction and safe to share across
/// conversations behind an `Arc`.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry from the given tools. When two tools share a name,
    /// the first registration wins.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        let mut by_name = HashMap::with_capacity(tools.len());
        for (index, tool) in tools.iter().enumerate() {
            by_name.entry(tool.name().to_string()).or_insert(index);
        }
        Self { tools, by_name }
    }

    /// Registry with no tools.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Descriptors for every registered tool, in registration order.
    pub fn describe(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters().schema.clone(),
            })
            .collect()
    }

    /// Invoke `name` with the raw argument text of a tool-call request.
    ///
    /// Always returns model-visible text: the tool's output on success, or a
    /// rendered [`ToolError`] the model can react to.
    pub async fn invoke(&self, name: &str, args_json: &str) -> String {
        let Some(tool) = self.by_name.get(name).map(|&i| &self.tools[i]) else {
            debug!(tool = name, "tool lookup miss");
            return ToolError::NotFound(name.to_string()).to_string();
        };

        let args = match ToolArguments::from_json_str(name, args_json) {
            Ok(args) => args,
            Err(err) => {
                debug!(tool = name, error = %err, "tool arguments rejected");
                return err.to_string();
            }
        };

        debug!(tool = name, "executing tool");
        match tool.execute(&args).await {
            Ok(output) => output,
            Err(err) => {
                debug!(tool = name, error = %err, "tool execution failed");
                format!("Error executing tool '{name}': {err}")
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}
