//! Parsed tool-call arguments.

use serde_json::{Map, Value};

use super::tool::ToolError;

/// Tool arguments parsed from the raw JSON text of a tool-call request.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    map: Map<String, Value>,
}

impl ToolArguments {
    /// Parse the raw argument text the provider sent for `tool_name`.
    ///
    /// An empty string is treated as an empty object (the provider sends no
    /// argument fragments for a zero-argument call). Any other non-object
    /// payload is invalid.
    pub fn from_json_str(tool_name: &str, raw: &str) -> Result<Self, ToolError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_str(trimmed).map_err(|e| ToolError::InvalidArguments {
                name: tool_name.to_string(),
                message: e.to_string(),
            })?;
        match value {
            Value::Object(map) => Ok(Self { map }),
            other => Err(ToolError::InvalidArguments {
                name: tool_name.to_string(),
                message: format!("expected a JSON object, got {other}"),
            }),
        }
    }

    /// Wrap an already-parsed argument object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self { map }
    }

    /// Required string argument.
    pub fn get_str(&self, name: &str) -> Result<&str, ToolError> {
        self.map
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution(format!("missing required argument '{name}'")))
    }

    /// Optional string argument.
    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.map.get(name).and_then(Value::as_str)
    }

    /// Optional boolean argument.
    pub fn opt_bool(&self, name: &str) -> Option<bool> {
        self.map.get(name).and_then(Value::as_bool)
    }

    /// Optional unsigned integer argument.
    pub fn opt_u64(&self, name: &str) -> Option<u64> {
        self.map.get(name).and_then(Value::as_u64)
    }

    /// The full argument object.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.map
    }
}
