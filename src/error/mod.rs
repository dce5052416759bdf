//! Error types for envgym.

use thiserror::Error;

/// Primary error type for all envgym operations.
///
/// Tool-level failures never appear here: a missing tool, bad arguments, or
/// an error inside a tool are rendered into the conversation as tool-role
/// content so the model can self-correct (see [`crate::tools::ToolError`]).
/// Only transport and stream failures escape to the caller.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Malformed stream: {0}")]
    MalformedStream(String),

    #[error("Turn deadline exceeded after {0}ms")]
    DeadlineExceeded(u64),
}

impl HarnessError {
    /// Create an API error from a status code and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether the failure happened below the conversation layer (network,
    /// provider, auth) as opposed to inside the stream protocol.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Api { .. } | Self::Authentication(_)
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HarnessError>;
