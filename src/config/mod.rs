//! Environment-derived configuration.
//!
//! A plain value, constructed explicitly and passed to whatever needs it.
//! There is no process-global configuration.

/// Configuration for the completion endpoint.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API key for the completion provider.
    pub api_key: Option<String>,
    /// Base URL override (defaults to the provider's public endpoint).
    pub base_url: Option<String>,
    /// Model identifier.
    pub model: String,
}

/// Model used when `ENVGYM_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

impl Config {
    /// Load from the environment (`OPENAI_API_KEY`, `OPENAI_BASE_URL`,
    /// `ENVGYM_MODEL`), reading a `.env` file first when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
            model: std::env::var("ENVGYM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
