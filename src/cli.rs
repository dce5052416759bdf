//! Command-line argument definitions for the `envgym` binary.

use clap::Parser;

/// Drive a language model through one environment-setup turn.
#[derive(Parser, Debug)]
#[command(name = "envgym", version, about)]
pub struct Cli {
    /// The instruction for this turn.
    pub prompt: String,

    /// Model identifier (overrides ENVGYM_MODEL).
    #[arg(long)]
    pub model: Option<String>,

    /// Stream the response incrementally.
    #[arg(long)]
    pub stream: bool,

    /// System-prompt template override ({{KEY}} placeholders allowed).
    #[arg(long)]
    pub system: Option<String>,

    /// Round budget override.
    #[arg(long)]
    pub budget: Option<u32>,

    /// Sampling temperature.
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Maximum tokens per completion.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Run without the built-in tools.
    #[arg(long)]
    pub no_tools: bool,
}
