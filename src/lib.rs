//! envgym — agent harness for iterative environment setup.
//!
//! Drives a language model through environment-setup work (scan a repo, plan,
//! write a Dockerfile, run it, summarize, repeat) on top of a bounded
//! tool-calling conversation runtime: one user turn becomes as many rounds of
//! "ask the model → execute the requested tool → feed the result back" as the
//! recursion budget allows, in batch or streaming mode.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use envgym::agent::{Agent, AgentOptions};
//! use envgym::client::OpenAiClient;
//! use envgym::config::Config;
//! use envgym::tools::{builtin, ToolRegistry};
//!
//! # async fn example() -> envgym::error::Result<()> {
//! let config = Config::from_env();
//! let client = Arc::new(OpenAiClient::from_config(&config)?);
//! let registry = Arc::new(ToolRegistry::new(builtin::all_tools()));
//! let agent = Agent::new(client, registry, AgentOptions::default());
//! let reply = agent.process_turn("Scan the repository layout.", &[]).await?;
//! println!("{}", reply.content);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod history;
pub mod prelude;
pub mod tools;
pub mod types;
