//! envgym CLI binary entry point.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use envgym::agent::{Agent, AgentOptions};
use envgym::cli::Cli;
use envgym::client::OpenAiClient;
use envgym::config::Config;
use envgym::tools::{builtin, ToolRegistry};
use envgym::types::{InferenceSettings, TurnEvent};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envgym=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env();
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }

    let client = Arc::new(OpenAiClient::from_config(&config)?);
    let registry = Arc::new(if cli.no_tools {
        ToolRegistry::empty()
    } else {
        ToolRegistry::new(builtin::all_tools())
    });

    let mut options = AgentOptions::default();
    if let Some(system) = cli.system {
        options = options.with_system_template(system);
    }
    if let Some(budget) = cli.budget {
        options = options.with_max_recursions(budget);
    }
    let mut inference = InferenceSettings::default();
    inference.temperature = cli.temperature;
    inference.max_tokens = cli.max_tokens;
    options = options.with_inference(inference);

    let agent = Agent::new(client, registry, options);

    if cli.stream {
        let mut events = agent.process_turn_streaming(&cli.prompt, &[]);
        let mut printed_any = false;
        while let Some(event) = events.next().await {
            match event {
                TurnEvent::TextDelta(text) => {
                    print!("{text}");
                    std::io::stdout().flush()?;
                    printed_any = true;
                }
                TurnEvent::Completed(message) => {
                    if printed_any {
                        println!();
                    } else {
                        println!("{}", message.content);
                    }
                }
                TurnEvent::Failed(message) => {
                    return Err(message.into());
                }
            }
        }
    } else {
        let reply = agent.process_turn(&cli.prompt, &[]).await?;
        println!("{}", reply.content);
    }

    Ok(())
}
