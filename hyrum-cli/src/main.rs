//! Hyrum CLI - Store assistant for HyrumGames customers

mod commands;
mod display;
mod persona;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use hyrum_core::config::HyrumConfig;
use hyrum_core::conversation::ChatSession;
use hyrum_core::knowledge::KnowledgeStore;
use hyrum_core::llm::MistralProvider;

#[derive(Parser)]
#[command(name = "hyrum")]
#[command(about = "Chat with the HyrumGames store assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./hyrum.toml when present)
    #[arg(short, long, env = "HYRUM_CONFIG")]
    config: Option<PathBuf>,

    /// Knowledge base JSON file
    #[arg(short, long)]
    knowledge: Option<PathBuf>,

    /// Model identifier, overrides configuration and environment
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    // Logs go to stderr so they never interleave with the conversation
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env loaded"),
    }

    let cli = Cli::parse();

    let mut config =
        HyrumConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = cli.knowledge {
        config.knowledge.path = path;
    }
    if let Some(model) = cli.model {
        config.llm.model = Some(model);
    }

    let provider = MistralProvider::from_settings(&config.llm)
        .context("Missing model credentials")?;
    info!(model = provider.model(), base_url = provider.base_url(), "Provider ready");

    let store = KnowledgeStore::load(&config.knowledge.path).with_context(|| {
        format!(
            "Failed to load knowledge base {}",
            config.knowledge.path.display()
        )
    })?;
    println!("{}", display::load_notice(&store));

    let mut session = ChatSession::new(Arc::new(provider), Arc::new(store), config.llm.sampling);
    let persona = config
        .session
        .system_prompt
        .unwrap_or_else(|| persona::DEFAULT_PERSONA.to_string());
    session.add_system_message(persona);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run(&mut session, stdin, std::io::stdout(), &config.knowledge.path).await
}
