//! UMUHUZA assistant CLI.
//!
//! Main entry point: seed the knowledge base offline, then ask one-shot
//! questions or chat interactively against it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{ask, chat, seed};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// UMUHUZA assistant - knowledge-grounded help for the agriculture platform
#[derive(Parser)]
#[command(name = "umuhuza")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (default: ./umuhuza.toml if present)
    #[arg(long, global = true, env = "UMUHUZA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the knowledge base from a nested JSON knowledge document
    Seed(seed::SeedArgs),

    /// Ask a one-shot question
    Ask(ask::AskArgs),

    /// Enter interactive chat mode (REPL)
    Chat(chat::ChatArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "umuhuza=debug,umuhuza_assistant=debug,umuhuza_knowledge=debug,umuhuza_llm=debug,info"
    } else {
        "umuhuza=info,umuhuza_assistant=info,umuhuza_knowledge=info,umuhuza_llm=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(cli.verbose)
        .init();

    let config = umuhuza_config::load(cli.config.as_deref())?;

    let ctx = commands::Context {
        config,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Seed(args) => seed::run(args, &ctx),
        Commands::Ask(args) => ask::run(args, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
    }
}
