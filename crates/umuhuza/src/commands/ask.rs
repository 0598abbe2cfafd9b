//! Ask command - one-shot question to the assistant.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use console::Style;

use umuhuza_assistant::Assistant;
use umuhuza_knowledge::KnowledgeStore;
use umuhuza_llm::{GroqBackend, GroqConfig};

use super::Context;

/// Arguments for the ask command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to send
    #[arg(required = true)]
    pub prompt: String,

    /// Knowledge store path (default: from config)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Skip knowledge retrieval
    #[arg(long)]
    pub no_knowledge: bool,
}

/// Run the ask command.
pub async fn run(args: AskArgs, ctx: &Context) -> Result<()> {
    let assistant = build_assistant(ctx)?;
    let store = open_store(args.db, args.no_knowledge, ctx)?;

    let reply = assistant
        .generate(&args.prompt, &[], store.as_ref())
        .await?;
    println!("{}", reply);

    Ok(())
}

/// Build an assistant from the resolved configuration.
///
/// The config loader already overlaid `GROQ_API_KEY`; a still-absent key
/// surfaces as a typed error on the first completion, not here.
pub fn build_assistant(ctx: &Context) -> Result<Assistant> {
    let groq_config = GroqConfig::with_key(ctx.config.llm.api_key.clone());
    let backend = Arc::new(GroqBackend::new(groq_config)?);
    Ok(Assistant::new(backend, ctx.config.clone()))
}

/// Open the knowledge store unless retrieval is disabled.
pub fn open_store(
    db: Option<PathBuf>,
    no_knowledge: bool,
    ctx: &Context,
) -> Result<Option<KnowledgeStore>> {
    if no_knowledge {
        return Ok(None);
    }

    let db_path = db.unwrap_or_else(|| ctx.config.knowledge.db_path.clone());
    let store = KnowledgeStore::open(&db_path)?;

    if ctx.verbose {
        let dim = Style::new().dim();
        println!(
            "{}",
            dim.apply_to(format!(
                "Knowledge store: {} ({} rows)",
                db_path.display(),
                store.count()?
            ))
        );
    }

    Ok(Some(store))
}
