//! Seed command - populate the knowledge base from a JSON document.

use anyhow::{Context as _, Result};
use clap::Args;
use console::Style;
use std::path::PathBuf;

use umuhuza_assistant::{ExclusionFilter, seed_knowledge_base};
use umuhuza_embeddings::HashEmbedder;
use umuhuza_knowledge::KnowledgeStore;

use super::Context;

/// Arguments for the seed command.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Knowledge document to read (default: from config)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Knowledge store path (default: from config)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Embedding dimension override
    #[arg(long)]
    pub dim: Option<usize>,

    /// Clear existing snippets before seeding (bulk replace)
    #[arg(long)]
    pub replace: bool,
}

/// Run the seed command.
pub fn run(args: SeedArgs, ctx: &Context) -> Result<()> {
    let document_path = args
        .file
        .unwrap_or_else(|| ctx.config.knowledge.document_path.clone());
    let db_path = args
        .db
        .unwrap_or_else(|| ctx.config.knowledge.db_path.clone());
    let dim = args.dim.unwrap_or(ctx.config.embedding.dim);

    // A missing source document is fatal; seeding has nothing to work with.
    let contents = std::fs::read_to_string(&document_path)
        .with_context(|| format!("Knowledge file not found: {}", document_path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid JSON in {}", document_path.display()))?;

    let store = KnowledgeStore::open(&db_path)?;
    if args.replace {
        let removed = store.clear()?;
        if ctx.verbose {
            println!("Removed {} existing snippets", removed);
        }
    }

    let embedder = HashEmbedder::new(dim);
    let filter = ExclusionFilter::new(&ctx.config.knowledge.excluded_terms);

    let inserted = seed_knowledge_base(&document, &store, &embedder, &filter)?;

    let green = Style::new().green();
    println!(
        "{} {} snippets into {} (dimension {})",
        green.apply_to("Seeded"),
        inserted,
        db_path.display(),
        dim
    );

    Ok(())
}
