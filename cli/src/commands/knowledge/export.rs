//! # Krishi Knowledge Export Command
//!
//! File: cli/src/commands/knowledge/export.rs
//!
//! Writes the knowledge table the assistant would answer from, after
//! configuration and `--knowledge` are applied, in the knowledge file format.
//! The output is a convenient starting point for a custom table.
//!
use crate::commands::KnowledgeArgs;
use crate::core::error::Result;
use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Write the effective knowledge table as TOML")]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Overwrite `--output` if it already exists.
    #[arg(long, short)]
    force: bool,

    #[command(flatten)]
    source: KnowledgeArgs,
}

pub async fn handle_export(args: ExportArgs) -> Result<()> {
    let (_cfg, kb) = args.source.load_knowledge()?;
    let rendered = kb.to_toml_string()?;

    match args.output {
        Some(path) => {
            if path.exists() && !args.force {
                bail!(
                    "Refusing to overwrite '{}'. Use --force to replace it.",
                    path.display()
                );
            }
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write knowledge table to {}", path.display()))?;
            info!("Knowledge table written to {}", path.display());
            println!(
                "Exported {} topic(s) to '{}'.",
                kb.categories().len(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
