//! # Krishi Knowledge Check Command
//!
//! File: cli/src/commands/knowledge/check.rs
//!
//! Validates a knowledge file without starting the assistant. With
//! `--extend` the file is checked as an overlay on the built-in table, so it
//! may omit `default_responses`.
//!
use crate::assistant::knowledge::{KnowledgeBase, KnowledgeFile};
use crate::core::error::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Validate a knowledge file")]
pub struct CheckArgs {
    /// The knowledge file to validate.
    file: PathBuf,

    /// Check the file as an overlay on the built-in table.
    #[arg(long)]
    extend: bool,
}

pub async fn handle_check(args: CheckArgs) -> Result<()> {
    info!("Checking knowledge file {}", args.file.display());
    let kb = if args.extend {
        let overlay = KnowledgeFile::read(&args.file)?;
        KnowledgeBase::builtin()?.extend(overlay)?
    } else {
        KnowledgeBase::load(&args.file)?
    };
    println!(
        "Knowledge file '{}' is valid: {} topic(s), {} general response(s).",
        args.file.display(),
        kb.categories().len(),
        kb.default_responses().len()
    );
    Ok(())
}
