//! # Krishi Knowledge Command Group
//!
//! File: cli/src/commands/knowledge/mod.rs
//!
//! ## Overview
//!
//! This module serves as the entry point and router for the `krishi knowledge`
//! command group, which helps maintain knowledge files:
//!
//! ```bash
//! # Write the effective table (built-in plus configured file) as TOML
//! krishi knowledge export --output my_knowledge.toml
//!
//! # Validate a file before pointing the assistant at it
//! krishi knowledge check my_knowledge.toml
//! krishi knowledge check --extend coconut_overlay.toml
//! ```
//!
use crate::core::error::Result;
use clap::{Parser, Subcommand};

mod check;
mod export;

#[derive(Parser, Debug)]
pub struct KnowledgeCommandArgs {
    #[command(subcommand)]
    command: KnowledgeCommand,
}

#[derive(Subcommand, Debug)]
enum KnowledgeCommand {
    /// Write the effective knowledge table as TOML.
    Export(export::ExportArgs),
    /// Validate a knowledge file.
    Check(check::CheckArgs),
}

pub async fn handle_knowledge(args: KnowledgeCommandArgs) -> Result<()> {
    match args.command {
        KnowledgeCommand::Export(args) => export::handle_export(args).await?,
        KnowledgeCommand::Check(args) => check::handle_check(args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_knowledge_export() {
        let result = KnowledgeCommandArgs::try_parse_from(["knowledge", "export", "-o", "kb.toml"]);
        match result.unwrap().command {
            KnowledgeCommand::Export(_) => {}
            _ => panic!("Incorrect subcommand parsed for 'export'"),
        }
    }

    #[test]
    fn test_parses_knowledge_check() {
        let result = KnowledgeCommandArgs::try_parse_from(["knowledge", "check", "kb.toml"]);
        match result.unwrap().command {
            KnowledgeCommand::Check(_) => {}
            _ => panic!("Incorrect subcommand parsed for 'check'"),
        }
    }

    #[test]
    fn test_check_requires_a_file() {
        assert!(KnowledgeCommandArgs::try_parse_from(["knowledge", "check"]).is_err());
    }
}
