//! # Krishi Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the Krishi CLI, a keyword-driven
//! farming assistant. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to appropriate command handlers
//!
//! ## Architecture
//!
//! - `assistant`: knowledge base, response matcher, randomness and the chat service
//! - `commands`: one module per top-level command
//! - `core`: configuration and error types
//!
//! ## Examples
//!
//! ```bash
//! # One question
//! krishi ask "When should I plant rice?"
//!
//! # Interactive session without the simulated network delay
//! krishi chat --no-delay
//!
//! # What the assistant knows about, with debug logging
//! krishi -vv topics
//! ```
//!
//! Logs go to stderr; stdout carries only what the assistant says.
//!
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod assistant; // Knowledge base, matcher, randomness, chat service
mod commands; // Handles specific command logic (ask, chat, topics, knowledge)
mod core; // Core infrastructure (errors, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "krishi",
    about = "🌾 Krishi: a keyword-driven farming assistant",
    long_about = "Answers farming questions about rice, weather, fertilizer, pests, market prices\n\
                  and government schemes, in English, Malayalam and Hindi keywords.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    #[command(alias = "t")]
    Topics(commands::topics::TopicsArgs),
    /// Export and validate knowledge files.
    #[command(alias = "k")]
    Knowledge(commands::knowledge::KnowledgeCommandArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Topics(args) => commands::topics::handle_topics(args).await,
        Commands::Knowledge(args) => commands::knowledge::handle_knowledge(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    fn krishi_cmd() -> Command {
        Command::cargo_bin("krishi").expect("Failed to find krishi binary for testing")
    }
    #[test]
    fn test_main_help_flag() {
        krishi_cmd().arg("--help").assert().success();
    }
    #[test]
    fn test_main_version_flag() {
        krishi_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
