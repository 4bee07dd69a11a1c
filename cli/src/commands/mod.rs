//! # Krishi Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates all top-level commands of the Krishi CLI and the
//! argument groups they share.
//!
//! ## Commands
//!
//! - `ask`: One-shot question, one reply
//! - `chat`: Interactive session on stdin/stdout
//! - `topics`: The category table in priority order
//! - `knowledge`: Export and check knowledge files
//!
//! Each command defines its own arguments structure and handler function.
//! `KnowledgeArgs` and `SessionArgs` are flattened into the commands that
//! need them, so flags read the same everywhere.
//!
use crate::assistant::knowledge::KnowledgeBase;
use crate::assistant::random;
use crate::assistant::service::ChatService;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

/// One-shot question answering (`krishi ask`).
pub mod ask;
/// Interactive chat session (`krishi chat`).
pub mod chat;
/// Knowledge file maintenance (`krishi knowledge export|check`).
pub mod knowledge;
/// Category listing (`krishi topics`).
pub mod topics;

/// Where answers come from.
#[derive(Args, Debug, Clone, Default)]
pub struct KnowledgeArgs {
    /// Knowledge file to answer from. Replaces or extends the built-in table
    /// according to `knowledge.mode` in the configuration.
    #[arg(long, env = "KRISHI_KNOWLEDGE", value_name = "FILE")]
    pub knowledge: Option<PathBuf>,
}

impl KnowledgeArgs {
    /// Loads configuration and applies the `--knowledge` override.
    pub fn load_config(&self) -> Result<Config> {
        let mut cfg = config::load_config().context("Failed to load Krishi configuration")?;
        if let Some(path) = &self.knowledge {
            debug!("Knowledge file overridden on the command line: {}", path.display());
            cfg.knowledge.path = Some(path.to_string_lossy().into_owned());
            config::validate_config(&cfg).context("Invalid --knowledge option")?;
        }
        Ok(cfg)
    }

    pub fn load_knowledge(&self) -> Result<(Config, KnowledgeBase)> {
        let cfg = self.load_config()?;
        let kb = KnowledgeBase::from_config(&cfg.knowledge)?;
        Ok((cfg, kb))
    }
}

/// Options for commands that talk to the assistant.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    #[command(flatten)]
    pub source: KnowledgeArgs,

    /// Reply immediately instead of simulating network latency.
    #[arg(long)]
    pub no_delay: bool,

    /// Seed for reproducible reply selection.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

impl SessionArgs {
    pub fn load_config(&self) -> Result<Config> {
        let mut cfg = self.source.load_config()?;
        if self.no_delay {
            cfg.latency.enabled = false;
        }
        Ok(cfg)
    }

    /// Configuration plus the one chat service used for the whole process.
    pub fn chat_service(&self) -> Result<(Config, ChatService)> {
        let cfg = self.load_config()?;
        let service = ChatService::from_config(&cfg, random::from_seed(self.seed))
            .context("Failed to prepare the assistant")?;
        Ok((cfg, service))
    }
}
