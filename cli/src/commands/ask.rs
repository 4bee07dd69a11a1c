//! # Krishi Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! ## Overview
//!
//! `krishi ask` answers a single question and exits. The words of the
//! question are joined with spaces, so quoting is optional.
//!
//! ```bash
//! krishi ask When should I plant rice?
//! krishi ask --show-topic --no-delay "monsoon forecast"
//! # [weather] Monitor rainfall patterns for optimal planting times. ...
//! ```
//!
//! Arguments are taken as raw bytes; a question that is not valid UTF-8 is
//! rejected as invalid input rather than guessed at.
//!
//! With `--show-topic`, the reply is prefixed with the matched category, or
//! `[general]` when the answer came from the default pool.
//!
use super::SessionArgs;
use crate::core::error::Result;
use clap::Parser;
use std::ffi::OsString;
use tracing::info;

/// Label used by `--show-topic` for default-pool answers.
const GENERAL_TOPIC: &str = "general";

#[derive(Parser, Debug)]
#[command(about = "Ask the assistant a single question")]
pub struct AskArgs {
    /// The question. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    message: Vec<OsString>,

    /// Prefix the reply with the topic that answered it.
    #[arg(long)]
    show_topic: bool,

    #[command(flatten)]
    session: SessionArgs,
}

pub async fn handle_ask(args: AskArgs) -> Result<()> {
    info!("Handling ask command...");
    let message = join_words(&args.message);

    let (_cfg, service) = args.session.chat_service()?;
    let reply = service.send_bytes(&message).await?;
    println!("{}", format_reply(reply.topic, reply.text, args.show_topic));
    Ok(())
}

fn join_words(words: &[OsString]) -> Vec<u8> {
    let mut joined = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            joined.push(b' ');
        }
        joined.extend_from_slice(word.as_encoded_bytes());
    }
    joined
}

fn format_reply(topic: Option<&str>, text: &str, show_topic: bool) -> String {
    if show_topic {
        format!("[{}] {}", topic.unwrap_or(GENERAL_TOPIC), text)
    } else {
        text.to_string()
    }
}
