//! # Krishi Chat Command
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! `krishi chat` runs an interactive session: the assistant greets the user,
//! then answers one line at a time until the user says goodbye or stdin ends.
//!
//! ```text
//! Krishi: Hello! I am your farming assistant. How can I help you today?
//! (type 'bye' to quit)
//! You: When should I plant rice?
//! Krishi is thinking...
//! [09:41] Krishi: Rice is a staple crop in Kerala. ...
//! You: bye
//! Krishi: Goodbye! Happy farming.
//! ```
//!
//! Each message is handled on its own; the session keeps no conversation
//! history. Blank lines are skipped. A line that cannot be processed (for
//! example bytes that are not UTF-8) gets the configured error message and
//! the session carries on.
//!
use super::SessionArgs;
use crate::assistant::matcher::decode_message;
use crate::assistant::service::ChatService;
use crate::core::config::AssistantConfig;
use crate::core::error::{KrishiError, Result};
use anyhow::Context;
use clap::Parser;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const FAREWELLS: [&str; 3] = ["bye", "exit", "quit"];

#[derive(Parser, Debug)]
#[command(about = "Start an interactive chat with the farming assistant")]
pub struct ChatArgs {
    #[command(flatten)]
    session: SessionArgs,
}

pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    info!("Handling chat command...");
    let (cfg, service) = args.session.chat_service()?;

    let session = ChatSession {
        service: &service,
        assistant: &cfg.assistant,
        show_thinking: cfg.latency.enabled,
    };
    let replies = session.run(BufReader::new(io::stdin()), io::stdout()).await?;
    info!(replies, "Chat session ended");
    Ok(())
}

/// One interactive conversation over any line reader and writer.
pub struct ChatSession<'a> {
    pub service: &'a ChatService,
    pub assistant: &'a AssistantConfig,
    /// Print a "thinking" line while the simulated latency runs.
    pub show_thinking: bool,
}

impl ChatSession<'_> {
    /// Runs until a farewell or end of input. Returns the number of replies given.
    pub async fn run<R, W>(&self, mut input: R, mut out: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let name = &self.assistant.name;
        say(&mut out, &format!("{}: {}\n", name, self.assistant.greeting)).await?;
        say(&mut out, "(type 'bye' to quit)\n").await?;

        let mut replies = 0;
        let mut buf = Vec::new();
        loop {
            say(&mut out, "You: ").await?;

            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .await
                .context("Failed to read chat input")?;
            if read == 0 {
                say(&mut out, "\n").await?;
                break;
            }

            let text = match decode_message(&buf) {
                Ok(text) => text.trim(),
                Err(e) => {
                    warn!("Skipping unreadable chat line: {:#}", e);
                    self.say_error(&mut out).await?;
                    continue;
                }
            };
            if text.is_empty() {
                continue;
            }
            if is_farewell(text) {
                say(&mut out, &format!("{}: Goodbye! Happy farming.\n", name)).await?;
                break;
            }

            if self.show_thinking {
                say(&mut out, &format!("{} is thinking...\n", name)).await?;
            }
            match self.service.send_message(text).await {
                Ok(reply) => {
                    say(&mut out, &format!("[{}] {}: {}\n", timestamp(), name, reply)).await?;
                    replies += 1;
                }
                Err(e) => {
                    let rejected = e
                        .downcast_ref::<KrishiError>()
                        .is_some_and(KrishiError::is_invalid_input);
                    if rejected {
                        debug!("Chat message rejected: {:#}", e);
                    } else {
                        warn!("Could not answer chat message: {:#}", e);
                    }
                    self.say_error(&mut out).await?;
                }
            }
        }
        Ok(replies)
    }

    async fn say_error<W: AsyncWrite + Unpin>(&self, out: &mut W) -> Result<()> {
        let line = format!(
            "[{}] {}: {}\n",
            timestamp(),
            self.assistant.name,
            self.assistant.error_message
        );
        say(out, &line).await
    }
}

/// Writes and flushes, so prompts show up before input is read.
async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .await
        .context("Failed to write chat output")?;
    out.flush().await.context("Failed to flush output")?;
    Ok(())
}

fn is_farewell(text: &str) -> bool {
    FAREWELLS.iter().any(|word| text.eq_ignore_ascii_case(word))
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
