//! # Krishi Topics Command
//!
//! File: cli/src/commands/topics.rs
//!
//! ## Overview
//!
//! `krishi topics` prints the category table the assistant answers from, in
//! the order categories are tried. When a message contains keywords of
//! several topics, the one listed first answers.
//!
//! ```text
//! Topics (checked top to bottom):
//!
//! #  | Topic      | Replies | Keywords
//! ---+------------+---------+------------------------------------------
//! 1  | rice       | 2       | rice, paddy, അരി, चावल
//! 2  | weather    | 2       | weather, rain, monsoon, കാലാവസ്ഥ, മഴ, ...
//!
//! 6 topic(s), 4 general response(s).
//! ```
//!
use super::KnowledgeArgs;
use crate::assistant::knowledge::KnowledgeBase;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "List the topics the assistant recognises, in priority order")]
pub struct TopicsArgs {
    #[command(flatten)]
    source: KnowledgeArgs,
}

pub async fn handle_topics(args: TopicsArgs) -> Result<()> {
    info!("Handling topics command...");
    let (_cfg, kb) = args.source.load_knowledge()?;
    print!("{}", render_topic_table(&kb));
    Ok(())
}

fn render_topic_table(kb: &KnowledgeBase) -> String {
    let mut table = String::new();
    if kb.categories().is_empty() {
        table.push_str("No topics configured; every message gets a general response.\n");
        table.push_str(&format!(
            "{} general response(s).\n",
            kb.default_responses().len()
        ));
        return table;
    }

    let name_width = kb
        .categories()
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Topic".len());

    table.push_str("Topics (checked top to bottom):\n\n");
    table.push_str(&format!(
        "{:<2} | {:<name_width$} | Replies | Keywords\n",
        "#", "Topic"
    ));
    table.push_str(&format!(
        "{}+{}+---------+{}\n",
        "-".repeat(3),
        "-".repeat(name_width + 2),
        "-".repeat(42)
    ));
    for (position, category) in kb.categories().iter().enumerate() {
        table.push_str(&format!(
            "{:<2} | {:<name_width$} | {:<7} | {}\n",
            position + 1,
            category.name,
            category.responses.len(),
            category.keywords.join(", ")
        ));
    }
    table.push_str(&format!(
        "\n{} topic(s), {} general response(s).\n",
        kb.categories().len(),
        kb.default_responses().len()
    ));
    table
}
