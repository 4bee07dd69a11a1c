//! # Knowledge Base
//!
//! File: cli/src/assistant/knowledge.rs
//!
//! ## Overview
//!
//! The knowledge base is the ordered category table plus the default response
//! pool that the matcher answers from. It is validated once when constructed
//! and never mutated afterwards; consumers share it behind an `Arc`.
//!
//! A table comes from one of three places:
//! - the built-in farming table embedded at compile time (`assets/farming_knowledge.toml`)
//! - a knowledge file that replaces it (`knowledge.mode = "replace"`)
//! - a knowledge file layered over it (`knowledge.mode = "extend"`)
//!
//! ## File Format
//!
//! ```toml
//! default_responses = ["Ask me about crops, weather or prices."]
//!
//! [[categories]]
//! name = "coconut"
//! keywords = ["coconut", "തെങ്ങ്"]
//! responses = ["Coconut palms need well-drained soil."]
//! ```
//!
//! Category order in the file is priority order: the first category whose
//! keyword occurs in a message wins.
//!
use crate::core::config::{KnowledgeConfig, KnowledgeMode};
use crate::core::error::{KrishiError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const BUILTIN_KNOWLEDGE: &str = include_str!("../../assets/farming_knowledge.toml");

/// A topic bucket: trigger keywords and the replies it may give.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
    pub responses: Vec<String>,
}

impl Category {
    /// True if any keyword occurs in `lowered`.
    ///
    /// Plain substring containment: `"rain"` matches inside `"brain"`.
    /// `lowered` must already be lowercased; keywords are trimmed and
    /// lowercased when the owning `KnowledgeBase` is built.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }
}

/// On-disk shape of a knowledge table.
///
/// `default_responses` may be left out of overlay files, in which case the
/// base table keeps its own pool.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeFile {
    #[serde(default)]
    pub default_responses: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl KnowledgeFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse knowledge table")
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse knowledge file: {}", path.display()))
    }
}

/// Validated, immutable category table and default pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    categories: Vec<Category>,
    default_responses: Vec<String>,
}

impl KnowledgeBase {
    /// Builds a knowledge base, checking every table invariant.
    ///
    /// ## Errors
    ///
    /// * `DuplicateCategory` if two categories share a name.
    /// * `EmptyResponses` if a category has no replies.
    /// * `EmptyDefaultPool` if `default_responses` is empty.
    /// * `Knowledge` for blank names, keywords or replies, or a category without keywords.
    ///
    /// Keywords are stored trimmed and lowercased.
    pub fn new(categories: Vec<Category>, default_responses: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(categories.len());

        for mut category in categories {
            category.name = category.name.trim().to_string();
            if category.name.is_empty() {
                return Err(KrishiError::Knowledge("Category name cannot be empty.".into()).into());
            }
            if !seen.insert(category.name.clone()) {
                return Err(KrishiError::DuplicateCategory {
                    name: category.name,
                }
                .into());
            }
            if category.keywords.is_empty() {
                return Err(KrishiError::Knowledge(format!(
                    "Category '{}' has no keywords.",
                    category.name
                ))
                .into());
            }
            // A blank keyword is contained in every message, even the empty one.
            if category.keywords.iter().any(|kw| kw.trim().is_empty()) {
                return Err(KrishiError::Knowledge(format!(
                    "Category '{}' has a blank keyword.",
                    category.name
                ))
                .into());
            }
            if category.responses.is_empty() {
                return Err(KrishiError::EmptyResponses {
                    category: category.name,
                }
                .into());
            }
            if category.responses.iter().any(|r| r.trim().is_empty()) {
                return Err(KrishiError::Knowledge(format!(
                    "Category '{}' has a blank response.",
                    category.name
                ))
                .into());
            }
            category.keywords = category
                .keywords
                .iter()
                .map(|kw| kw.trim().to_lowercase())
                .collect();
            validated.push(category);
        }

        if default_responses.is_empty() {
            return Err(KrishiError::EmptyDefaultPool.into());
        }
        if default_responses.iter().any(|r| r.trim().is_empty()) {
            return Err(
                KrishiError::Knowledge("The default pool has a blank response.".into()).into(),
            );
        }

        Ok(Self {
            categories: validated,
            default_responses,
        })
    }

    /// The farming table compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_KNOWLEDGE).context("Built-in knowledge table is invalid")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::try_from(KnowledgeFile::parse(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::try_from(KnowledgeFile::read(path)?)
            .with_context(|| format!("Invalid knowledge file: {}", path.display()))
    }

    /// Resolves the table selected by the `[knowledge]` configuration section.
    pub fn from_config(config: &KnowledgeConfig) -> Result<Self> {
        let Some(path) = config.path.as_deref() else {
            debug!("No knowledge file configured, using the built-in table.");
            return Self::builtin();
        };
        let path = Path::new(path);
        match config.mode {
            KnowledgeMode::Replace => {
                info!("Loading knowledge table from {}", path.display());
                Self::load(path)
            }
            KnowledgeMode::Extend => {
                info!("Extending built-in knowledge with {}", path.display());
                let overlay = KnowledgeFile::read(path)?;
                Self::builtin()?
                    .extend(overlay)
                    .with_context(|| format!("Invalid knowledge overlay: {}", path.display()))
            }
        }
    }

    /// Layers `overlay` over this table.
    ///
    /// A category whose name already exists is replaced where it stands, so it
    /// keeps its priority. New categories go to the end. A non-empty overlay
    /// default pool replaces the current one.
    pub fn extend(self, overlay: KnowledgeFile) -> Result<Self> {
        let mut overlay_names = HashSet::new();
        for category in &overlay.categories {
            let name = category.name.trim();
            if !overlay_names.insert(name.to_string()) {
                return Err(KrishiError::DuplicateCategory {
                    name: name.to_string(),
                }
                .into());
            }
        }

        let mut categories = self.categories;
        for incoming in overlay.categories {
            let name = incoming.name.trim().to_string();
            match categories.iter_mut().find(|c| c.name == name) {
                Some(existing) => {
                    debug!("Overlay replaces category '{}'", name);
                    *existing = incoming;
                }
                None => {
                    debug!("Overlay adds category '{}'", name);
                    categories.push(incoming);
                }
            }
        }

        let default_responses = if overlay.default_responses.is_empty() {
            self.default_responses
        } else {
            overlay.default_responses
        };
        Self::new(categories, default_responses)
    }

    /// Categories in priority order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn default_responses(&self) -> &[String] {
        &self.default_responses
    }

    /// Renders the table in the knowledge file format.
    pub fn to_toml_string(&self) -> Result<String> {
        let file = KnowledgeFile {
            default_responses: self.default_responses.clone(),
            categories: self.categories.clone(),
        };
        toml::to_string_pretty(&file).context("Failed to render knowledge table as TOML")
    }
}

impl TryFrom<KnowledgeFile> for KnowledgeBase {
    type Error = anyhow::Error;

    fn try_from(file: KnowledgeFile) -> Result<Self> {
        Self::new(file.categories, file.default_responses)
    }
}
