//! # Krishi Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for Krishi, handling loading,
//! merging, validation, and access to configuration data. It combines built-in
//! defaults, user settings, and project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.krishi.toml` in current directory or ancestors
//! 2. User-specific `config.toml` in the platform config directory
//! 3. Default values defined in the code
//!
//! Command-line flags (`--knowledge`, `--no-delay`) are applied on top by the
//! command handlers after loading.
//!
//! ## Examples
//!
//! ```toml
//! [assistant]
//! name = "Krishi"
//!
//! [knowledge]
//! path = "~/farm/knowledge.toml"
//! mode = "extend"
//!
//! [latency]
//! min_ms = 200
//! max_ms = 800
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let kb = KnowledgeBase::from_config(&cfg.knowledge)?;
//! ```
//!
use crate::core::error::{KrishiError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
}

/// How the assistant presents itself in the chat front end.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Name printed in front of every reply.
    #[serde(default = "default_assistant_name")]
    pub name: String,
    /// First message of a chat session.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Shown instead of a reply when a message cannot be processed.
    #[serde(default = "default_error_message")]
    pub error_message: String,
}

/// Where the category table comes from.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Knowledge file (can use ~). Will be expanded. `None` means built-in only.
    #[serde(default)]
    pub path: Option<String>,
    /// Whether `path` replaces the built-in table or is layered over it.
    #[serde(default)]
    pub mode: KnowledgeMode,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeMode {
    #[default]
    Replace,
    Extend,
}

/// Artificial delay before each reply, emulating a network round trip.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LatencyConfig {
    #[serde(default = "default_latency_enabled")]
    pub enabled: bool,
    #[serde(default = "default_latency_min_ms")]
    pub min_ms: u64,
    #[serde(default = "default_latency_max_ms")]
    pub max_ms: u64,
}

/// One configuration file as written. A field that is absent stays `None`,
/// so an explicit value equal to the default still overrides lower layers.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    #[serde(default)]
    assistant: AssistantLayer,
    #[serde(default)]
    knowledge: KnowledgeLayer,
    #[serde(default)]
    latency: LatencyLayer,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct AssistantLayer {
    name: Option<String>,
    greeting: Option<String>,
    error_message: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct KnowledgeLayer {
    path: Option<String>,
    mode: Option<KnowledgeMode>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct LatencyLayer {
    enabled: Option<bool>,
    min_ms: Option<u64>,
    max_ms: Option<u64>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            greeting: default_greeting(),
            error_message: default_error_message(),
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: default_latency_enabled(),
            min_ms: default_latency_min_ms(),
            max_ms: default_latency_max_ms(),
        }
    }
}

fn default_assistant_name() -> String {
    "Krishi".to_string()
}
fn default_greeting() -> String {
    "Hello! I am your farming assistant. How can I help you today?".to_string()
}
fn default_error_message() -> String {
    "Sorry, I could not process your message. Please try again.".to_string()
}
fn default_latency_enabled() -> bool {
    true
}
fn default_latency_min_ms() -> u64 {
    1000
}
fn default_latency_max_ms() -> u64 {
    3000
}

const PROJECT_CONFIG_FILENAME: &str = ".krishi.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(
        user_config.unwrap_or_default(),
        project_config.unwrap_or_default(),
    );
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Krishi", "krishi") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_layer_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigLayer>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_layer_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.krishi.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root, stopping at the first
/// `.krishi.toml` or at a repository boundary (`.git`).
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_layer_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let mut layer: ConfigLayer = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    if let Some(base) = path.parent() {
        resolve_relative_paths(&mut layer, base);
    }
    Ok(layer)
}

/// Relative knowledge paths are relative to the file that declares them.
fn resolve_relative_paths(layer: &mut ConfigLayer, base: &Path) {
    if let Some(kb_path) = layer.knowledge.path.as_mut() {
        if !kb_path.starts_with('~') && Path::new(kb_path.as_str()).is_relative() {
            *kb_path = base.join(kb_path.as_str()).to_string_lossy().into_owned();
        }
    }
}

/// Every field comes from the project file if it sets it, then the user file,
/// then the built-in default.
fn merge_configs(user: ConfigLayer, project: ConfigLayer) -> Config {
    let defaults = Config::default();
    Config {
        assistant: AssistantConfig {
            name: project
                .assistant
                .name
                .or(user.assistant.name)
                .unwrap_or(defaults.assistant.name),
            greeting: project
                .assistant
                .greeting
                .or(user.assistant.greeting)
                .unwrap_or(defaults.assistant.greeting),
            error_message: project
                .assistant
                .error_message
                .or(user.assistant.error_message)
                .unwrap_or(defaults.assistant.error_message),
        },
        knowledge: KnowledgeConfig {
            path: project.knowledge.path.or(user.knowledge.path),
            mode: project
                .knowledge
                .mode
                .or(user.knowledge.mode)
                .unwrap_or(defaults.knowledge.mode),
        },
        latency: LatencyConfig {
            enabled: project
                .latency
                .enabled
                .or(user.latency.enabled)
                .unwrap_or(defaults.latency.enabled),
            min_ms: project
                .latency
                .min_ms
                .or(user.latency.min_ms)
                .unwrap_or(defaults.latency.min_ms),
            max_ms: project
                .latency
                .max_ms
                .or(user.latency.max_ms)
                .unwrap_or(defaults.latency.max_ms),
        },
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(path) = config.knowledge.path.as_mut() {
        *path = shellexpand::tilde(path.as_str()).into_owned();
        debug!("Expanded knowledge path: {}", path);
    }
    Ok(())
}

pub fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    if config.assistant.name.trim().is_empty() {
        return Err(anyhow!(KrishiError::Config(
            "assistant.name cannot be empty.".to_string()
        )));
    }
    if config.latency.min_ms > config.latency.max_ms {
        return Err(anyhow!(KrishiError::Config(format!(
            "latency.min_ms ({}) is greater than latency.max_ms ({}).",
            config.latency.min_ms, config.latency.max_ms
        ))));
    }
    if let Some(path) = &config.knowledge.path {
        let kb_path = PathBuf::from(path);
        if !kb_path.exists() {
            return Err(anyhow!(KrishiError::Config(format!(
                "Configured knowledge file '{}' does not exist.",
                kb_path.display()
            ))));
        } else if !kb_path.is_file() {
            return Err(anyhow!(KrishiError::Config(format!(
                "Configured knowledge path '{}' exists but is not a file.",
                kb_path.display()
            ))));
        }
    }
    if config.knowledge.mode == KnowledgeMode::Extend && config.knowledge.path.is_none() {
        warn!("knowledge.mode is 'extend' but no knowledge.path is set; using the built-in table.");
    }
    debug!("Configuration validation successful.");
    Ok(())
}
