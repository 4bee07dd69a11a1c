//! # Krishi Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout Krishi. The response
//! matcher itself cannot fail on a well-formed message, so the error surface
//! is small: contract violations at the input boundary, configuration
//! problems, and knowledge tables that break their invariants.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `KrishiError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! ## Examples
//!
//! ```rust
//! // Reject a caller contract violation
//! if message.trim().is_empty() {
//!     return Err(KrishiError::InvalidInput("message is empty".into()).into());
//! }
//!
//! // Add context to errors using anyhow
//! let kb = KnowledgeBase::load(&path)
//!     .with_context(|| format!("Failed to load knowledge from {}", path.display()))?;
//!
//! // Pattern matching on error types
//! match service.send_message(text).await {
//!     Ok(reply) => println!("{}", reply),
//!     Err(e) if e.downcast_ref::<KrishiError>().map_or(false, KrishiError::is_invalid_input) => {
//!         println!("{}", cfg.assistant.error_message);
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the Krishi application.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KrishiError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller broke the input contract (empty message, bytes that are not text).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Category '{name}' is declared more than once.")]
    DuplicateCategory { name: String },

    #[error("Category '{category}' has no responses.")]
    EmptyResponses { category: String },

    #[error("The default response pool is empty.")]
    EmptyDefaultPool,
}

impl KrishiError {
    /// True for `InvalidInput`, handy with `anyhow::Error::downcast_ref`.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, KrishiError::InvalidInput(_))
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
