//! # Krishi Assistant Engine
//!
//! File: cli/src/assistant/mod.rs
//!
//! ## Overview
//!
//! Everything that turns a farmer's question into an answer, independent of
//! how the question arrives:
//!
//! - `knowledge`: the ordered category table and default pool, with loading and validation
//! - `matcher`: keyword containment matching and reply selection
//! - `random`: the injected randomness capability (thread, seeded, test double)
//! - `service`: input validation and simulated latency around the matcher
//!
//! The command handlers in `commands::` build one `ChatService` per process
//! and reuse it for every message.
//!
pub mod knowledge;
pub mod matcher;
pub mod random;
pub mod service;
