//! # Krishi CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`ask.rs`, `chat.rs`, ...).
//! Each `.rs` file in `cli/tests/` is compiled as a separate test crate that
//! runs the compiled `krishi` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// The built-in rice replies, for asserting which pool an answer came from.
pub const RICE_REPLIES: [&str; 2] = [
    "Rice is a staple crop in Kerala. For best results, plant during the monsoon season (June-July). Use organic fertilizers and ensure proper water management.",
    "Rice cultivation requires 20-25°C temperature and 100-150cm rainfall. Use certified seeds and practice crop rotation.",
];

/// # Get Krishi Command (`krishi_cmd`)
///
/// An `assert_cmd::Command` for the `krishi` binary built for this test run.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn krishi_cmd() -> Command {
    Command::cargo_bin("krishi").expect("Failed to find krishi binary for testing")
}

/// # Isolated Krishi Command (`isolated_cmd`)
///
/// Like `krishi_cmd`, but run from `dir` with the user config directory and
/// `KRISHI_KNOWLEDGE` pointed away from the developer's own setup, so only
/// files the test writes into `dir` are picked up.
pub fn isolated_cmd(dir: &Path) -> Command {
    let mut cmd = krishi_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("KRISHI_KNOWLEDGE")
        .env_remove("RUST_LOG");
    cmd
}
