//! # Randomness Providers
//!
//! File: cli/src/assistant/random.rs
//!
//! Response selection and latency jitter never call an RNG directly; they go
//! through a `RandomSource`. Production code uses the thread RNG, `--seed`
//! swaps in a seeded `StdRng` for reproducible sessions, and tests use a
//! fixed sequence.
//!
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Source of uniformly distributed indices.
pub trait RandomSource: Send + Sync {
    /// An index in `0..len`, or `None` for an empty range or when no
    /// randomness is available. Callers fall back to index 0 on `None`.
    fn pick_index(&self, len: usize) -> Option<usize>;
}

/// `rand::thread_rng()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(rand::thread_rng().gen_range(0..len))
    }
}

/// Deterministic source: the same seed replays the same picks.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self.rng.lock() {
            Ok(mut rng) => Some(rng.gen_range(0..len)),
            Err(_) => {
                warn!("Seeded RNG lock is poisoned; falling back to the first entry.");
                None
            }
        }
    }
}

/// Seeded source when a seed is given, thread RNG otherwise.
pub fn from_seed(seed: Option<u64>) -> Arc<dyn RandomSource> {
    match seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    }
}

/// Test double replaying a fixed list of picks, cycling when exhausted.
///
/// Values are returned as-is, out-of-range ones included.
#[cfg(test)]
pub(crate) struct FixedSequence {
    picks: Vec<Option<usize>>,
    cursor: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FixedSequence {
    pub(crate) fn new(picks: Vec<Option<usize>>) -> Self {
        Self {
            picks,
            cursor: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub(crate) fn always(index: usize) -> Self {
        Self::new(vec![Some(index)])
    }
}

#[cfg(test)]
impl RandomSource for FixedSequence {
    fn pick_index(&self, _len: usize) -> Option<usize> {
        if self.picks.is_empty() {
            return None;
        }
        let at = self
            .cursor
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.picks[at % self.picks.len()]
    }
}
