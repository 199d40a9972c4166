// src/random.rs
//! Injectable randomness for story embellishments, fallback templates and
//! soundscape tie-breaks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of uniform choices. Shared across requests behind an `Arc`.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn pick(&self, len: usize) -> usize;
}

/// Pick one element uniformly, `None` for an empty slice.
pub fn choose<'a, T>(rng: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.pick(items.len()))
}

/// Pick one element of a table that is never empty, such as the catalog's.
///
/// # Panics
///
/// Panics if `items` is empty.
pub fn pick_one<'a, T>(rng: &dyn RandomSource, items: &'a [T]) -> &'a T {
    &items[rng.pick(items.len()) % items.len()]
}

/// Process-wide thread RNG. Used by the server.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::rng().random_range(0..len)
    }
}

/// Reproducible RNG seeded once.
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
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..len)
    }
}

/// Always picks the same position (wrapped to the slice length).
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0 % len
    }
}
