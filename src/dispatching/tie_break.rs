//! Tie-break sources.
//!
//! When several candidates share the best score, the selector asks a
//! [`TieBreaker`] for an index into the tied set. Production runs use
//! [`SeededTieBreaker`] (uniform random); tests substitute
//! [`FirstTieBreaker`] or a seeded source for reproducible rosters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses one of `n` tied candidates.
pub trait TieBreaker {
    /// Returns an index in `[0, n)`. Only called with `n >= 1`.
    fn next(&mut self, n: usize) -> usize;
}

/// Uniform random choice backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededTieBreaker {
    rng: StdRng,
}

impl SeededTieBreaker {
    /// Reproducible source for a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl TieBreaker for SeededTieBreaker {
    fn next(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.rng.random_range(0..n)
    }
}

/// Always picks the first tied candidate (candidate order is pool order).
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTieBreaker;

impl TieBreaker for FirstTieBreaker {
    fn next(&mut self, _n: usize) -> usize {
        0
    }
}
