//! Seeded demo input generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for generated demo arrays.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Number of values
    pub len: usize,
    /// Smallest value (inclusive)
    pub min: i64,
    /// Largest value (inclusive)
    pub max: i64,
    /// Seed for deterministic generation
    pub seed: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            len: 12,
            min: 5,
            max: 99,
            seed: 42,
        }
    }
}

impl InputConfig {
    /// Random values in `[min, max]`, reproducible for a given seed.
    pub fn random_values(&self) -> Vec<i64> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        (0..self.len).map(|_| rng.gen_range(lo..=hi)).collect()
    }

    /// Random values sorted ascending, as binary search expects.
    pub fn sorted_values(&self) -> Vec<i64> {
        let mut values = self.random_values();
        values.sort_unstable();
        values
    }
}

/// The evenly spaced array used by the binary search demo: `3, 6, ..., 3 * len`.
pub fn stepped_values(len: usize) -> Vec<i64> {
    (1..=len as i64).map(|i| i * 3).collect()
}
