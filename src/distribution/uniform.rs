//! Uniform random values
//!
//! Every value in `[0, max)` has equal probability. Uses the xoshiro256++ PRNG,
//! which is fast and has good statistical properties.

use super::Distribution;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Uniform random distribution
pub struct UniformDistribution {
    rng: Xoshiro256PlusPlus,
}

impl UniformDistribution {
    /// Create a new uniform distribution with random seed
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// Create a new uniform distribution with specific seed
    ///
    /// Useful for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl Default for UniformDistribution {
    fn default() -> Self {
        Self::new()
    }
}

impl Distribution for UniformDistribution {
    #[inline(always)]
    fn next_value(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }
}
