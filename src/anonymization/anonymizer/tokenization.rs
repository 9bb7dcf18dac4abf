//! Token generation

use super::TokenGenerator;
use rand::distributions::Alphanumeric;
use rand::{Rng, SeedableRng};

/// Default token length
pub const DEFAULT_TOKEN_LENGTH: usize = 12;

/// Random alphanumeric tokens of a fixed length
///
/// Tokens carry no information about the original value and are not checked
/// for uniqueness; a collision between two categories is tolerated.
pub struct RandomTokenGenerator {
    length: usize,
    /// Random number generator (StdRng is Send + Sync)
    rng: rand::rngs::StdRng,
}

impl RandomTokenGenerator {
    /// Create a generator producing tokens of `length` characters
    pub fn new(length: usize) -> Self {
        Self {
            length,
            rng: rand::rngs::StdRng::from_entropy(),
        }
    }

    /// Create a reproducible generator
    pub fn seeded(length: usize, seed: u64) -> Self {
        Self {
            length,
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LENGTH)
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Predictable tokens (`prefix1`, `prefix2`, ...) for tests and dry comparisons
pub struct SequentialTokenGenerator {
    prefix: String,
    counter: usize,
}

impl SequentialTokenGenerator {
    /// Create a generator numbering tokens after `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }
}

impl TokenGenerator for SequentialTokenGenerator {
    fn generate(&mut self) -> String {
        self.counter += 1;
        format!("{}{}", self.prefix, self.counter)
    }
}
