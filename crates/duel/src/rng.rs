use std::sync::{Mutex, PoisonError};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of per-duel random streams.
///
/// One generator lives for the whole process (or test). Each duel draws a
/// single `u64` from it and seeds its own `ChaCha8Rng`, so concurrent duels
/// never share a stream and the lock is held only for that one draw.
#[derive(Debug)]
pub struct RngSource {
    seeds: Mutex<ChaCha8Rng>,
}

impl RngSource {
    /// Seed from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            seeds: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// Fixed seed. The same seed yields the same sequence of duel streams.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seeds: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Seeded from `seed` when given, from entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// A fresh generator for one duel.
    pub fn next_stream(&self) -> ChaCha8Rng {
        let seed = self
            .seeds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_u64();
        ChaCha8Rng::seed_from_u64(seed)
    }
}

impl Default for RngSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
