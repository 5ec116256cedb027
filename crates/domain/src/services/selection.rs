//! Random advertisement selection.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Picks one id uniformly at random. `None` when `ids` is empty.
pub fn pick_uniform<R: Rng + ?Sized>(ids: &[i64], rng: &mut R) -> Option<i64> {
    ids.choose(rng).copied()
}

/// Process-wide random source for the selection endpoint.
///
/// The lock is held only for the pick itself, never across an await.
pub struct AdSelector {
    rng: Mutex<StdRng>,
}

impl AdSelector {
    /// Selector seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic selector, for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seeded when `seed` is present, otherwise from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }

    pub fn pick(&self, ids: &[i64]) -> Option<i64> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        pick_uniform(ids, &mut *rng)
    }
}

impl std::fmt::Debug for AdSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdSelector").finish_non_exhaustive()
    }
}
