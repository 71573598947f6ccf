//! Uniform random tie-breaking with an explicit seed path.

use crate::assignment::ports::TieBreak;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Uniformly random tie-break source.
///
/// Production construction seeds from entropy; tests seed explicitly so
/// tie-break outcomes are reproducible while keeping the uniform semantics.
#[derive(Debug)]
pub struct UniformTieBreak {
    rng: Mutex<StdRng>,
}

impl UniformTieBreak {
    /// Creates a source seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a source with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TieBreak for UniformTieBreak {
    fn pick(&self, count: usize) -> usize {
        if count <= 1 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..count)
    }
}
