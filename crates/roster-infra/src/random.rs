//! Seedable reviewer picker.
//!
//! A single `ChaCha8Rng` behind a mutex is shared by every request. Seeding it
//! from configuration makes reviewer selection reproducible across runs.

use std::sync::Mutex;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roster_core::service::picker::ReviewerPicker;
use roster_types::config::SelectionConfig;
use roster_types::user::User;

/// `ReviewerPicker` backed by a ChaCha8 stream.
pub struct RandomPicker {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomPicker {
    /// Seed from the thread-local generator, which is itself seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Deterministic picker: the same seed yields the same selections.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        match config.seed {
            Some(seed) => {
                tracing::info!(seed, "reviewer selection uses a fixed seed");
                Self::seeded(seed)
            }
            None => Self::from_entropy(),
        }
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn with_locked<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        // A panic while holding the lock cannot leave the RNG in a bad state.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl ReviewerPicker for RandomPicker {
    fn shuffle(&self, candidates: &mut [User]) {
        self.with_locked(|rng| candidates.shuffle(rng));
    }

    fn pick(&self, len: usize) -> usize {
        self.with_locked(|rng| rng.random_range(0..len))
    }
}
