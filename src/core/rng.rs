//! Seeded randomness for coin flips, deck shuffles and health rolls.
//!
//! A game draws every random value from one [`GameRng`], so two games built
//! from the same seed and fed the same turn actions stay identical. Replays
//! rely on this.
//!
//! ```
//! use hc_engine::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! let flips_a: Vec<bool> = (0..8).map(|_| a.coin_flip()).collect();
//! let flips_b: Vec<bool> = (0..8).map(|_| b.coin_flip()).collect();
//! assert_eq!(flips_a, flips_b);
//! ```

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// `true` is heads.
    pub fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Uniform pick from `range`.
    pub fn roll(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    pub fn shuffle<T>(&mut self, cards: &mut [T]) {
        cards.shuffle(&mut self.inner);
    }
}
