//! Deterministic random number generation for replayable sessions.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences for different purposes,
//!   so fallback-pool shuffling never shifts the bonus-roll stream
//! - **Single draw surface**: every probability roll and die roll in the
//!   engine goes through here, never through a global RNG
//!
//! ## Usage
//!
//! ```
//! use quiz_ladder::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//!
//! // Probability draw in [0, 1) for the bonus arbiter.
//! let p = rng.draw();
//! assert!((0.0..1.0).contains(&p));
//!
//! // Lucky number for the bonus round.
//! let lucky = rng.roll_die(6);
//! assert!((1..=6).contains(&lucky));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Deterministic RNG for shuffles, probability draws, and die rolls.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
/// Supports context-based independent streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system.
    ///
    /// Intended for the outermost call site only; everything below it
    /// should receive a seeded instance so sessions stay replayable.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// Useful for separating randomness domains (e.g., pool shuffling vs
    /// bonus rolls). The same context always produces the same stream from
    /// the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
        }
    }

    /// Draw a probability sample uniformly from [0, 1).
    pub fn draw(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Roll a die with the given number of sides, yielding 1..=sides.
    ///
    /// # Panics
    ///
    /// Panics if `sides` is 0.
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        assert!(sides > 0, "Die must have at least 1 side");
        self.inner.gen_range(1..=sides)
    }

    /// Generate a random integer in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
