//! Working-list construction: pad short question lists from the pool.
//!
//! A session needs an exact number of questions. Whatever the fetch
//! produced, `QuestionSupply::ensure` tops the list up from the fallback
//! pool, shuffled deterministically so a seeded session replays the same
//! padding. Running the pool dry is an explicit error, never a silent
//! repeat of questions.

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::warn;

use super::fallback::fallback_pool;
use super::model::{NormalizedQuestion, QuestionId};
use crate::core::GameRng;

/// Failure to assemble a complete working list.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SupplyError {
    /// The fallback pool cannot cover the deficit.
    #[error("fallback pool exhausted: short {missing} of {required} questions")]
    PoolExhausted { required: usize, missing: usize },
}

/// Pads question lists from a fallback pool.
#[derive(Clone, Debug)]
pub struct QuestionSupply {
    pool: Vec<NormalizedQuestion>,
}

impl Default for QuestionSupply {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionSupply {
    /// Supply backed by the bundled general-knowledge pool.
    #[must_use]
    pub fn new() -> Self {
        Self { pool: fallback_pool() }
    }

    /// Supply backed by a custom pool.
    #[must_use]
    pub fn with_pool(pool: Vec<NormalizedQuestion>) -> Self {
        Self { pool }
    }

    /// Number of questions the pool can contribute.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// The pool contents, in their stored order.
    #[must_use]
    pub fn pool(&self) -> &[NormalizedQuestion] {
        &self.pool
    }

    /// Build a working list of exactly `required` questions.
    ///
    /// A sufficient `available` list passes through unchanged; its order
    /// is the play order. A short list keeps its prefix and is padded
    /// from a shuffled copy of the pool, skipping IDs already present so
    /// one padding operation never introduces duplicates.
    pub fn ensure(
        &self,
        available: Vec<NormalizedQuestion>,
        required: usize,
        rng: &mut GameRng,
    ) -> Result<Vec<NormalizedQuestion>, SupplyError> {
        if available.len() >= required {
            return Ok(available);
        }

        let deficit = required - available.len();
        let present: FxHashSet<QuestionId> = available.iter().map(|q| q.id()).collect();
        let mut candidates: Vec<NormalizedQuestion> = self
            .pool
            .iter()
            .filter(|q| !present.contains(&q.id()))
            .cloned()
            .collect();

        if candidates.len() < deficit {
            return Err(SupplyError::PoolExhausted {
                required,
                missing: deficit - candidates.len(),
            });
        }

        rng.shuffle(&mut candidates);
        candidates.truncate(deficit);
        warn!(
            padded = deficit,
            required,
            "padding short question list from fallback pool"
        );

        let mut list = available;
        list.extend(candidates);
        Ok(list)
    }
}
