//! Picking one site out of an enumeration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SearchError;

use super::types::Selection;

/// Chooses among candidates either round-robin by attempt index or uniformly
/// at random. The random source is seeded once, at construction.
#[derive(Clone, Debug)]
pub struct MoveSelector {
    rng: Option<StdRng>,
}

impl MoveSelector {
    pub fn new(selection: Selection) -> Self {
        let rng = match selection {
            Selection::Deterministic => None,
            Selection::Random { seed } => Some(StdRng::seed_from_u64(seed)),
        };
        Self { rng }
    }

    pub fn deterministic() -> Self {
        Self::new(Selection::Deterministic)
    }

    pub fn is_random(&self) -> bool {
        self.rng.is_some()
    }

    /// Take one element of `candidates`; the rest are dropped.
    pub fn select<T>(&mut self, mut candidates: Vec<T>, attempt: usize) -> Result<T, SearchError> {
        if candidates.is_empty() {
            return Err(SearchError::EmptyCandidateSet);
        }
        let idx = match self.rng.as_mut() {
            None => attempt % candidates.len(),
            Some(rng) => rng.gen_range(0..candidates.len()),
        };
        Ok(candidates.swap_remove(idx))
    }
}
