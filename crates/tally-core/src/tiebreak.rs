//! Tie-break oracle shared by the IR and OPL engines.
//!
//! Every tie in either algorithm is settled through a single primitive,
//! [`TieBreaker::choose_one`], which picks one index out of `n` tied entries.
//! Engines take the oracle as `&mut dyn TieBreaker`, so a run can be driven by
//! a seeded generator for reproducible audits or by a scripted sequence in
//! tests without touching the engine logic.

use std::collections::VecDeque;

use rand::Rng;

use crate::errors::{ErrorInfo, TallyError};
use crate::rng::RngHandle;

/// Randomized choice-of-N primitive.
pub trait TieBreaker {
    /// Returns an index in `0..n`.
    ///
    /// Fails with [`TallyError::InvalidArgument`] when `n == 0`.
    fn choose_one(&mut self, n: usize) -> Result<usize, TallyError>;
}

fn empty_population() -> TallyError {
    TallyError::InvalidArgument(
        ErrorInfo::new(
            "tie-empty-population",
            "a tie must be broken between at least one entry",
        )
        .with_context("n", 0),
    )
}

/// Uniform tie-breaker backed by a seeded [`RngHandle`].
#[derive(Debug, Clone)]
pub struct RandomTieBreaker {
    rng: RngHandle,
}

impl RandomTieBreaker {
    /// Creates a tie-breaker that replays the same draws for the same seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: RngHandle::from_seed(seed),
        }
    }

    /// Creates a tie-breaker seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: RngHandle::from_entropy(),
        }
    }

    /// Seed driving this tie-breaker, reported so the run can be replayed.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

impl TieBreaker for RandomTieBreaker {
    fn choose_one(&mut self, n: usize) -> Result<usize, TallyError> {
        if n == 0 {
            return Err(empty_population());
        }
        Ok(self.rng.gen_range(0..n))
    }
}

/// Deterministic tie-breaker replaying a fixed list of picks.
///
/// Once the script runs out every further call returns `0`. Each population
/// size requested is remembered so callers can assert when and how the oracle
/// was consulted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTieBreaker {
    picks: VecDeque<usize>,
    requests: Vec<usize>,
}

impl ScriptedTieBreaker {
    /// Creates a tie-breaker that answers with `picks` in order.
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
            requests: Vec::new(),
        }
    }

    /// Population sizes passed to [`TieBreaker::choose_one`] so far.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }
}

impl TieBreaker for ScriptedTieBreaker {
    fn choose_one(&mut self, n: usize) -> Result<usize, TallyError> {
        if n == 0 {
            return Err(empty_population());
        }
        self.requests.push(n);
        let pick = self.picks.pop_front().unwrap_or(0);
        if pick >= n {
            return Err(TallyError::InvalidArgument(
                ErrorInfo::new("tie-script-out-of-range", "scripted pick exceeds population")
                    .with_context("pick", pick)
                    .with_context("n", n),
            ));
        }
        Ok(pick)
    }
}
