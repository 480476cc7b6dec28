//! Randomness used by bulk collapse.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Draws independent fair booleans.
pub trait CoinFlip {
    fn flip(&mut self) -> bool;
}

/// Uniform coin backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct RandomCoin {
    rng: StdRng,
}

impl RandomCoin {
    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is set, OS entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_os_rng)
    }
}

impl CoinFlip for RandomCoin {
    fn flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}

/// Replays a fixed sequence, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedCoin {
    script: VecDeque<bool>,
}

impl ScriptedCoin {
    /// An empty script always lands `false`.
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl CoinFlip for ScriptedCoin {
    fn flip(&mut self) -> bool {
        match self.script.pop_front() {
            Some(outcome) => {
                self.script.push_back(outcome);
                outcome
            }
            None => false,
        }
    }
}

impl<C: CoinFlip + ?Sized> CoinFlip for Box<C> {
    fn flip(&mut self) -> bool {
        (**self).flip()
    }
}
