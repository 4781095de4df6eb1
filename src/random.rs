//! Sources of dice rolls, equations and reward draws.

use std::collections::VecDeque;

use challengers_rules::Equation;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// Faces on the die.
pub const DIE_FACES: u32 = 6;

/// Everything random the engine draws.
pub trait RandomSource: Send + std::fmt::Debug {
    /// A die roll in `1..=6`.
    fn roll_die(&mut self) -> u32;

    /// A fresh equation.
    fn equation(&mut self) -> Equation;

    /// True with probability `p` (clamped to `0.0..=1.0`).
    fn chance(&mut self, p: f64) -> bool;

    /// An id for a pending decision.
    fn nonce(&mut self) -> u64;
}

/// `StdRng`-backed source; seeded for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible source.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        debug!("Seeding random source");
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SeededRandom {
    fn roll_die(&mut self) -> u32 {
        self.rng.gen_range(1..=DIE_FACES)
    }

    fn equation(&mut self) -> Equation {
        Equation::generate(&mut self.rng)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    fn nonce(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

/// Replays queued values, then falls back to a seeded source.
///
/// Rolls outside `1..=6` are clamped into range.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    rolls: VecDeque<u32>,
    equations: VecDeque<Equation>,
    chances: VecDeque<bool>,
    fallback: SeededRandom,
}

impl ScriptedRandom {
    /// Empty script over a seeded fallback.
    pub fn new(seed: u64) -> Self {
        Self {
            rolls: VecDeque::new(),
            equations: VecDeque::new(),
            chances: VecDeque::new(),
            fallback: SeededRandom::seeded(seed),
        }
    }

    /// Queues die rolls.
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Queues equations.
    pub fn with_equations(mut self, equations: impl IntoIterator<Item = Equation>) -> Self {
        self.equations.extend(equations);
        self
    }

    /// Queues reward draws.
    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn roll_die(&mut self) -> u32 {
        match self.rolls.pop_front() {
            Some(roll) => roll.clamp(1, DIE_FACES),
            None => self.fallback.roll_die(),
        }
    }

    fn equation(&mut self) -> Equation {
        match self.equations.pop_front() {
            Some(equation) => equation,
            None => self.fallback.equation(),
        }
    }

    fn chance(&mut self, p: f64) -> bool {
        match self.chances.pop_front() {
            Some(hit) => hit,
            None => self.fallback.chance(p),
        }
    }

    fn nonce(&mut self) -> u64 {
        self.fallback.nonce()
    }
}
