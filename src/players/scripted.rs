//! Bot with a fixed accuracy, for simulations and tests.

use anyhow::Result;
use challengers_rules::{Equation, Game};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::Contestant;

/// Answers correctly with probability `accuracy`; otherwise gives a wrong
/// number or, half the time, something that is not a number at all.
#[derive(Debug, Clone)]
pub struct ScriptedBot {
    name: String,
    accuracy: f64,
    rng: StdRng,
}

impl ScriptedBot {
    /// Creates a bot.
    pub fn new(name: impl Into<String>, accuracy: f64, seed: u64) -> Self {
        Self {
            name: name.into(),
            accuracy: accuracy.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

#[async_trait::async_trait]
impl Contestant for ScriptedBot {
    fn name(&self) -> &str {
        &self.name
    }

    async fn build(&mut self, game: &Game, cost: i64) -> Result<bool> {
        let money = game.current_player().map_or(0, |p| p.money);
        let build = money >= cost;
        debug!(bot = %self.name, money, cost, build, "Build decision");
        Ok(build)
    }

    async fn answer(&mut self, _game: &Game, equation: &Equation) -> Result<String> {
        let answer = if self.rng.gen_bool(self.accuracy) {
            equation.answer().to_string()
        } else if self.rng.gen_bool(0.5) {
            (equation.answer() + self.rng.gen_range(1..=3)).to_string()
        } else {
            "no idea".to_string()
        };
        debug!(bot = %self.name, equation = %equation, %answer, "Answering");
        Ok(answer)
    }

    async fn want_hint(&mut self, _game: &Game, _equation: &Equation) -> Result<bool> {
        Ok(self.rng.gen_bool(0.5))
    }
}
