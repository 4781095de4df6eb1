//! Contestants that answer the decisions a turn raises.

mod scripted;

pub use scripted::ScriptedBot;

use anyhow::Result;
use challengers_rules::{Equation, Game};

/// Something that can sit at the table and make a player's choices.
#[async_trait::async_trait]
pub trait Contestant: Send {
    /// Name shown to other players.
    fn name(&self) -> &str;

    /// Whether to buy the property on offer.
    async fn build(&mut self, game: &Game, cost: i64) -> Result<bool>;

    /// Raw answer text for an equation challenge.
    async fn answer(&mut self, game: &Game, equation: &Equation) -> Result<String>;

    /// Whether to take a hint after a wrong answer.
    async fn want_hint(&mut self, game: &Game, equation: &Equation) -> Result<bool>;
}
