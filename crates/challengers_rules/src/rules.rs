//! Tunable game constants.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use crate::PALETTE_SIZE;

/// Numeric rules of a game.
///
/// Defaults reproduce the classic table: a 20-square board, $5000 starting
/// purse, $100000 bank, $1000 properties renting for $300, $500 per solved
/// equation and a 25-turn limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default, rename_all = "snake_case")]
pub struct GameRules {
    /// Number of squares on the circular track.
    board_size: usize,
    /// Money each player starts with.
    starting_money: i64,
    /// Money in the bank pool when a game is created.
    starting_bank: i64,
    /// Paid from the bank for a correct answer.
    bank_payout: i64,
    /// Price of building a property.
    property_cost: i64,
    /// Rent written onto a freshly built property.
    rent: i64,
    /// Game ends once this many turns have been played.
    turn_limit: u32,
    /// Probability of granting the Equation Solver reward after a correct answer.
    solver_reward_chance: f64,
}

impl GameRules {
    /// Largest roster a game accepts.
    pub fn max_players(&self) -> usize {
        PALETTE_SIZE
    }

    /// Overrides the board size.
    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size.max(1);
        self
    }

    /// Overrides the turn limit.
    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    /// Overrides the starting money.
    pub fn with_starting_money(mut self, starting_money: i64) -> Self {
        self.starting_money = starting_money;
        self
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            board_size: 20,
            starting_money: 5000,
            starting_bank: 100_000,
            bank_payout: 500,
            property_cost: 1000,
            rent: 300,
            turn_limit: 25,
            solver_reward_chance: 0.5,
        }
    }
}
