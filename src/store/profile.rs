//! Account records the engine reads and writes.

use std::collections::BTreeSet;

use challengers_rules::{GameId, UserId};
use serde::{Deserialize, Serialize};

/// An achievement stored on an account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
pub enum Reward {
    /// Solved an equation (granted by chance).
    #[display("Equation Solver")]
    EquationSolver,
    /// Won or shared a win.
    #[display("Game Champion")]
    GameChampion,
}

/// The slice of an account the engine cares about.
///
/// `current_room_id` is a cached back-reference to the game the account
/// sits in. The game roster is authoritative; the engine keeps this pointer
/// in step with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account id.
    pub id: UserId,
    /// Name shown in games.
    pub display_name: String,
    /// Game the account currently sits in.
    #[serde(default)]
    pub current_room_id: Option<GameId>,
    /// Rewards earned so far.
    #[serde(default)]
    pub rewards: BTreeSet<Reward>,
}

impl UserProfile {
    /// A fresh profile outside any game.
    pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            current_room_id: None,
            rewards: BTreeSet::new(),
        }
    }
}
