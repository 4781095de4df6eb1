//! Players seated in a game.

use serde::{Deserialize, Serialize};

use crate::PlayerColor;

/// Unique identifier of an account.
pub type UserId = String;

/// A player seated in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Account identity.
    pub user_id: UserId,
    /// Name shown to other players.
    pub display_name: String,
    /// Palette color, unique within the game.
    pub color: PlayerColor,
    /// Cash on hand.
    pub money: i64,
    /// Number of properties built.
    pub property_count: u32,
    /// Square index on the track.
    pub position: usize,
}

impl Player {
    /// Seats a new player at square 0 with the given purse.
    pub fn new(
        user_id: impl Into<UserId>,
        display_name: impl Into<String>,
        color: PlayerColor,
        money: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            color,
            money,
            property_count: 0,
            position: 0,
        }
    }
}
