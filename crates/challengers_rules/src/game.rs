//! The shared game document.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{BoardState, GameRules, Invitation, PendingDecision, Player, UserId};

/// Unique identifier of a game document.
pub type GameId = String;

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    /// Accepting players.
    #[display("waiting")]
    Waiting,
    /// Turns are being played.
    #[display("in-progress")]
    InProgress,
    /// Turn limit reached; winners are recorded.
    #[display("finished")]
    Finished,
}

/// The single unit of shared mutable state for one game.
///
/// Roster order is turn order. While the game is in progress
/// `current_player_id` references a roster member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Document id.
    pub id: GameId,
    /// Bumped by the store on every write.
    #[serde(default)]
    pub revision: u64,
    /// Seated players, in turn order.
    pub players: Vec<Player>,
    /// Player whose turn it is.
    pub current_player_id: UserId,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Properties built so far.
    #[serde(default)]
    pub board_state: BoardState,
    /// Completed turns.
    pub turn_count: u32,
    /// Bank pool; may go negative.
    pub bank_money: i64,
    /// Every invitation ever sent for this game.
    #[serde(default)]
    pub invitations: Vec<Invitation>,
    /// Decision the current player owes, if the turn is suspended.
    #[serde(default)]
    pub pending: Option<PendingDecision>,
    /// Co-winners, set once finished.
    #[serde(default)]
    pub winners: Vec<UserId>,
    /// Winner announcement, set once finished.
    #[serde(default)]
    pub winner: Option<String>,
    /// Recap of the game, set once finished.
    #[serde(default)]
    pub final_summary: Option<String>,
}

impl Game {
    /// A waiting game holding only its creator, who also holds the turn.
    #[instrument(skip(creator, rules), fields(creator = %creator.user_id))]
    pub fn new(id: GameId, creator: Player, rules: &GameRules) -> Self {
        debug!("Creating game document");
        Self {
            id,
            revision: 0,
            current_player_id: creator.user_id.clone(),
            players: vec![creator],
            status: GameStatus::Waiting,
            board_state: BoardState::new(),
            turn_count: 0,
            bank_money: *rules.starting_bank(),
            invitations: Vec::new(),
            pending: None,
            winners: Vec::new(),
            winner: None,
            final_summary: None,
        }
    }

    /// Looks a player up by id.
    pub fn player(&self, user_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    /// Roster index of a player.
    pub fn player_index(&self, user_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.user_id == user_id)
    }

    /// Whether the user is seated in this game.
    pub fn is_member(&self, user_id: &str) -> bool {
        self.player_index(user_id).is_some()
    }

    /// The player holding the turn.
    pub fn current_player(&self) -> Option<&Player> {
        self.player(&self.current_player_id)
    }

    /// Whether it is this user's turn in a running game.
    pub fn is_turn_of(&self, user_id: &str) -> bool {
        self.status == GameStatus::InProgress && self.current_player_id == user_id
    }

    /// Roster member following the current turn holder.
    ///
    /// Uses the turn holder's index at read time; if the holder is no longer
    /// seated the turn passes to the first player.
    pub fn next_player_id(&self) -> Option<UserId> {
        if self.players.is_empty() {
            return None;
        }
        let next = self
            .player_index(&self.current_player_id)
            .map_or(0, |index| (index + 1) % self.players.len());
        Some(self.players[next].user_id.clone())
    }

    /// Invitation by id.
    pub fn invitation(&self, invite_id: &str) -> Option<&Invitation> {
        self.invitations.iter().find(|i| i.id == invite_id)
    }
}
