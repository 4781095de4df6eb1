//! Atomic multi-field writes to a game document.
//!
//! A [`GameUpdate`] is the unit a store applies in one write call: either
//! every field lands or none does. Roster, board and invitation changes can
//! be keyed by identity so concurrent writers touching different players do
//! not rewrite each other's entries.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{Game, GameStatus, Invitation, PendingDecision, Player, Property, UserId};

/// One field write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FieldUpdate {
    /// Replace the whole roster.
    Players {
        /// New roster.
        players: Vec<Player>,
    },
    /// Replace the player with the same id, or append it.
    UpsertPlayer {
        /// Player record.
        player: Player,
    },
    /// Remove one player by id.
    RemovePlayer {
        /// Player to remove.
        user_id: UserId,
    },
    /// Hand the turn to a player.
    CurrentPlayer {
        /// New turn holder.
        user_id: UserId,
    },
    /// Change lifecycle status.
    Status {
        /// New status.
        status: GameStatus,
    },
    /// Set the completed-turn counter.
    TurnCount {
        /// New count.
        turn_count: u32,
    },
    /// Set the bank pool.
    BankMoney {
        /// New balance.
        bank_money: i64,
    },
    /// Record a property on one square.
    BoardSquare {
        /// Square index.
        square: usize,
        /// Property built there.
        property: Property,
    },
    /// Replace the invitation with the same id, or append it.
    UpsertInvitation {
        /// Invitation record.
        invitation: Invitation,
    },
    /// Replace every invitation.
    Invitations {
        /// New invitation log.
        invitations: Vec<Invitation>,
    },
    /// Set or clear the pending decision.
    Pending {
        /// New pending decision.
        pending: Option<PendingDecision>,
    },
    /// Record the final standings.
    Outcome {
        /// Co-winner ids.
        winners: Vec<UserId>,
        /// Announcement line.
        winner: String,
        /// Game recap.
        summary: String,
    },
}

impl FieldUpdate {
    fn apply(&self, game: &mut Game) {
        match self {
            Self::Players { players } => game.players = players.clone(),
            Self::UpsertPlayer { player } => {
                match game.players.iter_mut().find(|p| p.user_id == player.user_id) {
                    Some(slot) => *slot = player.clone(),
                    None => game.players.push(player.clone()),
                }
            }
            Self::RemovePlayer { user_id } => game.players.retain(|p| &p.user_id != user_id),
            Self::CurrentPlayer { user_id } => game.current_player_id = user_id.clone(),
            Self::Status { status } => game.status = *status,
            Self::TurnCount { turn_count } => game.turn_count = *turn_count,
            Self::BankMoney { bank_money } => game.bank_money = *bank_money,
            Self::BoardSquare { square, property } => {
                game.board_state.insert(*square, property.clone());
            }
            Self::UpsertInvitation { invitation } => {
                match game.invitations.iter_mut().find(|i| i.id == invitation.id) {
                    Some(slot) => *slot = invitation.clone(),
                    None => game.invitations.push(invitation.clone()),
                }
            }
            Self::Invitations { invitations } => game.invitations = invitations.clone(),
            Self::Pending { pending } => game.pending = pending.clone(),
            Self::Outcome {
                winners,
                winner,
                summary,
            } => {
                game.winners = winners.clone();
                game.winner = Some(winner.clone());
                game.final_summary = Some(summary.clone());
            }
        }
    }
}

/// An ordered batch of field writes committed together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameUpdate {
    fields: Vec<FieldUpdate>,
}

impl GameUpdate {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field write.
    pub fn with(mut self, field: FieldUpdate) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a field write in place.
    pub fn push(&mut self, field: FieldUpdate) {
        self.fields.push(field);
    }

    /// Appends every write of another batch.
    pub fn extend(&mut self, other: GameUpdate) {
        self.fields.extend(other.fields);
    }

    /// Whether the batch writes nothing.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field writes, in application order.
    pub fn fields(&self) -> &[FieldUpdate] {
        &self.fields
    }

    /// Applies every write to `game`, in order.
    #[instrument(skip(self, game), fields(game_id = %game.id, writes = self.fields.len()))]
    pub fn apply_to(&self, game: &mut Game) {
        for field in &self.fields {
            field.apply(game);
        }
        debug!("Update applied");
    }
}

impl Game {
    /// This game with `update` applied.
    pub fn applied(mut self, update: &GameUpdate) -> Self {
        update.apply_to(&mut self);
        self
    }
}
