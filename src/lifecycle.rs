//! Creating, joining, leaving and starting games.

use challengers_rules::{
    FieldUpdate, Game, GameId, GameStatus, GameUpdate, Player, PlayerColor,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::commit::{Committed, Plan};
use crate::engine::GameEngine;
use crate::error::GameError;

/// Result of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Seated with this color.
    Joined {
        /// Assigned palette color.
        color: PlayerColor,
    },
    /// The caller was already seated; nothing changed.
    AlreadyJoined,
}

/// Result of leaving a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Removed from the roster; others remain.
    Left {
        /// Turn holder after the removal.
        current_player_id: String,
        /// Players still seated.
        remaining: usize,
    },
    /// The caller was the last player and the game was deleted.
    Deleted,
    /// The caller was not seated (or the game is gone).
    NotMember,
}

impl GameEngine {
    /// Creates a waiting game seating only `user_id`.
    #[instrument(skip(self))]
    pub async fn create_game(&self, user_id: &str) -> Result<GameId, GameError> {
        let profile = self.acting_profile(user_id).await?;
        let color = PlayerColor::Red;
        let creator = Player::new(
            user_id,
            profile.display_name,
            color,
            *self.rules().starting_money(),
        );
        let game_id = Uuid::new_v4().to_string();
        let game = self
            .games()
            .create(Game::new(game_id.clone(), creator, self.rules()))
            .await?;
        self.point_room(&profile.id, Some(&game.id)).await?;
        info!(game_id = %game.id, "Game created");
        Ok(game.id)
    }

    /// Seats `user_id` in a waiting game with the first free color.
    ///
    /// Status and capacity are checked before membership, so a seated
    /// player re-joining a running or full game is rejected like anyone
    /// else. Otherwise joining a game the caller already sits in reports
    /// [`JoinOutcome::AlreadyJoined`] and changes nothing but the caller's
    /// back-reference.
    #[instrument(skip(self))]
    pub async fn join_game(&self, user_id: &str, game_id: &str) -> Result<JoinOutcome, GameError> {
        let profile = self.acting_profile(user_id).await?;
        let max_players = self.rules().max_players();
        let starting_money = *self.rules().starting_money();

        let mut outcome = JoinOutcome::AlreadyJoined;
        let committed = self
            .commit(game_id, |game| {
                if game.status != GameStatus::Waiting {
                    return Err(GameError::AlreadyInProgress(game.id.clone()));
                }
                if game.players.len() >= max_players {
                    return Err(GameError::Full(game.id.clone(), game.players.len()));
                }
                if game.is_member(user_id) {
                    outcome = JoinOutcome::AlreadyJoined;
                    return Ok(Plan::Skip);
                }
                let color = PlayerColor::first_unused(game.players.iter().map(|p| &p.color))
                    .ok_or_else(|| GameError::Full(game.id.clone(), game.players.len()))?;
                outcome = JoinOutcome::Joined { color };
                let player = Player::new(
                    user_id,
                    profile.display_name.clone(),
                    color,
                    starting_money,
                );
                Ok(Plan::Write(
                    GameUpdate::new().with(FieldUpdate::UpsertPlayer { player }),
                ))
            })
            .await
            .inspect_err(|e| warn!(error = %e, "Join rejected"))?;

        if matches!(committed, Committed::Missing) {
            warn!("Join rejected: game not found");
            return Err(GameError::NotFound(game_id.to_string()));
        }
        self.point_room(&profile.id, Some(game_id)).await?;
        match outcome {
            JoinOutcome::Joined { color } => info!(%color, "Player joined"),
            JoinOutcome::AlreadyJoined => info!("Player already in game"),
        }
        self.start_if_ready(game_id).await?;
        Ok(outcome)
    }

    /// Removes `user_id` from a game; deletes the game when nobody is left.
    ///
    /// If the leaver held the turn, it passes to the player at the leaver's
    /// next index in the pre-removal roster, looked up in the shrunken roster,
    /// or to the first remaining player when that index is past the end. A
    /// decision the leaver owed is dropped. The caller's back-reference is
    /// always cleared.
    #[instrument(skip(self))]
    pub async fn leave_game(&self, user_id: &str, game_id: &str) -> Result<LeaveOutcome, GameError> {
        let mut outcome = LeaveOutcome::NotMember;
        let committed = self
            .commit(game_id, |game| {
                let Some(index) = game.player_index(user_id) else {
                    outcome = LeaveOutcome::NotMember;
                    return Ok(Plan::Skip);
                };
                if game.players.len() == 1 {
                    outcome = LeaveOutcome::Deleted;
                    return Ok(Plan::Delete);
                }
                let (update, current_player_id) = leave_update(game, user_id, index);
                outcome = LeaveOutcome::Left {
                    current_player_id,
                    remaining: game.players.len() - 1,
                };
                Ok(Plan::Write(update))
            })
            .await?;

        if matches!(committed, Committed::Missing) {
            debug!("Game already gone");
            outcome = LeaveOutcome::NotMember;
        }
        self.point_room(user_id, None).await?;
        info!(?outcome, "Player left");
        Ok(outcome)
    }

    /// Starts a waiting game once at least two players are seated.
    ///
    /// Safe to call on every observation: anything other than a waiting game
    /// with a full enough roster is left alone. Returns whether this call
    /// started the game.
    #[instrument(skip(self))]
    pub async fn start_if_ready(&self, game_id: &str) -> Result<bool, GameError> {
        let committed = self
            .commit(game_id, |game| {
                if game.status != GameStatus::Waiting || game.players.len() < 2 {
                    return Ok(Plan::Skip);
                }
                let mut update = GameUpdate::new().with(FieldUpdate::Status {
                    status: GameStatus::InProgress,
                });
                if game.current_player().is_none() {
                    update.push(FieldUpdate::CurrentPlayer {
                        user_id: game.players[0].user_id.clone(),
                    });
                }
                Ok(Plan::Write(update))
            })
            .await?;
        let started = matches!(committed, Committed::Written { .. });
        if started {
            info!("Game started");
        }
        Ok(started)
    }
}

/// Roster removal plus turn reassignment for a leaving player.
fn leave_update(game: &Game, user_id: &str, index: usize) -> (GameUpdate, String) {
    let mut update = GameUpdate::new().with(FieldUpdate::RemovePlayer {
        user_id: user_id.to_string(),
    });
    let mut current = game.current_player_id.clone();
    if current == user_id {
        let remaining: Vec<&Player> = game.players.iter().filter(|p| p.user_id != user_id).collect();
        let next_index = (index + 1) % game.players.len();
        if let Some(next) = remaining.get(next_index).or_else(|| remaining.first()) {
            current = next.user_id.clone();
            update.push(FieldUpdate::CurrentPlayer {
                user_id: current.clone(),
            });
        }
    }
    if game
        .pending
        .as_ref()
        .is_some_and(|pending| pending.player_id == user_id)
    {
        update.push(FieldUpdate::Pending { pending: None });
    }
    (update, current)
}
