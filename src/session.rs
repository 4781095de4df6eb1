//! A signed-in client: engine operations scoped to one user and the game
//! their account currently points at.

use challengers_rules::{GameId, GameStatus, Invitation, UserId};
use tracing::{debug, info, instrument, warn};

use crate::engine::GameEngine;
use crate::error::GameError;
use crate::invitations::InvitationResponse;
use crate::lifecycle::{JoinOutcome, LeaveOutcome};
use crate::store::{GameEvent, SubscriptionHandle};
use crate::turn::{AnswerReport, BuildReport, HintReport, RollReport};

/// Operations on behalf of one account.
#[derive(Debug, Clone)]
pub struct ClientSession {
    engine: GameEngine,
    user_id: UserId,
}

impl ClientSession {
    /// Session for an existing account.
    #[instrument(skip(engine))]
    pub async fn sign_in(engine: GameEngine, user_id: &str) -> Result<Self, GameError> {
        engine.acting_profile(user_id).await?;
        info!("Signed in");
        Ok(Self {
            engine,
            user_id: user_id.to_string(),
        })
    }

    /// The acting account.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The engine this session acts through.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Game the account points at, if any.
    pub async fn current_room(&self) -> Result<Option<GameId>, GameError> {
        Ok(self
            .engine
            .acting_profile(&self.user_id)
            .await?
            .current_room_id)
    }

    async fn room(&self) -> Result<GameId, GameError> {
        self.current_room()
            .await?
            .ok_or_else(|| GameError::NotInRoom(self.user_id.clone()))
    }

    /// Creates a game and sits in it.
    pub async fn create_game(&self) -> Result<GameId, GameError> {
        self.engine.create_game(&self.user_id).await
    }

    /// Joins a waiting game.
    pub async fn join_game(&self, game_id: &str) -> Result<JoinOutcome, GameError> {
        self.engine.join_game(&self.user_id, game_id).await
    }

    /// Leaves the current game.
    pub async fn leave_game(&self) -> Result<LeaveOutcome, GameError> {
        let room = self.room().await?;
        self.engine.leave_game(&self.user_id, &room).await
    }

    /// Rolls in the current game.
    pub async fn roll_dice(&self) -> Result<Option<RollReport>, GameError> {
        let room = self.room().await?;
        self.engine.roll_dice(&self.user_id, &room).await
    }

    /// Answers a build offer in the current game.
    pub async fn submit_build_decision(&self, accept: bool) -> Result<Option<BuildReport>, GameError> {
        let room = self.room().await?;
        self.engine
            .submit_build_decision(&self.user_id, &room, accept)
            .await
    }

    /// Answers the pending equation in the current game.
    pub async fn submit_equation_answer(
        &self,
        answer: &str,
    ) -> Result<Option<AnswerReport>, GameError> {
        let room = self.room().await?;
        self.engine
            .submit_equation_answer(&self.user_id, &room, answer)
            .await
    }

    /// Answers the hint offer in the current game.
    pub async fn respond_hint(&self, accept: bool) -> Result<Option<HintReport>, GameError> {
        let room = self.room().await?;
        self.engine.respond_hint(&self.user_id, &room, accept).await
    }

    /// Invites another account to the current game.
    pub async fn invite_player(&self, recipient_id: &str) -> Result<Invitation, GameError> {
        self.engine.invite_player(&self.user_id, recipient_id).await
    }

    /// Invitations waiting for this account.
    pub async fn pending_invitations(&self) -> Result<Vec<Invitation>, GameError> {
        self.engine.pending_invitations(&self.user_id).await
    }

    /// Accepts or declines an invitation.
    pub async fn respond_invitation(
        &self,
        invite_id: &str,
        accept: bool,
    ) -> Result<InvitationResponse, GameError> {
        self.engine
            .respond_invitation(&self.user_id, invite_id, accept)
            .await
    }

    /// Brings local bookkeeping in line with an observed snapshot.
    ///
    /// Starts a waiting game that has enough players and repoints the
    /// back-reference at a running game the roster says we sit in. The
    /// pointer is dropped once the game is deleted, finished or no longer
    /// seats us.
    #[instrument(skip(self, event), fields(user_id = %self.user_id))]
    pub async fn reconcile(&self, event: &GameEvent) -> Result<(), GameError> {
        let current = self.current_room().await?;
        match event {
            GameEvent::Snapshot(game) => {
                let seated = game.is_member(&self.user_id);
                let points_here = current.as_deref() == Some(game.id.as_str());
                if game.status == GameStatus::Waiting && game.players.len() >= 2 {
                    self.engine.start_if_ready(&game.id).await?;
                }
                let finished = game.status == GameStatus::Finished;
                if seated && !points_here && !finished {
                    debug!(game_id = %game.id, "Repointing back-reference");
                    self.engine.point_room(&self.user_id, Some(&game.id)).await?;
                } else if points_here && (!seated || finished) {
                    debug!(game_id = %game.id, "Clearing back-reference");
                    self.engine.point_room(&self.user_id, None).await?;
                }
            }
            GameEvent::Deleted(game_id) => {
                if current.as_deref() == Some(game_id.as_str()) {
                    debug!(%game_id, "Game deleted, clearing back-reference");
                    self.engine.point_room(&self.user_id, None).await?;
                }
            }
        }
        Ok(())
    }

    /// Follows the current game, reconciling on every snapshot until the
    /// handle is dropped.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn watch(&self) -> Result<SubscriptionHandle, GameError> {
        let room = self.room().await?;
        let mut subscription = self.engine.games().subscribe(&room).await?;
        let session = self.clone();
        let task = tokio::spawn(async move {
            while let Some(delivery) = subscription.next().await {
                let event = match delivery {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "Snapshot delivery failed");
                        continue;
                    }
                };
                if let Err(e) = session.reconcile(&event).await {
                    warn!(error = %e, "Reconcile failed");
                }
                if matches!(event, GameEvent::Deleted(_)) {
                    break;
                }
            }
        });
        Ok(SubscriptionHandle::new(task))
    }
}
