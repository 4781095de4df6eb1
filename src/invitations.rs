//! Invitations recorded inside waiting games.

use challengers_rules::{
    FieldUpdate, Game, GameId, GameStatus, GameUpdate, Invitation, InvitationStatus,
};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::commit::{Committed, Plan};
use crate::engine::GameEngine;
use crate::error::GameError;
use crate::lifecycle::JoinOutcome;

/// How the recipient answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationResponse {
    /// Joined the game and marked the invitation accepted.
    Accepted {
        /// Game joined.
        game_id: GameId,
        /// Join result.
        join: JoinOutcome,
    },
    /// Marked the invitation declined.
    Declined {
        /// Game declined.
        game_id: GameId,
    },
}

/// Drops the oldest resolved invitations beyond `keep`; pending ones stay.
pub fn prune_resolved(invitations: &[Invitation], keep: usize) -> Vec<Invitation> {
    let resolved = invitations.iter().filter(|i| !i.is_pending()).count();
    let mut to_drop = resolved.saturating_sub(keep);
    invitations
        .iter()
        .filter(|i| {
            if to_drop > 0 && !i.is_pending() {
                to_drop -= 1;
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}

impl GameEngine {
    /// Writes one invitation, pruning resolved ones when retention is set.
    fn invitation_update(&self, game: &Game, invitation: Invitation) -> GameUpdate {
        let upsert = FieldUpdate::UpsertInvitation { invitation };
        let Some(keep) = *self.config().invitation_retention() else {
            return GameUpdate::new().with(upsert);
        };
        let mut log = game.clone();
        GameUpdate::new().with(upsert).apply_to(&mut log);
        let invitations = prune_resolved(&log.invitations, keep);
        if invitations.len() < log.invitations.len() {
            debug!(
                pruned = log.invitations.len() - invitations.len(),
                "Pruning resolved invitations"
            );
        }
        GameUpdate::new().with(FieldUpdate::Invitations { invitations })
    }

    /// Invites `recipient_id` to the game `sender_id` currently sits in.
    #[instrument(skip(self))]
    pub async fn invite_player(
        &self,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<Invitation, GameError> {
        let sender = self.acting_profile(sender_id).await?;
        let game_id = sender
            .current_room_id
            .clone()
            .ok_or_else(|| GameError::NotInRoom(sender_id.to_string()))?;
        if self.profiles().profile(recipient_id).await?.is_none() {
            warn!("Invite rejected: recipient not found");
            return Err(GameError::RecipientNotFound(recipient_id.to_string()));
        }
        if recipient_id == sender_id {
            warn!("Invite rejected: self invite");
            return Err(GameError::SelfInvite);
        }

        let invitation = Invitation {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            game_id: game_id.clone(),
            status: InvitationStatus::Pending,
            timestamp: Utc::now(),
            sender_display_name: sender.display_name.clone(),
        };
        let max_players = self.rules().max_players();
        let committed = self
            .commit(&game_id, |game| {
                if game.status != GameStatus::Waiting {
                    return Err(GameError::AlreadyInProgress(game.id.clone()));
                }
                if game.players.len() >= max_players {
                    return Err(GameError::Full(game.id.clone(), game.players.len()));
                }
                let duplicate = game.invitations.iter().any(|i| {
                    i.is_pending() && i.sender_id == sender_id && i.recipient_id == recipient_id
                });
                if duplicate {
                    return Err(GameError::DuplicateInvite(recipient_id.to_string()));
                }
                Ok(Plan::Write(self.invitation_update(game, invitation.clone())))
            })
            .await
            .inspect_err(|e| warn!(error = %e, "Invite rejected"))?;

        if matches!(committed, Committed::Missing) {
            return Err(GameError::NotFound(game_id));
        }
        info!(invite_id = %invitation.id, %game_id, "Invitation sent");
        Ok(invitation)
    }

    /// Pending invitations addressed to `recipient_id` across all waiting games.
    #[instrument(skip(self))]
    pub async fn pending_invitations(&self, recipient_id: &str) -> Result<Vec<Invitation>, GameError> {
        let invitations: Vec<Invitation> = self
            .games()
            .list_waiting()
            .await?
            .into_iter()
            .flat_map(|game| game.invitations)
            .filter(|i| i.is_pending() && i.recipient_id == recipient_id)
            .collect();
        debug!(count = invitations.len(), "Pending invitations");
        Ok(invitations)
    }

    /// Accepts or declines a pending invitation.
    ///
    /// Accepting joins the game first; if the join is rejected the invitation
    /// stays pending and the join error is returned.
    #[instrument(skip(self))]
    pub async fn respond_invitation(
        &self,
        recipient_id: &str,
        invite_id: &str,
        accept: bool,
    ) -> Result<InvitationResponse, GameError> {
        let invitation = self
            .pending_invitations(recipient_id)
            .await?
            .into_iter()
            .find(|i| i.id == invite_id)
            .ok_or_else(|| GameError::InvitationNotFound(invite_id.to_string()))?;
        let game_id = invitation.game_id.clone();

        let (status, response) = if accept {
            let join = self.join_game(recipient_id, &game_id).await?;
            (
                InvitationStatus::Accepted,
                InvitationResponse::Accepted {
                    game_id: game_id.clone(),
                    join,
                },
            )
        } else {
            (
                InvitationStatus::Declined,
                InvitationResponse::Declined {
                    game_id: game_id.clone(),
                },
            )
        };

        self.commit(&game_id, |game| {
            let Some(current) = game.invitation(invite_id).filter(|i| i.is_pending()) else {
                return Ok(Plan::Skip);
            };
            let mut resolved = current.clone();
            resolved.status = status;
            Ok(Plan::Write(self.invitation_update(game, resolved)))
        })
        .await?;
        info!(?status, "Invitation answered");
        Ok(response)
    }
}
