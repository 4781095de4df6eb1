//! Invitation records embedded in a game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameId, UserId};

/// Lifecycle of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Awaiting the recipient.
    Pending,
    /// Recipient joined.
    Accepted,
    /// Recipient said no.
    Declined,
}

/// An invitation from one player to another to join a waiting game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// Unique identifier.
    pub id: String,
    /// Inviting player.
    pub sender_id: UserId,
    /// Invited account.
    pub recipient_id: UserId,
    /// Game the recipient is invited to.
    pub game_id: GameId,
    /// Current status.
    pub status: InvitationStatus,
    /// When the invitation was sent.
    pub timestamp: DateTime<Utc>,
    /// Sender's display name, for the recipient's prompt.
    pub sender_display_name: String,
}

impl Invitation {
    /// Whether the invitation still awaits an answer.
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }
}
