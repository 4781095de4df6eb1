//! Errors surfaced to the acting user.

use challengers_rules::{GameId, UserId};
use derive_more::Display;

use crate::store::StoreError;

/// Why an engine operation was rejected.
///
/// Precondition failures abort the operation before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameError {
    /// No such game.
    #[display("Game {} not found", _0)]
    NotFound(GameId),

    /// Every palette color is taken.
    #[display("Game {} is full ({} players)", _0, _1)]
    Full(GameId, usize),

    /// The game has already started or finished.
    #[display("Game {} is already in progress", _0)]
    AlreadyInProgress(GameId),

    /// Someone else holds the turn.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(UserId),

    /// The turn is suspended on a decision that must be answered first.
    #[display("{} must resolve the pending decision first", _0)]
    DecisionPending(UserId),

    /// The caller owes no decision of this kind.
    #[display("{} has no matching pending decision", _0)]
    NoPendingDecision(UserId),

    /// The acting account does not exist.
    #[display("Unknown user {}", _0)]
    UnknownUser(UserId),

    /// The invited account does not exist.
    #[display("Recipient {} not found", _0)]
    RecipientNotFound(UserId),

    /// A player tried to invite themself.
    #[display("Cannot invite yourself")]
    SelfInvite,

    /// A pending invitation to this recipient already exists.
    #[display("{} already has a pending invitation to this game", _0)]
    DuplicateInvite(UserId),

    /// No pending invitation with this id is addressed to the caller.
    #[display("Invitation {} not found", _0)]
    InvitationNotFound(String),

    /// The caller is not sitting in any game.
    #[display("{} is not in a game", _0)]
    NotInRoom(UserId),

    /// Every conditional write attempt lost a race.
    #[display("Game {} stayed contended after {} attempts", _0, _1)]
    Contended(GameId, u32),

    /// The store failed.
    #[display("{}", _0)]
    Store(StoreError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for GameError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
