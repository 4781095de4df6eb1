//! Classifies what happens when a player lands on a square.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{BoardLayout, BoardState, Player, UserId};

/// Why a square turned out to be safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SafeReason {
    /// The mover already built on this own-color square.
    OwnProperty,
    /// No other seated player owns this color.
    Unclaimed,
}

/// Outcome of landing on a square, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SquareOutcome {
    /// Own color, nothing built: the mover may buy a property.
    BuildOffer {
        /// Landing square.
        square: usize,
    },
    /// Nothing happens.
    SafeZone {
        /// Landing square.
        square: usize,
        /// Why nothing happens.
        reason: SafeReason,
    },
    /// Another player's built square: pay rent, then face a challenge.
    Rent {
        /// Landing square.
        square: usize,
        /// Property owner, who also sets the challenge.
        #[serde(rename = "ownerId")]
        owner_id: UserId,
        /// Nominal rent.
        amount: i64,
    },
    /// Another player's unbuilt color: face a challenge.
    EquationChallenge {
        /// Landing square.
        square: usize,
        /// Color owner, the nominal setter.
        #[serde(rename = "setterId")]
        setter_id: UserId,
    },
}

impl SquareOutcome {
    /// Whether the outcome needs an answer from the mover.
    pub fn needs_decision(&self) -> bool {
        !matches!(self, Self::SafeZone { .. })
    }

    /// Landing square.
    pub fn square(&self) -> usize {
        match self {
            Self::BuildOffer { square }
            | Self::SafeZone { square, .. }
            | Self::Rent { square, .. }
            | Self::EquationChallenge { square, .. } => *square,
        }
    }
}

/// Resolves the square at `position` for `mover`.
///
/// The square's color comes from `layout`. The mover's own color offers a
/// build (or is safe once built). Another seated player's color charges rent
/// when that player built there, otherwise triggers a challenge. Anything
/// else is safe.
#[instrument(skip(layout, players, board), fields(mover = %mover.user_id))]
pub fn resolve_square(
    layout: &BoardLayout,
    mover: &Player,
    position: usize,
    players: &[Player],
    board: &BoardState,
) -> SquareOutcome {
    let square_color = layout.color_at(position);
    let own_color = mover.color == square_color;
    let color_owner = players
        .iter()
        .find(|p| p.color == square_color && p.user_id != mover.user_id);
    let property = board.get(&position);

    let outcome = match (own_color, color_owner, property) {
        (true, _, None) => SquareOutcome::BuildOffer { square: position },
        (true, _, Some(_)) => SquareOutcome::SafeZone {
            square: position,
            reason: SafeReason::OwnProperty,
        },
        (false, Some(owner), Some(property)) if property.owner_id == owner.user_id => {
            SquareOutcome::Rent {
                square: position,
                owner_id: owner.user_id.clone(),
                amount: property.rent,
            }
        }
        (false, Some(owner), None) => SquareOutcome::EquationChallenge {
            square: position,
            setter_id: owner.user_id.clone(),
        },
        _ => SquareOutcome::SafeZone {
            square: position,
            reason: SafeReason::Unclaimed,
        },
    };

    debug!(position, color = %square_color, ?outcome, "Square resolved");
    outcome
}
