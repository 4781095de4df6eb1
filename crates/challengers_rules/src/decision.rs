//! Turns suspended on a human decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Equation, UserId};

/// What the current player must decide before the turn can end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DecisionKind {
    /// Build a property on an own-color square.
    Build {
        /// Price of the property.
        cost: i64,
    },
    /// Answer an equation set (nominally) by the color owner.
    Challenge {
        /// Owner of the square's color; cosmetic only.
        #[serde(rename = "setterId")]
        setter_id: UserId,
        /// The equation to solve.
        equation: Equation,
    },
    /// Accept or decline a hint after an incorrect answer.
    Hint {
        /// The equation that was missed.
        equation: Equation,
    },
}

/// A decision the current player owes before the turn ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDecision {
    /// Nonce identifying this decision instance.
    pub id: u64,
    /// Player who must decide.
    pub player_id: UserId,
    /// Square the player landed on.
    pub square: usize,
    /// What is being decided.
    pub kind: DecisionKind,
    /// When the decision auto-resolves, if deadlines are enabled.
    pub deadline: Option<DateTime<Utc>>,
}

impl PendingDecision {
    /// Whether the deadline has passed at `now`. Never true without a deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}
