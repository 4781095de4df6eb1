//! Challengers Rules - pure game logic for Equation Challengers
//!
//! Everything here is synchronous and free of I/O: the palette and board
//! layout, the shared game document and its atomic update batches, the
//! equation generator, the square resolver and end-of-game ranking.
//!
//! # Example
//!
//! ```
//! use challengers_rules::{BoardLayout, BoardState, Player, PlayerColor, SquareOutcome, resolve_square};
//!
//! let layout = BoardLayout::uniform(20);
//! let mover = Player::new("p1", "Ada", PlayerColor::Red, 5000);
//! let other = Player::new("p2", "Bo", PlayerColor::Blue, 5000);
//! let players = vec![mover.clone(), other];
//!
//! // 7 mod 5 = 2 is blue, owned by p2 with nothing built.
//! let outcome = resolve_square(&layout, &mover, 7, &players, &BoardState::new());
//! assert!(matches!(outcome, SquareOutcome::EquationChallenge { .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod decision;
mod equation;
mod game;
mod invitation;
mod palette;
mod player;
mod ranking;
mod resolver;
mod rules;
mod update;

pub use board::{BoardLayout, BoardState, LayoutError, Property};
pub use decision::{DecisionKind, PendingDecision};
pub use equation::{AnswerVerdict, Equation, MAX_OPERAND, MIN_OPERAND, Operator};
pub use game::{Game, GameId, GameStatus};
pub use invitation::{Invitation, InvitationStatus};
pub use palette::{PALETTE_SIZE, PlayerColor};
pub use player::{Player, UserId};
pub use ranking::{co_winners, winner_message};
pub use resolver::{SafeReason, SquareOutcome, resolve_square};
pub use rules::GameRules;
pub use update::{FieldUpdate, GameUpdate};
