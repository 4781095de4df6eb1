//! Equation Challengers library - engine for a real-time multiplayer board game
//!
//! Players roll around a circular track, build properties on squares of
//! their own color, pay rent on rivals' squares and solve arithmetic
//! challenges for money from a shared bank. There is no game server: every
//! client runs the engine against one shared, reactive game document per
//! game and commits its changes optimistically.
//!
//! # Architecture
//!
//! - **Rules** (`challengers_rules`): data model, square resolver, equations, ranking
//! - **Store**: game and account documents with snapshot subscriptions
//! - **Engine**: lifecycle, turn processor, end-game evaluation, invitations
//! - **Completion**: best-effort LLM text for hints and game recaps
//! - **Session**: one signed-in client acting on its current game
//!
//! # Example
//!
//! ```no_run
//! use equation_challengers::{EngineConfig, GameEngine};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (engine, _store) = GameEngine::in_memory(EngineConfig::default());
//! engine.register_profile("ada", "Ada").await?;
//! engine.register_profile("bo", "Bo").await?;
//!
//! let game_id = engine.create_game("ada").await?;
//! engine.join_game("bo", &game_id).await?;
//! let _report = engine.roll_dice("ada", &game_id).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod commit;
mod completion;
mod config;
mod endgame;
mod engine;
mod error;
mod invitations;
mod lifecycle;
mod llm_client;
mod players;
mod random;
mod session;
mod simulate;
mod store;
mod turn;

// Crate-level exports - Game rules and data model
pub use challengers_rules::*;

// Crate-level exports - Store
pub use store::{
    GameEvent, GameStore, MemoryStore, Precondition, ProfileStore, Reward, StoreError,
    StoreErrorKind, Subscription, SubscriptionHandle, UserProfile, profiles_for,
};

// Crate-level exports - Optimistic commits
pub use commit::{Committed, Plan, commit};

// Crate-level exports - Engine
pub use endgame::{SUMMARY_FALLBACK, summary_prompt};
pub use engine::GameEngine;
pub use error::GameError;
pub use invitations::{InvitationResponse, prune_resolved};
pub use lifecycle::{JoinOutcome, LeaveOutcome};
pub use session::ClientSession;
pub use turn::{
    AnswerReport, AnswerResult, BuildReport, BuildResult, ExpiredDecision, HINT_FALLBACK,
    HintReport, RentTransfer, RollReport, TurnEnd, hint_prompt,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig};

// Crate-level exports - Text completion
pub use completion::{CannedCompletion, FallbackCompletion, OfflineCompletion, TextCompletion};
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Randomness
pub use random::{DIE_FACES, RandomSource, ScriptedRandom, SeededRandom};

// Crate-level exports - Players and simulation
pub use players::{Contestant, ScriptedBot};
pub use simulate::{SimulationReport, simulate};
