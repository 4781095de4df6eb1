//! Optimistic read-plan-write against a game document.
//!
//! Every engine mutation goes through [`commit`]: read the game, plan a
//! batch of writes from what was read, and write it conditionally on the
//! revision that was read. A conflict means another client wrote in
//! between; the game is re-read and the plan re-run against the fresh
//! state.

use challengers_rules::{Game, GameUpdate};
use tracing::{debug, instrument, warn};

use crate::error::GameError;
use crate::store::{GameStore, Precondition};

/// What to do with the game as read.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Nothing to write.
    Skip,
    /// Write this batch.
    Write(GameUpdate),
    /// Remove the document.
    Delete,
}

/// How a commit ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    /// The game does not exist (or vanished mid-commit).
    Missing,
    /// The plan chose not to write.
    Skipped(Game),
    /// The batch landed.
    Written {
        /// State the plan was computed from.
        before: Game,
        /// State after the write, with the new revision.
        after: Game,
    },
    /// The document was removed; holds the last state read.
    Deleted(Game),
}

impl Committed {
    /// The stored state after the commit, if the game still exists.
    pub fn current(&self) -> Option<&Game> {
        match self {
            Self::Skipped(game) => Some(game),
            Self::Written { after, .. } => Some(after),
            Self::Missing | Self::Deleted(_) => None,
        }
    }
}

/// Runs `plan` against the stored game and commits its result conditionally
/// on the revision read, retrying on conflict up to `attempts` times.
///
/// `plan` may run more than once and must derive everything from the game it
/// is handed. Returning an error aborts without writing.
#[instrument(skip(store, plan))]
pub async fn commit<F>(
    store: &dyn GameStore,
    game_id: &str,
    attempts: u32,
    mut plan: F,
) -> Result<Committed, GameError>
where
    F: FnMut(&Game) -> Result<Plan, GameError>,
{
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        let Some(game) = store.get(game_id).await? else {
            debug!("Game missing");
            return Ok(Committed::Missing);
        };
        let precondition = Precondition::Revision(game.revision);
        let outcome = match plan(&game)? {
            Plan::Skip => return Ok(Committed::Skipped(game)),
            Plan::Write(update) if update.is_empty() => return Ok(Committed::Skipped(game)),
            Plan::Write(update) => store
                .update(game_id, update, precondition)
                .await
                .map(|after| Committed::Written {
                    before: game,
                    after,
                }),
            Plan::Delete => store
                .delete(game_id, precondition)
                .await
                .map(|()| Committed::Deleted(game)),
        };
        match outcome {
            Ok(committed) => {
                debug!(attempt, "Commit landed");
                return Ok(committed);
            }
            Err(e) if e.is_conflict() => {
                warn!(attempt, attempts, "Write lost a race, re-reading");
            }
            Err(e) if e.is_missing() => return Ok(Committed::Missing),
            Err(e) => return Err(e.into()),
        }
    }
    warn!(attempts, "Giving up on contended game");
    Err(GameError::Contended(game_id.to_string(), attempts))
}
