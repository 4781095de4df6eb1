//! End-of-game evaluation: ranking, the recap, back-reference cleanup and
//! champion rewards.

use challengers_rules::{FieldUpdate, Game, GameStatus, GameUpdate, co_winners, winner_message};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::engine::GameEngine;
use crate::store::Reward;
use crate::turn::TurnEnd;

/// Recap used when the completion service cannot produce one.
pub const SUMMARY_FALLBACK: &str = "Failed to generate game summary.";

/// Prompt asking for a short recap of a finished game.
pub fn summary_prompt(game: &Game, winner: &str) -> String {
    let roster = game
        .players
        .iter()
        .map(|p| {
            format!(
                "{} (Money: ${}, Properties: {})",
                p.display_name, p.money, p.property_count
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Generate a short (1-2 paragraphs) and fun game summary for a math board game called \"Equation Challengers\". The players were: {}. The winner is: {}. Highlight any interesting moments based on the stats or general game theme.",
        roster, winner
    )
}

impl GameEngine {
    /// Whether ending the current turn of `game` reaches the turn limit.
    pub(crate) fn reaches_limit(&self, game: &Game) -> bool {
        game.turn_count + 1 >= *self.rules().turn_limit()
    }

    /// Writes that end the turn of `after` (the game with the turn's own
    /// effects applied): clear the decision, count the turn and either pass
    /// the turn on or finish the game.
    pub(crate) fn turn_end(&self, after: &Game, summary: Option<&str>) -> (GameUpdate, TurnEnd) {
        let turn_count = after.turn_count + 1;
        let mut update = GameUpdate::new()
            .with(FieldUpdate::Pending { pending: None })
            .with(FieldUpdate::TurnCount { turn_count });

        if self.reaches_limit(after) {
            let winners = co_winners(&after.players);
            let winner = winner_message(&winners);
            let winners: Vec<_> = winners.iter().map(|p| p.user_id.clone()).collect();
            let summary = summary.unwrap_or(SUMMARY_FALLBACK).to_string();
            update.push(FieldUpdate::Status {
                status: GameStatus::Finished,
            });
            update.push(FieldUpdate::Outcome {
                winners: winners.clone(),
                winner: winner.clone(),
                summary: summary.clone(),
            });
            return (
                update,
                TurnEnd::Finished {
                    winners,
                    winner,
                    summary,
                },
            );
        }

        let next_player_id = after
            .next_player_id()
            .unwrap_or_else(|| after.current_player_id.clone());
        update.push(FieldUpdate::CurrentPlayer {
            user_id: next_player_id.clone(),
        });
        (
            update,
            TurnEnd::Advanced {
                next_player_id,
                turn_count,
            },
        )
    }

    /// Recap of a game as it will stand when finished.
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    pub(crate) async fn summarize(&self, game: &Game) -> String {
        let winner = winner_message(&co_winners(&game.players));
        self.completion()
            .complete_or(&summary_prompt(game, &winner), SUMMARY_FALLBACK)
            .await
    }

    /// Follow-up after the finishing commit: clear every participant's
    /// back-reference to this game and reward each co-winner.
    ///
    /// Runs after the authoritative write and never undoes it; failures are
    /// logged.
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    pub(crate) async fn after_finish(&self, game: &Game) {
        let clears = game.players.iter().map(|player| async move {
            let points_here = match self.profiles().profile(&player.user_id).await {
                Ok(Some(profile)) => profile.current_room_id.as_deref() == Some(game.id.as_str()),
                Ok(None) => false,
                Err(e) => {
                    warn!(user_id = %player.user_id, error = %e, "Could not read profile");
                    false
                }
            };
            if points_here && let Err(e) = self.point_room(&player.user_id, None).await {
                warn!(user_id = %player.user_id, error = %e, "Could not clear back-reference");
            }
        });
        join_all(clears).await;
        for winner in &game.winners {
            if self.grant(winner, Reward::GameChampion).await.is_some() {
                debug!(user_id = %winner, "Champion rewarded");
            }
        }
    }
}
