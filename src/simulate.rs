//! Plays a whole game in-process with scripted contestants.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use challengers_rules::{DecisionKind, Game, GameStatus, UserId};
use tracing::{debug, info, instrument, warn};

use crate::engine::GameEngine;
use crate::players::Contestant;
use crate::store::{UserProfile, profiles_for};

/// How a simulated game went.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Final state of the game.
    pub game: Game,
    /// Every participant's account after the game, in seating order.
    pub profiles: Vec<UserProfile>,
    /// Rolls made.
    pub rolls: u32,
    /// Equation answers judged.
    pub answers: u32,
}

/// Seats every contestant in one game and plays it to the turn limit.
///
/// The first contestant creates the game; the rest join, which starts it.
/// Fails if fewer than two contestants are given or the game stops
/// progressing.
#[instrument(skip(engine, contestants), fields(players = contestants.len()))]
pub async fn simulate(
    engine: &GameEngine,
    contestants: Vec<Box<dyn Contestant>>,
) -> Result<SimulationReport> {
    if contestants.len() < 2 {
        bail!("A game needs at least two players");
    }

    let mut seats: HashMap<UserId, Box<dyn Contestant>> = HashMap::new();
    let mut order = Vec::new();
    for (index, contestant) in contestants.into_iter().enumerate() {
        let user_id = format!("bot-{}", index + 1);
        engine.register_profile(&user_id, contestant.name()).await?;
        order.push(user_id.clone());
        seats.insert(user_id, contestant);
    }

    let game_id = engine.create_game(&order[0]).await?;
    for user_id in &order[1..] {
        engine.join_game(user_id, &game_id).await?;
    }
    info!(%game_id, "Simulation started");

    let turn_limit = *engine.rules().turn_limit() as usize;
    let max_actions = turn_limit * 4 + 8;
    let (mut rolls, mut answers) = (0u32, 0u32);

    for _ in 0..max_actions {
        let game = engine
            .game(&game_id)
            .await?
            .context("Game vanished mid-simulation")?;
        if game.status == GameStatus::Finished {
            break;
        }
        let user_id = game.current_player_id.clone();
        let contestant = seats
            .get_mut(&user_id)
            .with_context(|| format!("No contestant seated as {}", user_id))?;

        let Some(pending) = game.pending.clone() else {
            if let Some(report) = engine.roll_dice(&user_id, &game_id).await? {
                rolls += 1;
                debug!(player = %user_id, roll = report.roll, to = report.to, "Rolled");
            }
            continue;
        };

        match &pending.kind {
            DecisionKind::Build { cost } => {
                let accept = contestant.build(&game, *cost).await?;
                engine.submit_build_decision(&user_id, &game_id, accept).await?;
            }
            DecisionKind::Challenge { equation, .. } => {
                let answer = contestant.answer(&game, equation).await?;
                if let Some(report) = engine
                    .submit_equation_answer(&user_id, &game_id, &answer)
                    .await?
                {
                    answers += 1;
                    debug!(player = %user_id, result = ?report.result, "Answered");
                }
            }
            DecisionKind::Hint { equation } => {
                let accept = contestant.want_hint(&game, equation).await?;
                if let Some(report) = engine.respond_hint(&user_id, &game_id, accept).await?
                    && let Some(hint) = report.hint
                {
                    debug!(player = %user_id, %hint, "Hint shown");
                }
            }
        }
    }

    let game = engine
        .game(&game_id)
        .await?
        .context("Game vanished mid-simulation")?;
    if game.status != GameStatus::Finished {
        warn!(turn_count = game.turn_count, "Simulation stalled");
        bail!("Game stopped progressing after {} turns", game.turn_count);
    }
    let profiles = profiles_for(engine.profiles(), &order).await?;
    info!(winner = ?game.winner, rolls, answers, "Simulation finished");
    Ok(SimulationReport {
        game,
        profiles,
        rolls,
        answers,
    })
}
