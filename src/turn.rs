//! The turn processor: roll, move, resolve the square, settle any decision,
//! end the turn.
//!
//! Each step is one conditional write. A roll lands the move, any rent and
//! either the turn end or the decision the mover now owes. Answering that
//! decision lands its money movement together with the turn end, so a turn
//! can never be advanced twice or left stuck after money has moved.
//!
//! Calls against a missing game, or a decision that another client already
//! resolved, are silent no-ops and return `Ok(None)`.

use challengers_rules::{
    AnswerVerdict, DecisionKind, Equation, FieldUpdate, Game, GameStatus, GameUpdate,
    PendingDecision, Property, SquareOutcome, UserId, resolve_square,
};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, instrument, warn};

use crate::commit::{Committed, Plan};
use crate::engine::GameEngine;
use crate::error::GameError;
use crate::store::Reward;

/// Shown when a hint cannot be generated.
pub const HINT_FALLBACK: &str = "Failed to connect to the AI. Please try again.";

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEnd {
    /// The turn passed on.
    Advanced {
        /// New turn holder.
        next_player_id: UserId,
        /// Completed turns.
        turn_count: u32,
    },
    /// The turn limit was reached and the game is over.
    Finished {
        /// Co-winner ids.
        winners: Vec<UserId>,
        /// Announcement line.
        winner: String,
        /// Game recap.
        summary: String,
    },
}

/// Money moved by landing on a rented square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentTransfer {
    /// Property owner.
    pub owner_id: UserId,
    /// Nominal rent, credited to the owner in full.
    pub credited: i64,
    /// What actually left the mover's purse (never below zero).
    pub paid: i64,
}

/// Everything a roll did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollReport {
    /// Die value.
    pub roll: u32,
    /// Square before moving.
    pub from: usize,
    /// Square after moving.
    pub to: usize,
    /// How the landing square resolved.
    pub outcome: SquareOutcome,
    /// Rent charged, if any.
    pub rent: Option<RentTransfer>,
    /// Decision the mover now owes, if any.
    pub pending: Option<PendingDecision>,
    /// Set when the roll ended the turn outright.
    pub turn_end: Option<TurnEnd>,
}

/// Result of a build decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildResult {
    /// Property built and paid for.
    Built {
        /// Square built on.
        square: usize,
    },
    /// The player chose not to build.
    Declined,
    /// The player accepted but could not pay; nothing was built.
    InsufficientFunds {
        /// Money on hand.
        money: i64,
        /// Property price.
        cost: i64,
    },
}

/// Outcome of a build decision and the turn end it caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// What happened to the offer.
    pub result: BuildResult,
    /// The turn end.
    pub turn_end: TurnEnd,
}

/// How an answer was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerResult {
    /// Paid from the bank.
    Correct {
        /// Amount credited.
        payout: i64,
        /// Reward newly granted for this answer.
        reward: Option<Reward>,
    },
    /// Wrong number; a hint is on offer.
    Incorrect {
        /// The right answer.
        answer: i64,
    },
    /// Not a number; the turn ends with no penalty.
    Unparseable,
}

/// Outcome of an equation answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReport {
    /// Verdict and its effect.
    pub result: AnswerResult,
    /// The hint offer left pending after an incorrect answer.
    pub pending: Option<PendingDecision>,
    /// Set unless a hint offer is pending.
    pub turn_end: Option<TurnEnd>,
}

/// Outcome of the hint offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintReport {
    /// Hint text, when requested.
    pub hint: Option<String>,
    /// The turn end.
    pub turn_end: TurnEnd,
}

/// A decision resolved because its deadline passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredDecision {
    /// The decision that lapsed.
    pub decision: PendingDecision,
    /// The turn end.
    pub turn_end: TurnEnd,
}

/// The writes one action makes before any turn end is appended.
struct Step<R> {
    update: GameUpdate,
    ends_turn: bool,
    report: R,
}

/// A committed action.
struct Played<R> {
    report: R,
    turn_end: Option<TurnEnd>,
}

/// Prompt asking for a hint that does not give the answer away.
pub fn hint_prompt(equation: &Equation) -> String {
    format!(
        "Explain how to solve the math equation \"{}\" or provide a subtle hint to solve it. Do not give the answer directly.",
        equation.display_text()
    )
}

/// The decision `user_id` owes in a running game.
///
/// `expected` pins the decision to the first instance seen: once set, a
/// different or missing decision means another client resolved it and the
/// action becomes a no-op.
fn owed<'g>(
    game: &'g Game,
    user_id: &str,
    expected: &mut Option<u64>,
) -> Result<Option<&'g PendingDecision>, GameError> {
    if game.status != GameStatus::InProgress {
        return Ok(None);
    }
    let Some(pending) = game.pending.as_ref().filter(|p| p.player_id == user_id) else {
        return match expected {
            Some(_) => Ok(None),
            None => Err(GameError::NoPendingDecision(user_id.to_string())),
        };
    };
    match expected {
        Some(id) if *id != pending.id => Ok(None),
        _ => {
            *expected = Some(pending.id);
            Ok(Some(pending))
        }
    }
}

impl GameEngine {
    /// When a decision raised now would lapse, if deadlines are enabled.
    ///
    /// A timeout past the representable calendar means the decision never
    /// lapses.
    fn decision_deadline(&self) -> Option<DateTime<Utc>> {
        let timeout = self.config().decision_timeout()?;
        let deadline = TimeDelta::from_std(timeout)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta));
        if deadline.is_none() {
            warn!(
                timeout_secs = timeout.as_secs(),
                "Decision timeout out of range, no deadline set"
            );
        }
        deadline
    }

    /// Commits one action and, when it ends the turn, the turn end with it.
    ///
    /// `step` is run once against a first read (so precondition errors
    /// surface before anything is awaited) and again on every commit
    /// attempt. A turn end that reaches the limit carries a summary
    /// generated from the first read before the commit loop starts.
    async fn play<R, F>(&self, game_id: &str, mut step: F) -> Result<Option<Played<R>>, GameError>
    where
        F: FnMut(&Game) -> Result<Option<Step<R>>, GameError>,
    {
        let Some(snapshot) = self.games().get(game_id).await? else {
            debug!("Game missing, ignoring action");
            return Ok(None);
        };
        let summary = match step(&snapshot)? {
            None => {
                debug!("Nothing to do");
                return Ok(None);
            }
            Some(planned) if planned.ends_turn && self.reaches_limit(&snapshot) => {
                Some(self.summarize(&snapshot.clone().applied(&planned.update)).await)
            }
            Some(_) => None,
        };

        let mut planned = None;
        let committed = self
            .commit(game_id, |game| {
                let Some(Step {
                    mut update,
                    ends_turn,
                    report,
                }) = step(game)?
                else {
                    return Ok(Plan::Skip);
                };
                let turn_end = if ends_turn {
                    let after = game.clone().applied(&update);
                    let (end_update, end) = self.turn_end(&after, summary.as_deref());
                    update.extend(end_update);
                    Some(end)
                } else {
                    None
                };
                planned = Some((report, turn_end));
                Ok(Plan::Write(update))
            })
            .await?;

        let (Committed::Written { after, .. }, Some((report, turn_end))) = (committed, planned)
        else {
            debug!("Action superseded by another client");
            return Ok(None);
        };
        match &turn_end {
            Some(TurnEnd::Finished { winner, .. }) => {
                info!(%winner, "Game finished");
                self.after_finish(&after).await;
            }
            Some(TurnEnd::Advanced {
                next_player_id,
                turn_count,
            }) => info!(%next_player_id, turn_count, "Turn ended"),
            None => debug!("Turn suspended on a decision"),
        }
        Ok(Some(Played { report, turn_end }))
    }

    /// Rolls the die for the turn holder and resolves the landing square.
    ///
    /// Anyone but the turn holder is rejected with
    /// [`GameError::NotYourTurn`] before anything is written.
    #[instrument(skip(self))]
    pub async fn roll_dice(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<Option<RollReport>, GameError> {
        let (roll, equation, nonce) = self.draw(|r| (r.roll_die(), r.equation(), r.nonce()));
        let deadline = self.decision_deadline();
        let cost = *self.rules().property_cost();
        debug!(roll, "Die rolled");

        let played = self
            .play(game_id, |game| {
                if game.status != GameStatus::InProgress {
                    return Ok(None);
                }
                if game.current_player_id != user_id {
                    warn!(current = %game.current_player_id, "Roll rejected: not your turn");
                    return Err(GameError::NotYourTurn(user_id.to_string()));
                }
                if game.pending.is_some() {
                    return Err(GameError::DecisionPending(user_id.to_string()));
                }
                let Some(mover) = game.player(user_id) else {
                    return Ok(None);
                };

                let from = mover.position;
                let to = self.layout().advance(from, roll);
                let mut moved = mover.clone();
                moved.position = to;
                let outcome =
                    resolve_square(self.layout(), &moved, to, &game.players, &game.board_state);

                let mut update = GameUpdate::new();
                let mut rent = None;
                if let SquareOutcome::Rent {
                    owner_id, amount, ..
                } = &outcome
                {
                    let paid = moved.money.min(*amount).max(0);
                    moved.money = (moved.money - amount).max(0);
                    if let Some(owner) = game.player(owner_id) {
                        let mut owner = owner.clone();
                        owner.money += amount;
                        update.push(FieldUpdate::UpsertPlayer { player: owner });
                    }
                    rent = Some(RentTransfer {
                        owner_id: owner_id.clone(),
                        credited: *amount,
                        paid,
                    });
                }
                update.push(FieldUpdate::UpsertPlayer { player: moved });

                let kind = match &outcome {
                    SquareOutcome::BuildOffer { .. } => Some(DecisionKind::Build { cost }),
                    SquareOutcome::Rent { owner_id, .. } => Some(DecisionKind::Challenge {
                        setter_id: owner_id.clone(),
                        equation: equation.clone(),
                    }),
                    SquareOutcome::EquationChallenge { setter_id, .. } => {
                        Some(DecisionKind::Challenge {
                            setter_id: setter_id.clone(),
                            equation: equation.clone(),
                        })
                    }
                    SquareOutcome::SafeZone { .. } => None,
                };
                let pending = kind.map(|kind| PendingDecision {
                    id: nonce,
                    player_id: user_id.to_string(),
                    square: to,
                    kind,
                    deadline,
                });
                if let Some(pending) = &pending {
                    update.push(FieldUpdate::Pending {
                        pending: Some(pending.clone()),
                    });
                }

                Ok(Some(Step {
                    update,
                    ends_turn: pending.is_none(),
                    report: RollReport {
                        roll,
                        from,
                        to,
                        outcome,
                        rent,
                        pending,
                        turn_end: None,
                    },
                }))
            })
            .await?;

        Ok(played.map(|played| {
            info!(from = played.report.from, to = played.report.to, "Player moved");
            RollReport {
                turn_end: played.turn_end,
                ..played.report
            }
        }))
    }

    /// Accepts or declines the property on offer, then ends the turn.
    ///
    /// Accepting without enough money builds nothing; the turn still ends.
    #[instrument(skip(self))]
    pub async fn submit_build_decision(
        &self,
        user_id: &str,
        game_id: &str,
        accept: bool,
    ) -> Result<Option<BuildReport>, GameError> {
        let rent = *self.rules().rent();
        let mut expected = None;
        let played = self
            .play(game_id, |game| {
                let Some(pending) = owed(game, user_id, &mut expected)? else {
                    return Ok(None);
                };
                let DecisionKind::Build { cost } = pending.kind else {
                    return Err(GameError::NoPendingDecision(user_id.to_string()));
                };
                let Some(mover) = game.player(user_id) else {
                    return Ok(None);
                };

                let mut update = GameUpdate::new();
                let result = if !accept {
                    BuildResult::Declined
                } else if mover.money < cost {
                    BuildResult::InsufficientFunds {
                        money: mover.money,
                        cost,
                    }
                } else {
                    let mut builder = mover.clone();
                    builder.money -= cost;
                    builder.property_count += 1;
                    update.push(FieldUpdate::UpsertPlayer { player: builder });
                    update.push(FieldUpdate::BoardSquare {
                        square: pending.square,
                        property: Property {
                            owner_id: user_id.to_string(),
                            rent,
                        },
                    });
                    BuildResult::Built {
                        square: pending.square,
                    }
                };
                Ok(Some(Step {
                    update,
                    ends_turn: true,
                    report: result,
                }))
            })
            .await?;

        Ok(played.and_then(|played| {
            info!(result = ?played.report, "Build decision resolved");
            played.turn_end.map(|turn_end| BuildReport {
                result: played.report,
                turn_end,
            })
        }))
    }

    /// Judges an answer to the pending equation.
    ///
    /// A correct answer moves the payout from the bank to the player and ends
    /// the turn; a non-numeric one ends the turn with no penalty; a wrong
    /// number leaves a hint offer pending.
    #[instrument(skip(self))]
    pub async fn submit_equation_answer(
        &self,
        user_id: &str,
        game_id: &str,
        answer: &str,
    ) -> Result<Option<AnswerReport>, GameError> {
        let chance = *self.rules().solver_reward_chance();
        let (lucky, nonce) = self.draw(|r| (r.chance(chance), r.nonce()));
        let deadline = self.decision_deadline();
        let payout = *self.rules().bank_payout();
        let mut expected = None;

        let played = self
            .play(game_id, |game| {
                let Some(pending) = owed(game, user_id, &mut expected)? else {
                    return Ok(None);
                };
                let DecisionKind::Challenge { equation, .. } = &pending.kind else {
                    return Err(GameError::NoPendingDecision(user_id.to_string()));
                };
                let Some(mover) = game.player(user_id) else {
                    return Ok(None);
                };

                let step = match equation.check(answer) {
                    AnswerVerdict::Correct => {
                        let mut solver = mover.clone();
                        solver.money += payout;
                        Step {
                            update: GameUpdate::new()
                                .with(FieldUpdate::UpsertPlayer { player: solver })
                                .with(FieldUpdate::BankMoney {
                                    bank_money: game.bank_money - payout,
                                }),
                            ends_turn: true,
                            report: (
                                AnswerResult::Correct {
                                    payout,
                                    reward: None,
                                },
                                None,
                            ),
                        }
                    }
                    AnswerVerdict::Unparseable => Step {
                        update: GameUpdate::new(),
                        ends_turn: true,
                        report: (AnswerResult::Unparseable, None),
                    },
                    AnswerVerdict::Incorrect => {
                        let hint = PendingDecision {
                            id: nonce,
                            player_id: user_id.to_string(),
                            square: pending.square,
                            kind: DecisionKind::Hint {
                                equation: equation.clone(),
                            },
                            deadline,
                        };
                        Step {
                            update: GameUpdate::new().with(FieldUpdate::Pending {
                                pending: Some(hint.clone()),
                            }),
                            ends_turn: false,
                            report: (
                                AnswerResult::Incorrect {
                                    answer: equation.answer(),
                                },
                                Some(hint),
                            ),
                        }
                    }
                };
                Ok(Some(step))
            })
            .await?;

        let Some(Played {
            report: (mut result, pending),
            turn_end,
        }) = played
        else {
            return Ok(None);
        };
        info!(?result, "Answer judged");
        if let AnswerResult::Correct { reward, .. } = &mut result
            && lucky
        {
            *reward = self.grant(user_id, Reward::EquationSolver).await;
        }
        Ok(Some(AnswerReport {
            result,
            pending,
            turn_end,
        }))
    }

    /// Answers the hint offer after a wrong answer, then ends the turn.
    ///
    /// Accepting fetches a hint from the completion service, falling back to
    /// a fixed message.
    #[instrument(skip(self))]
    pub async fn respond_hint(
        &self,
        user_id: &str,
        game_id: &str,
        accept: bool,
    ) -> Result<Option<HintReport>, GameError> {
        let Some(game) = self.games().get(game_id).await? else {
            return Ok(None);
        };
        let mut expected = None;
        let Some(pending) = owed(&game, user_id, &mut expected)? else {
            return Ok(None);
        };
        let DecisionKind::Hint { equation } = &pending.kind else {
            return Err(GameError::NoPendingDecision(user_id.to_string()));
        };
        let hint = if accept {
            Some(
                self.completion()
                    .complete_or(&hint_prompt(equation), HINT_FALLBACK)
                    .await,
            )
        } else {
            None
        };

        let played = self
            .play(game_id, |game| {
                let Some(pending) = owed(game, user_id, &mut expected)? else {
                    return Ok(None);
                };
                if !matches!(pending.kind, DecisionKind::Hint { .. }) {
                    return Ok(None);
                }
                Ok(Some(Step {
                    update: GameUpdate::new(),
                    ends_turn: true,
                    report: (),
                }))
            })
            .await?;

        Ok(played
            .and_then(|played| played.turn_end)
            .map(|turn_end| HintReport { hint, turn_end }))
    }

    /// Resolves the pending decision if its deadline has passed at `now`.
    ///
    /// Any client may call this. A lapsed build offer or hint offer counts as
    /// declined; a lapsed challenge counts as a non-numeric answer. Without
    /// deadlines configured nothing ever lapses.
    #[instrument(skip(self))]
    pub async fn expire_pending_decision(
        &self,
        game_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ExpiredDecision>, GameError> {
        let mut expected = None;
        let played = self
            .play(game_id, |game| {
                if game.status != GameStatus::InProgress {
                    return Ok(None);
                }
                let Some(pending) = game.pending.as_ref().filter(|p| p.is_expired(now)) else {
                    return Ok(None);
                };
                if expected.is_some_and(|id| id != pending.id) {
                    return Ok(None);
                }
                expected = Some(pending.id);
                Ok(Some(Step {
                    update: GameUpdate::new(),
                    ends_turn: true,
                    report: pending.clone(),
                }))
            })
            .await?;

        Ok(played.and_then(|played| {
            warn!(player_id = %played.report.player_id, "Pending decision lapsed");
            played.turn_end.map(|turn_end| ExpiredDecision {
                decision: played.report,
                turn_end,
            })
        }))
    }

    /// Grants a reward, logging rather than failing if the account store
    /// refuses. Returns the reward when it was newly granted.
    pub(crate) async fn grant(&self, user_id: &str, reward: Reward) -> Option<Reward> {
        match self.profiles().grant_reward(user_id, reward).await {
            Ok(true) => Some(reward),
            Ok(false) => None,
            Err(e) => {
                warn!(error = %e, %reward, "Could not grant reward");
                None
            }
        }
    }
}
