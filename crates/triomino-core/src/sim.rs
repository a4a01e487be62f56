//! Driving a match to completion.
//!
//! [`run_to_completion`] is the simulation-harness entrypoint: it loops the
//! state machine with a strategy per seat until the match finishes and
//! returns the full move-by-move trace plus the final outcome.

use crate::actions::{Action, EngineEvent};
use crate::board::PlayerId;
use crate::game::{EngineError, MatchPhase, MatchState};
use crate::score::MAX_DRAWS_PER_TURN;
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};

/// Hard ceiling on driven actions; tripping it means the state machine
/// stopped progressing and is surfaced as a fatal invariant, never a
/// silently truncated match.
const ACTION_LIMIT: u32 = 100_000;

/// Final result of a completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// More than one entry means a tie.
    pub winners: Vec<PlayerId>,
    pub final_scores: Vec<i32>,
    pub rounds_played: u32,
    pub turns_played: u32,
}

/// A completed match: the audit trace and the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub trace: Vec<EngineEvent>,
    pub outcome: MatchOutcome,
}

/// Drive `state` from wherever it is to `Finished`.
///
/// One strategy per seat, in seat order. Deterministic given a seeded match
/// and seeded strategies: the same inputs replay the same trace.
pub fn run_to_completion(
    state: &mut MatchState,
    strategies: &mut [Strategy],
) -> Result<MatchReport, EngineError> {
    assert_eq!(
        strategies.len(),
        state.player_count(),
        "one strategy per player"
    );

    let mut trace = Vec::new();
    let mut actions = 0u32;

    while !state.is_finished() {
        actions += 1;
        if actions > ACTION_LIMIT {
            return Err(EngineError::Invariant(
                "match exceeded the action limit without finishing".into(),
            ));
        }

        match &state.phase {
            MatchPhase::Setup | MatchPhase::RoundOver | MatchPhase::FinalRoundPending => {
                trace.extend(state.apply(state.current_player, Action::BeginRound)?);
            }

            MatchPhase::Opening | MatchPhase::Playing | MatchPhase::Drawing => {
                let player = state.current_player;
                let legal = state.legal_moves();

                if !legal.is_empty() {
                    let opponents = state.opponents_of(player);
                    let hand = &state.players[player as usize].hand;
                    let mv = strategies[player as usize]
                        .choose(&legal, &state.board, hand, &opponents)
                        .ok_or_else(|| {
                            EngineError::Invariant(
                                "strategy returned no move for a non-empty legal set".into(),
                            )
                        })?;
                    trace.extend(state.apply(player, Action::Place(mv))?);
                } else if state.pool_remaining() > 0
                    && state.draws_this_turn() < MAX_DRAWS_PER_TURN
                {
                    trace.extend(state.apply(player, Action::Draw)?);
                } else {
                    trace.extend(state.apply(player, Action::Pass)?);
                }
            }

            MatchPhase::Finished { .. } => break,
        }
    }

    let winners = state.winners().unwrap_or_default().to_vec();
    let outcome = MatchOutcome {
        winners,
        final_scores: state.players.iter().map(|p| p.score).collect(),
        rounds_played: state.round,
        turns_played: state.turns_played(),
    };
    Ok(MatchReport { trace, outcome })
}
