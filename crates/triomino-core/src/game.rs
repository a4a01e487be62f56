//! Core match state machine.
//!
//! `MatchState` owns the board, the pool and every player for one match and
//! drives rounds from setup through the final round. All mutation goes
//! through [`MatchState::apply`]; illegal submissions are rejected with the
//! state unchanged.

use crate::actions::{Action, EngineEvent, Move, RoundEndReason, ScoredMove};
use crate::board::{Board, PlacementError, PlayerId};
use crate::grid::Grid;
use crate::player::{opening_holder, Player};
use crate::score::{score_event, Bonus, ScoreEvent, MAX_DRAWS_PER_TURN, TARGET_SCORE};
use crate::tile::Tile;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default grid height.
pub const DEFAULT_GRID_ROWS: i16 = 16;

/// Default grid width.
pub const DEFAULT_GRID_COLS: i16 = 32;

/// Match phase.
///
/// Play inside the final round still runs through `Playing`/`Drawing`; the
/// extra round is marked by [`MatchState::is_final_round`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Created, nothing dealt yet.
    Setup,
    /// Hands dealt; the opener must place the forced opening tile.
    Opening,
    /// Active player has (or must look for) a placement.
    Playing,
    /// Active player drew this turn and still has no placement.
    Drawing,
    /// Round scored; waiting for the next deal.
    RoundOver,
    /// Someone crossed the target score; one further round remains.
    FinalRoundPending,
    /// Match complete. Ties are reported, never broken.
    Finished { winners: Vec<PlayerId> },
}

/// Errors returned when applying actions.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EngineError {
    #[error("not this player's turn")]
    NotYourTurn,

    #[error("action is not valid in the current phase")]
    InvalidPhase,

    #[error("illegal move: {0}")]
    IllegalMove(#[from] PlacementError),

    #[error("a legal move is available and must be played")]
    MustPlace,

    #[error("tiles remain in the pool; draw before passing")]
    MustDraw,

    #[error("draw limit reached for this turn")]
    ExhaustedPoolDraw,

    #[error("the pool is empty")]
    EmptyPool,

    #[error("match is finished")]
    MatchOver,

    #[error("board invariant violated: {0}")]
    Invariant(String),
}

/// Match configuration.
///
/// Scoring deltas are fixed by the rules; only table shape (players, grid,
/// target) and the seed are configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub player_count: u8,
    pub seed: u64,
    pub target_score: i32,
    pub grid_rows: i16,
    pub grid_cols: i16,
    /// Empty means auto-generated names.
    pub player_names: Vec<String>,
}

impl MatchConfig {
    /// Standard configuration for the given table.
    pub fn new(player_count: u8, seed: u64) -> Self {
        Self {
            player_count,
            seed,
            target_score: TARGET_SCORE,
            grid_rows: DEFAULT_GRID_ROWS,
            grid_cols: DEFAULT_GRID_COLS,
            player_names: Vec::new(),
        }
    }
}

/// One row of the public scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub id: PlayerId,
    pub name: String,
    pub score: i32,
    pub hand_size: usize,
}

/// Tiles dealt to each player at round start.
pub fn initial_hand_size(player_count: u8) -> usize {
    match player_count {
        2 => 9,
        3 | 4 => 7,
        _ => 6,
    }
}

/// The complete state of one match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchState {
    /// The playing surface for the current round.
    #[serde(skip)]
    pub board: Board,
    /// All players in seat order.
    pub players: Vec<Player>,
    /// Undealt tiles, drawn from the back.
    pub pool: Vec<Tile>,
    /// Current phase.
    pub phase: MatchPhase,
    /// Round number, 1-based once dealt.
    pub round: u32,
    /// Seat whose decision is pending.
    pub current_player: PlayerId,
    config: MatchConfig,
    /// Forced opening tile and whether it earns the triple bonus.
    opening: Option<(Tile, bool)>,
    draws_this_turn: u8,
    consecutive_passes: u8,
    final_round: bool,
    turn_count: u32,
    /// Owned, seeded generator; the only randomness in the engine.
    #[serde(skip)]
    rng: StdRng,
}

impl MatchState {
    /// Create a match from a full configuration.
    pub fn new(config: MatchConfig) -> Self {
        assert!(
            (2..=6).contains(&config.player_count),
            "player count must be 2-6"
        );

        let names: Vec<String> = if config.player_names.is_empty() {
            (0..config.player_count)
                .map(|i| format!("Player {}", i + 1))
                .collect()
        } else {
            config.player_names.clone()
        };
        assert_eq!(
            names.len(),
            config.player_count as usize,
            "must provide a name per player"
        );

        let players = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerId, name))
            .collect();

        let rng = StdRng::seed_from_u64(config.seed);
        let board = Board::new(Grid::new(config.grid_rows, config.grid_cols));

        Self {
            board,
            players,
            pool: Vec::new(),
            phase: MatchPhase::Setup,
            round: 0,
            current_player: 0,
            config,
            opening: None,
            draws_this_turn: 0,
            consecutive_passes: 0,
            final_round: false,
            turn_count: 0,
            rng,
        }
    }

    /// Create a match with standard settings and a deterministic seed.
    pub fn new_match(player_count: u8, seed: u64) -> Self {
        Self::new(MatchConfig::new(player_count, seed))
    }

    /// Number of seated players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// A player by seat.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    /// Whether the current round is the one extra round after the target.
    pub fn is_final_round(&self) -> bool {
        self.final_round
    }

    /// Draws taken by the active player this turn.
    pub fn draws_this_turn(&self) -> u8 {
        self.draws_this_turn
    }

    /// Consecutive empty-pool passes since the last placement.
    pub fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    /// Completed turns (placements and passes) across the match.
    pub fn turns_played(&self) -> u32 {
        self.turn_count
    }

    /// Tiles left in the pool.
    pub fn pool_remaining(&self) -> usize {
        self.pool.len()
    }

    /// Whether the match has finished.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, MatchPhase::Finished { .. })
    }

    /// Winners once finished; more than one entry means a tie.
    pub fn winners(&self) -> Option<&[PlayerId]> {
        match &self.phase {
            MatchPhase::Finished { winners } => Some(winners),
            _ => None,
        }
    }

    /// Public standings in seat order.
    pub fn scoreboard(&self) -> Vec<PlayerStanding> {
        self.players
            .iter()
            .map(|p| PlayerStanding {
                id: p.id,
                name: p.name.clone(),
                score: p.score,
                hand_size: p.hand_size(),
            })
            .collect()
    }

    /// Public state of everyone except `player`.
    pub fn opponents_of(&self, player: PlayerId) -> Vec<PlayerStanding> {
        self.scoreboard()
            .into_iter()
            .filter(|s| s.id != player)
            .collect()
    }

    /// The legal moves for the pending decision.
    ///
    /// During the opening this is the forced tile on the opening cell under
    /// every rotation (with the opening bonus attached); during play it is
    /// the full placement set for the active player's hand. The engine never
    /// breaks ties between entries.
    pub fn legal_moves(&self) -> Vec<ScoredMove> {
        match &self.phase {
            MatchPhase::Opening => {
                let Some((tile, has_triple)) = self.opening else {
                    return Vec::new();
                };
                let mut moves = self.board.legal_moves(&[tile]);
                if has_triple {
                    let bonus = if tile.is_triple_zero() {
                        Bonus::OpeningTripleZero
                    } else {
                        Bonus::OpeningTriple
                    };
                    for m in &mut moves {
                        m.bonuses.push(bonus);
                    }
                }
                moves
            }
            MatchPhase::Playing | MatchPhase::Drawing => self
                .board
                .legal_moves(&self.players[self.current_player as usize].hand),
            _ => Vec::new(),
        }
    }

    /// Apply an action for `player`.
    ///
    /// Returns the audit events the action produced. On error the state is
    /// unchanged; an [`EngineError::Invariant`] is fatal to the match.
    pub fn apply(
        &mut self,
        player: PlayerId,
        action: Action,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        if self.is_finished() {
            return Err(EngineError::MatchOver);
        }

        match action {
            Action::BeginRound => match self.phase {
                MatchPhase::Setup | MatchPhase::RoundOver | MatchPhase::FinalRoundPending => {
                    self.begin_round()
                }
                _ => Err(EngineError::InvalidPhase),
            },

            Action::Place(mv) => {
                if player != self.current_player {
                    return Err(EngineError::NotYourTurn);
                }
                match self.phase {
                    MatchPhase::Opening => self.apply_opening(mv),
                    MatchPhase::Playing | MatchPhase::Drawing => self.apply_place(mv),
                    _ => Err(EngineError::InvalidPhase),
                }
            }

            Action::Draw => {
                if player != self.current_player {
                    return Err(EngineError::NotYourTurn);
                }
                if !matches!(self.phase, MatchPhase::Playing | MatchPhase::Drawing) {
                    return Err(EngineError::InvalidPhase);
                }
                self.apply_draw()
            }

            Action::Pass => {
                if player != self.current_player {
                    return Err(EngineError::NotYourTurn);
                }
                if !matches!(self.phase, MatchPhase::Playing | MatchPhase::Drawing) {
                    return Err(EngineError::InvalidPhase);
                }
                self.apply_pass()
            }
        }
    }

    // ==================== Round setup ====================

    fn begin_round(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        if self.phase == MatchPhase::FinalRoundPending {
            self.final_round = true;
        }
        self.round += 1;

        self.board = Board::new(Grid::new(self.config.grid_rows, self.config.grid_cols));
        let mut pool = Tile::full_set();
        pool.shuffle(&mut self.rng);

        let per_player = initial_hand_size(self.config.player_count);
        for player in &mut self.players {
            player.reset_for_round();
            for _ in 0..per_player {
                let tile = pool.pop().ok_or_else(|| {
                    EngineError::Invariant("pool exhausted during deal".into())
                })?;
                player.hand.push(tile);
            }
        }
        self.pool = pool;

        let (starter, tile, has_triple) = opening_holder(&self.players);
        self.current_player = starter;
        self.opening = Some((tile, has_triple));
        self.draws_this_turn = 0;
        self.consecutive_passes = 0;
        self.phase = MatchPhase::Opening;

        Ok(vec![EngineEvent::RoundStarted {
            round: self.round,
            starter,
            tiles_per_player: per_player,
            pool_remaining: self.pool.len(),
            final_round: self.final_round,
        }])
    }

    // ==================== Placements ====================

    fn apply_opening(&mut self, mv: Move) -> Result<Vec<EngineEvent>, EngineError> {
        let (tile, has_triple) = self
            .opening
            .ok_or_else(|| EngineError::Invariant("opening tile not set".into()))?;
        if mv.tile != tile {
            return Err(PlacementError::NotOpeningTile.into());
        }

        let player = self.current_player;
        self.board.place(mv, player)?;
        self.players[player as usize]
            .remove_tile(tile)
            .ok_or_else(|| EngineError::Invariant("opener does not hold the opening tile".into()))?;

        let mut bonuses = Vec::new();
        if has_triple {
            bonuses.push(if tile.is_triple_zero() {
                Bonus::OpeningTripleZero
            } else {
                Bonus::OpeningTriple
            });
        }
        let delta = score_event(&ScoreEvent::Place {
            tile,
            bonuses: bonuses.clone(),
        });
        self.players[player as usize].add_score(delta);
        self.audit_board()?;

        self.opening = None;
        self.turn_count += 1;
        self.advance_turn();

        Ok(vec![EngineEvent::TilePlaced {
            player,
            mv,
            opening: true,
            bonuses,
            score_delta: delta,
            resulting_phase: self.phase.clone(),
        }])
    }

    fn apply_place(&mut self, mv: Move) -> Result<Vec<EngineEvent>, EngineError> {
        let player = self.current_player;
        if !self.players[player as usize].has_tile(mv.tile) {
            return Err(PlacementError::TileNotInHand.into());
        }

        let bonuses = self.board.place(mv, player)?;
        self.players[player as usize].remove_tile(mv.tile);

        let delta = score_event(&ScoreEvent::Place {
            tile: mv.tile,
            bonuses: bonuses.clone(),
        });
        self.players[player as usize].add_score(delta);
        self.audit_board()?;

        self.consecutive_passes = 0;
        self.turn_count += 1;

        let mut events = Vec::new();
        if self.players[player as usize].hand_is_empty() {
            let end_events = self.finish_round(player, RoundEndReason::EmptiedHand);
            events.push(EngineEvent::TilePlaced {
                player,
                mv,
                opening: false,
                bonuses,
                score_delta: delta,
                resulting_phase: self.phase.clone(),
            });
            events.extend(end_events);
        } else {
            self.advance_turn();
            events.push(EngineEvent::TilePlaced {
                player,
                mv,
                opening: false,
                bonuses,
                score_delta: delta,
                resulting_phase: self.phase.clone(),
            });
        }
        Ok(events)
    }

    // ==================== Draws and passes ====================

    fn apply_draw(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        if !self.legal_moves().is_empty() {
            return Err(EngineError::MustPlace);
        }
        if self.draws_this_turn >= MAX_DRAWS_PER_TURN {
            return Err(EngineError::ExhaustedPoolDraw);
        }
        let player = self.current_player;
        let tile = self.pool.pop().ok_or(EngineError::EmptyPool)?;
        self.players[player as usize].hand.push(tile);
        self.draws_this_turn += 1;

        let delta = score_event(&ScoreEvent::DrawPenalty { count: 1 });
        self.players[player as usize].add_score(delta);

        // A draw may unlock a placement for this same turn.
        self.phase = if self.legal_moves().is_empty() {
            MatchPhase::Drawing
        } else {
            MatchPhase::Playing
        };

        Ok(vec![EngineEvent::TileDrawn {
            player,
            draws_this_turn: self.draws_this_turn,
            pool_remaining: self.pool.len(),
            score_delta: delta,
            resulting_phase: self.phase.clone(),
        }])
    }

    fn apply_pass(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        if !self.legal_moves().is_empty() {
            return Err(EngineError::MustPlace);
        }
        let player = self.current_player;

        if self.draws_this_turn >= MAX_DRAWS_PER_TURN {
            // Forced pass after the maximum draws; the pool may still hold
            // tiles, so this never counts toward blockage.
            let delta = score_event(&ScoreEvent::ForcedPassAfterMaxDraws);
            self.players[player as usize].add_score(delta);
            self.turn_count += 1;
            self.advance_turn();
            return Ok(vec![EngineEvent::TurnPassed {
                player,
                forced_after_draws: true,
                consecutive_passes: self.consecutive_passes,
                score_delta: delta,
                resulting_phase: self.phase.clone(),
            }]);
        }

        if !self.pool.is_empty() {
            return Err(EngineError::MustDraw);
        }

        let delta = score_event(&ScoreEvent::PassOnEmptyPool);
        self.players[player as usize].add_score(delta);
        self.consecutive_passes += 1;
        self.turn_count += 1;

        let mut events = Vec::new();
        if self.consecutive_passes >= self.players.len() as u8 {
            // Everyone passed in a row with nothing to draw.
            let winner = self.lowest_hand_player();
            let end_events = self.finish_round(winner, RoundEndReason::Blocked);
            events.push(EngineEvent::TurnPassed {
                player,
                forced_after_draws: false,
                consecutive_passes: self.consecutive_passes,
                score_delta: delta,
                resulting_phase: self.phase.clone(),
            });
            events.extend(end_events);
        } else {
            self.advance_turn();
            events.push(EngineEvent::TurnPassed {
                player,
                forced_after_draws: false,
                consecutive_passes: self.consecutive_passes,
                score_delta: delta,
                resulting_phase: self.phase.clone(),
            });
        }
        Ok(events)
    }

    // ==================== Round and match end ====================

    /// Seat with the lowest hand value; earlier seats win ties.
    fn lowest_hand_player(&self) -> PlayerId {
        let mut winner = 0;
        for player in &self.players {
            if player.hand_value() < self.players[winner as usize].hand_value() {
                winner = player.id;
            }
        }
        winner
    }

    fn finish_round(&mut self, winner: PlayerId, reason: RoundEndReason) -> Vec<EngineEvent> {
        let opponent_hands: Vec<i32> = self
            .players
            .iter()
            .filter(|p| p.id != winner)
            .map(|p| p.hand_value())
            .collect();
        let event = match reason {
            RoundEndReason::EmptiedHand => ScoreEvent::RoundWinEmptyHand { opponent_hands },
            RoundEndReason::Blocked => ScoreEvent::RoundWinBlocked {
                own_hand: self.players[winner as usize].hand_value(),
                opponent_hands,
            },
        };
        let delta = score_event(&event);
        self.players[winner as usize].add_score(delta);

        let scores: Vec<i32> = self.players.iter().map(|p| p.score).collect();
        let mut events = Vec::new();

        if self.final_round {
            let top = scores.iter().copied().max().unwrap_or(0);
            let winners: Vec<PlayerId> = self
                .players
                .iter()
                .filter(|p| p.score == top)
                .map(|p| p.id)
                .collect();
            self.phase = MatchPhase::Finished {
                winners: winners.clone(),
            };
            events.push(EngineEvent::RoundEnded {
                round: self.round,
                winner,
                reason,
                score_delta: delta,
                scores: scores.clone(),
                resulting_phase: self.phase.clone(),
            });
            events.push(EngineEvent::MatchFinished {
                winners,
                scores,
                rounds_played: self.round,
            });
        } else {
            self.phase = if scores.iter().any(|s| *s >= self.config.target_score) {
                MatchPhase::FinalRoundPending
            } else {
                MatchPhase::RoundOver
            };
            events.push(EngineEvent::RoundEnded {
                round: self.round,
                winner,
                reason,
                score_delta: delta,
                scores,
                resulting_phase: self.phase.clone(),
            });
        }
        events
    }

    // ==================== Helpers ====================

    fn advance_turn(&mut self) {
        self.current_player = (self.current_player + 1) % self.players.len() as PlayerId;
        self.draws_this_turn = 0;
        self.phase = MatchPhase::Playing;
    }

    fn audit_board(&self) -> Result<(), EngineError> {
        self.board.check_consistency().map_err(EngineError::Invariant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellCoord;
    use crate::tile::Rotation;

    fn tile(a: u8, b: u8, c: u8) -> Tile {
        Tile::new(a, b, c).unwrap()
    }

    fn center_move(state: &MatchState, t: Tile) -> Move {
        Move {
            tile: t,
            cell: state.board.grid().center_cell(),
            rotation: Rotation::R0,
        }
    }

    /// Rig a two-player mid-round position: 0-0-0 placed at the center by
    /// player 0, player 1 to act.
    fn rigged_two_player() -> MatchState {
        let mut state = MatchState::new_match(2, 7);
        state.round = 1;
        state
            .board
            .place(center_move(&state, tile(0, 0, 0)), 0)
            .unwrap();
        state.phase = MatchPhase::Playing;
        state.current_player = 1;
        state
    }

    #[test]
    fn test_new_match_starts_in_setup() {
        let state = MatchState::new_match(4, 1);
        assert_eq!(state.phase, MatchPhase::Setup);
        assert_eq!(state.player_count(), 4);
        assert_eq!(state.round, 0);
    }

    #[test]
    fn test_begin_round_deals_official_hand_sizes() {
        for (players, expected) in [(2, 9), (3, 7), (4, 7), (5, 6), (6, 6)] {
            let mut state = MatchState::new_match(players, 11);
            state.apply(0, Action::BeginRound).unwrap();

            assert_eq!(state.phase, MatchPhase::Opening);
            assert_eq!(state.round, 1);
            for player in &state.players {
                assert_eq!(player.hand_size(), expected);
            }
            assert_eq!(
                state.pool_remaining(),
                56 - players as usize * expected
            );
        }
    }

    #[test]
    fn test_opening_exposes_only_forced_tile() {
        let mut state = MatchState::new_match(2, 3);
        state.apply(0, Action::BeginRound).unwrap();

        let moves = state.legal_moves();
        assert!(!moves.is_empty());
        let forced = moves[0].mv.tile;
        assert!(moves.iter().all(|m| m.mv.tile == forced));
        assert!(moves
            .iter()
            .all(|m| m.mv.cell == state.board.grid().center_cell()));

        // Any other tile is rejected even on the opening cell.
        let starter = state.current_player;
        let other_seat = (starter + 1) % 2;
        let wrong = state.players[other_seat as usize].hand[0];
        let err = state
            .apply(starter, Action::Place(center_move(&state, wrong)))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::IllegalMove(PlacementError::NotOpeningTile)
        );

        // The forced tile commits and scores.
        let events = state.apply(starter, Action::Place(moves[0].mv)).unwrap();
        assert!(matches!(
            events[0],
            EngineEvent::TilePlaced { opening: true, .. }
        ));
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_ne!(state.current_player, starter);
    }

    #[test]
    fn test_opening_with_triple_zero_scores_forty() {
        let mut state = MatchState::new_match(2, 5);
        state.round = 1;
        state.phase = MatchPhase::Opening;
        state.current_player = 0;
        state.opening = Some((tile(0, 0, 0), true));
        state.players[0].hand = vec![tile(0, 0, 0), tile(1, 2, 3)];
        state.players[1].hand = vec![tile(2, 3, 4)];

        let events = state
            .apply(0, Action::Place(center_move(&state, tile(0, 0, 0))))
            .unwrap();
        assert_eq!(events[0].score_delta(), 40);
        assert_eq!(state.players[0].score, 40);
    }

    #[test]
    fn test_opening_with_plain_triple_scores_value_plus_ten() {
        let mut state = MatchState::new_match(2, 5);
        state.round = 1;
        state.phase = MatchPhase::Opening;
        state.current_player = 0;
        state.opening = Some((tile(2, 2, 2), true));
        state.players[0].hand = vec![tile(2, 2, 2), tile(1, 2, 3)];
        state.players[1].hand = vec![tile(2, 3, 4)];

        let events = state
            .apply(0, Action::Place(center_move(&state, tile(2, 2, 2))))
            .unwrap();
        assert_eq!(events[0].score_delta(), 16);
    }

    #[test]
    fn test_illegal_move_leaves_state_unchanged() {
        let mut state = rigged_two_player();
        state.players[1].hand = vec![tile(3, 4, 5)];
        let hand_before = state.players[1].hand.clone();
        let score_before = state.players[1].score;
        let tiles_before = state.board.tile_count();

        let err = state
            .apply(
                1,
                Action::Place(Move {
                    tile: tile(3, 4, 5),
                    cell: CellCoord::new(4, 9),
                    rotation: Rotation::R0,
                }),
            )
            .unwrap_err();
        assert_eq!(err, EngineError::IllegalMove(PlacementError::ValueMismatch));
        assert_eq!(state.players[1].hand, hand_before);
        assert_eq!(state.players[1].score, score_before);
        assert_eq!(state.board.tile_count(), tiles_before);
        assert_eq!(state.phase, MatchPhase::Playing);
    }

    #[test]
    fn test_not_your_turn_rejected() {
        let mut state = rigged_two_player();
        state.players[0].hand = vec![tile(0, 0, 1)];
        let err = state.apply(0, Action::Draw).unwrap_err();
        assert_eq!(err, EngineError::NotYourTurn);
    }

    #[test]
    fn test_draw_rejected_while_placement_exists() {
        let mut state = rigged_two_player();
        state.players[1].hand = vec![tile(0, 0, 4)];
        assert_eq!(state.apply(1, Action::Draw).unwrap_err(), EngineError::MustPlace);
        assert_eq!(state.apply(1, Action::Pass).unwrap_err(), EngineError::MustPlace);
    }

    #[test]
    fn test_three_fruitless_draws_then_forced_pass_costs_forty() {
        let mut state = rigged_two_player();
        // Nothing in hand or pool matches two zeros on a shared edge.
        state.players[1].hand = vec![tile(3, 4, 5)];
        state.pool = vec![tile(1, 2, 3), tile(1, 2, 4), tile(1, 2, 5)];
        let score_before = state.players[1].score;

        for expected_draws in 1..=3u8 {
            let events = state.apply(1, Action::Draw).unwrap();
            assert!(matches!(
                events[0],
                EngineEvent::TileDrawn {
                    score_delta: -5,
                    ..
                }
            ));
            assert_eq!(state.draws_this_turn(), expected_draws);
            assert_eq!(state.phase, MatchPhase::Drawing);
        }

        // A fourth draw is rejected by the state machine.
        assert_eq!(
            state.apply(1, Action::Draw).unwrap_err(),
            EngineError::ExhaustedPoolDraw
        );

        let events = state.apply(1, Action::Pass).unwrap();
        assert!(matches!(
            events[0],
            EngineEvent::TurnPassed {
                forced_after_draws: true,
                score_delta: -25,
                ..
            }
        ));
        assert_eq!(state.players[1].score, score_before - 40);
        assert_eq!(state.current_player, 0);
        // Forced passes never count toward blockage.
        assert_eq!(state.consecutive_passes(), 0);
    }

    #[test]
    fn test_draw_that_unlocks_a_move_returns_to_playing() {
        let mut state = rigged_two_player();
        state.players[1].hand = vec![tile(3, 4, 5)];
        state.pool = vec![tile(0, 0, 4)];

        let events = state.apply(1, Action::Draw).unwrap();
        assert!(matches!(
            events[0],
            EngineEvent::TileDrawn {
                resulting_phase: MatchPhase::Playing,
                ..
            }
        ));
        assert!(!state.legal_moves().is_empty());
        // Still this player's turn; the draw penalty stands.
        assert_eq!(state.current_player, 1);
        assert_eq!(state.players[1].score, -5);
    }

    #[test]
    fn test_pass_requires_empty_pool_when_draws_remain() {
        let mut state = rigged_two_player();
        state.players[1].hand = vec![tile(3, 4, 5)];
        state.pool = vec![tile(1, 2, 3)];
        assert_eq!(state.apply(1, Action::Pass).unwrap_err(), EngineError::MustDraw);
    }

    #[test]
    fn test_blockage_ends_round_for_lowest_hand() {
        let mut state = rigged_two_player();
        state.current_player = 0;
        state.players[0].hand = vec![tile(5, 5, 5)]; // 15
        state.players[1].hand = vec![tile(4, 4, 5), tile(1, 4, 5)]; // 23
        state.pool.clear();

        let events = state.apply(0, Action::Pass).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(state.consecutive_passes(), 1);

        let events = state.apply(1, Action::Pass).unwrap();
        let round_end = events
            .iter()
            .find_map(|e| match e {
                EngineEvent::RoundEnded {
                    winner,
                    reason,
                    score_delta,
                    ..
                } => Some((*winner, *reason, *score_delta)),
                _ => None,
            })
            .expect("round should end by blockage");
        assert_eq!(round_end, (0, RoundEndReason::Blocked, 8));
        // Each pass cost 10; the winner then collected the difference.
        assert_eq!(state.players[0].score, -10 + 8);
        assert_eq!(state.players[1].score, -10);
        assert_eq!(state.phase, MatchPhase::RoundOver);
    }

    #[test]
    fn test_blocked_winner_tie_goes_to_earlier_seat() {
        let mut state = rigged_two_player();
        state.current_player = 0;
        // Equal hand values.
        state.players[0].hand = vec![tile(5, 5, 5)];
        state.players[1].hand = vec![tile(4, 5, 5), tile(0, 0, 1)];
        state.pool.clear();

        state.apply(0, Action::Pass).unwrap();
        let events = state.apply(1, Action::Pass).unwrap();
        let winner = events.iter().find_map(|e| match e {
            EngineEvent::RoundEnded { winner, .. } => Some(*winner),
            _ => None,
        });
        assert_eq!(winner, Some(0));
    }

    #[test]
    fn test_emptying_hand_wins_round_with_bonus() {
        let mut state = rigged_two_player();
        state.players[1].hand = vec![tile(0, 0, 4)];
        state.players[0].hand = vec![tile(1, 2, 3)]; // value 6 left over

        let mv = state.legal_moves()[0].mv;
        let events = state.apply(1, Action::Place(mv)).unwrap();

        // Placement: 4 points; round win: 25 + 6.
        assert_eq!(events[0].score_delta(), 4);
        let round_end = events
            .iter()
            .find_map(|e| match e {
                EngineEvent::RoundEnded {
                    winner,
                    reason,
                    score_delta,
                    ..
                } => Some((*winner, *reason, *score_delta)),
                _ => None,
            })
            .unwrap();
        assert_eq!(round_end, (1, RoundEndReason::EmptiedHand, 31));
        assert_eq!(state.players[1].score, 35);
        assert_eq!(state.phase, MatchPhase::RoundOver);
    }

    #[test]
    fn test_target_score_arms_exactly_one_final_round() {
        let mut state = rigged_two_player();
        // The round winner lands on 405: 370 + 4 (tile) + 25 + 6 (opponent).
        state.players[1].score = 370;
        state.players[1].hand = vec![tile(0, 0, 4)];
        state.players[0].hand = vec![tile(1, 2, 3)];

        let mv = state.legal_moves()[0].mv;
        state.apply(1, Action::Place(mv)).unwrap();
        assert_eq!(state.players[1].score, 405);
        // Crossing the target never ends the match on the spot.
        assert_eq!(state.phase, MatchPhase::FinalRoundPending);
        assert!(!state.is_finished());

        state.apply(0, Action::BeginRound).unwrap();
        assert!(state.is_final_round());
        assert_eq!(state.round, 2);

        // Rig an immediate round end inside the final round.
        state
            .board
            .place(center_move(&state, tile(0, 0, 0)), 0)
            .unwrap();
        state.opening = None;
        state.phase = MatchPhase::Playing;
        state.current_player = 0;
        state.players[0].hand = vec![tile(0, 0, 4)];
        state.players[1].hand = vec![tile(1, 2, 3)];

        let mv = state.legal_moves()[0].mv;
        let events = state.apply(0, Action::Place(mv)).unwrap();
        let finished = events
            .iter()
            .find_map(|e| match e {
                EngineEvent::MatchFinished {
                    winners,
                    rounds_played,
                    ..
                } => Some((winners.clone(), *rounds_played)),
                _ => None,
            })
            .expect("final round must finish the match");
        assert_eq!(finished.1, 2);
        assert_eq!(finished.0, vec![1]);
        assert!(state.is_finished());
    }

    #[test]
    fn test_tied_final_scores_are_reported_as_tie() {
        let mut state = rigged_two_player();
        state.final_round = true;
        state.players[0].score = 100;
        state.players[1].score = 65;
        state.players[1].hand = vec![tile(0, 0, 4)];
        state.players[0].hand = vec![tile(1, 2, 3)];

        let mv = state.legal_moves()[0].mv;
        let events = state.apply(1, Action::Place(mv)).unwrap();
        // Player 1 gains 4 + 25 + 6 = 35, landing on 100 as well.
        let winners = events
            .iter()
            .find_map(|e| match e {
                EngineEvent::MatchFinished { winners, .. } => Some(winners.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(winners, vec![0, 1]);
        assert_eq!(state.winners(), Some(&[0, 1][..]));
    }

    #[test]
    fn test_finished_match_rejects_actions() {
        let mut state = rigged_two_player();
        state.phase = MatchPhase::Finished { winners: vec![0] };
        assert_eq!(
            state.apply(0, Action::BeginRound).unwrap_err(),
            EngineError::MatchOver
        );
    }
}
