//! Actions submitted to the engine and the events it emits.
//!
//! Every committed action produces one or more [`EngineEvent`] records
//! carrying the acting player, the move payload, the bonuses triggered, the
//! score delta and the phase the match landed in - enough for rendering,
//! logging or training-signal extraction without re-deriving game logic.

use crate::board::PlayerId;
use crate::game::MatchPhase;
use crate::grid::CellCoord;
use crate::score::Bonus;
use crate::tile::{Rotation, Tile};
use serde::{Deserialize, Serialize};

/// A tile placement: which tile, where, and under which rotation.
///
/// The rotation is part of the committed move; the same tile may be legal
/// under one rotation and illegal under another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub tile: Tile,
    pub cell: CellCoord,
    pub rotation: Rotation,
}

/// A legal move together with its pre-commit scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub mv: Move,
    /// Sum of the tile's corner values.
    pub base_points: i32,
    /// Bonuses this placement would trigger.
    pub bonuses: Vec<Bonus>,
}

impl ScoredMove {
    /// Points from bonuses alone.
    pub fn bonus_points(&self) -> i32 {
        self.bonuses.iter().map(|b| b.points()).sum()
    }

    /// Base points plus bonuses.
    pub fn total_points(&self) -> i32 {
        self.base_points + self.bonus_points()
    }
}

/// All actions a caller can submit to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Deal a fresh round: shuffle the pool, deal hands, pick the opener.
    BeginRound,
    /// Place a tile from the current legal set.
    Place(Move),
    /// Draw one tile from the pool (only when no legal move exists).
    Draw,
    /// Pass the turn (only when no legal move exists and drawing is spent).
    Pass,
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    /// A player placed their last tile.
    EmptiedHand,
    /// Every player passed consecutively with an empty pool.
    Blocked,
}

/// Audit records emitted by the engine after each committed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A round was dealt and the opener determined.
    RoundStarted {
        round: u32,
        starter: PlayerId,
        tiles_per_player: usize,
        pool_remaining: usize,
        final_round: bool,
    },

    /// A tile was placed and scored.
    TilePlaced {
        player: PlayerId,
        mv: Move,
        opening: bool,
        bonuses: Vec<Bonus>,
        score_delta: i32,
        resulting_phase: MatchPhase,
    },

    /// A tile was drawn from the pool (the tile itself stays hidden).
    TileDrawn {
        player: PlayerId,
        draws_this_turn: u8,
        pool_remaining: usize,
        score_delta: i32,
        resulting_phase: MatchPhase,
    },

    /// The turn passed, either forced after maximum draws or on an empty pool.
    TurnPassed {
        player: PlayerId,
        forced_after_draws: bool,
        consecutive_passes: u8,
        score_delta: i32,
        resulting_phase: MatchPhase,
    },

    /// The round ended and the win bonus was applied.
    RoundEnded {
        round: u32,
        winner: PlayerId,
        reason: RoundEndReason,
        score_delta: i32,
        scores: Vec<i32>,
        resulting_phase: MatchPhase,
    },

    /// The match ended; ties are reported, never broken.
    MatchFinished {
        winners: Vec<PlayerId>,
        scores: Vec<i32>,
        rounds_played: u32,
    },
}

impl EngineEvent {
    /// The score delta carried by this event, if it scored anything.
    pub fn score_delta(&self) -> i32 {
        match self {
            EngineEvent::TilePlaced { score_delta, .. }
            | EngineEvent::TileDrawn { score_delta, .. }
            | EngineEvent::TurnPassed { score_delta, .. }
            | EngineEvent::RoundEnded { score_delta, .. } => *score_delta,
            EngineEvent::RoundStarted { .. } | EngineEvent::MatchFinished { .. } => 0,
        }
    }
}
