//! Automated move selection.
//!
//! Strategies are a closed set of variants behind a single decision
//! function, chosen at match-configuration time. A strategy only ever sees
//! the legal move set, the board, its own hand and the opponents' public
//! standings; it holds no board-mutating privilege, and the engine never
//! consults it with an empty legal set.

use crate::actions::{Move, ScoredMove};
use crate::board::Board;
use crate::game::PlayerStanding;
use crate::tile::Tile;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Maximize immediate points, bonuses included.
    Greedy,
    /// Greedy shaped toward shedding hard-to-place extreme tiles.
    Balanced,
    /// Take bonuses, otherwise hold high tiles back.
    Defensive,
    /// Uniform over the legal set.
    Random,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(StrategyKind::Greedy),
            "balanced" => Ok(StrategyKind::Balanced),
            "defensive" => Ok(StrategyKind::Defensive),
            "random" => Ok(StrategyKind::Random),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// A strategy instance with its own random state.
pub struct Strategy {
    pub kind: StrategyKind,
    rng: StdRng,
}

impl Strategy {
    /// Create a strategy seeded from entropy.
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a strategy with a deterministic seed for reproducible runs.
    pub fn with_seed(kind: StrategyKind, seed: u64) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick one element of `legal`.
    ///
    /// Returns `None` only when `legal` is empty, which the engine never
    /// passes; drawing and passing are the engine's business, not the
    /// strategy's.
    pub fn choose(
        &mut self,
        legal: &[ScoredMove],
        board: &Board,
        hand: &[Tile],
        opponents: &[PlayerStanding],
    ) -> Option<Move> {
        if legal.is_empty() {
            return None;
        }
        let _ = (board, hand, opponents);
        match self.kind {
            StrategyKind::Greedy => Self::best_by(legal, |m| m.total_points()),
            StrategyKind::Balanced => Self::best_by(legal, Self::balanced_weight),
            StrategyKind::Defensive => Self::choose_defensive(legal),
            StrategyKind::Random => legal.choose(&mut self.rng).map(|m| m.mv),
        }
    }

    /// Highest score wins; earlier entries win ties so seeded replays hold.
    fn best_by(legal: &[ScoredMove], score: impl Fn(&ScoredMove) -> i32) -> Option<Move> {
        let mut best: Option<(&ScoredMove, i32)> = None;
        for candidate in legal {
            let value = score(candidate);
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((candidate, value));
            }
        }
        best.map(|(m, _)| m.mv)
    }

    /// Immediate points plus shaping: extreme-value tiles are harder to
    /// place later, and formation moves are worth chasing.
    fn balanced_weight(mv: &ScoredMove) -> i32 {
        let mut weight = mv.total_points();
        if mv.base_points >= 12 {
            weight += 3;
        } else if mv.base_points <= 3 {
            weight += 2;
        }
        if mv.bonuses.contains(&crate::score::Bonus::Hexagon) {
            weight += 10;
        } else if mv.bonuses.contains(&crate::score::Bonus::Bridge) {
            weight += 5;
        }
        weight
    }

    /// Bonuses first; among equals, spend the cheapest tile.
    fn choose_defensive(legal: &[ScoredMove]) -> Option<Move> {
        let mut best: Option<&ScoredMove> = None;
        for candidate in legal {
            let better = match best {
                None => true,
                Some(current) => {
                    candidate.bonus_points() > current.bonus_points()
                        || (candidate.bonus_points() == current.bonus_points()
                            && candidate.base_points < current.base_points)
                }
            };
            if better {
                best = Some(candidate);
            }
        }
        best.map(|m| m.mv)
    }
}
