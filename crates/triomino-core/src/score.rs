//! Scoring rules: a pure mapping from game events to point deltas.
//!
//! All constants follow the official rulebook and are fixed at compile time.
//! Cumulative scores are never clamped; penalties can push a player negative.

use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Bonus for opening the round with a triple.
pub const OPENING_TRIPLE_BONUS: i32 = 10;

/// Total awarded for opening with the 0-0-0 tile (special 30 + the triple 10).
pub const OPENING_TRIPLE_ZERO_BONUS: i32 = 40;

/// Bonus for each completed hexagon ring.
pub const HEXAGON_BONUS: i32 = 50;

/// Bonus for each bridge formed.
pub const BRIDGE_BONUS: i32 = 40;

/// Penalty per tile drawn from the pool.
pub const DRAW_PENALTY: i32 = -5;

/// Extra penalty when a player still cannot play after the maximum draws.
pub const FAILED_DRAWS_PENALTY: i32 = -25;

/// Penalty for passing with an empty pool.
pub const EMPTY_POOL_PASS_PENALTY: i32 = -10;

/// Bonus for winning a round by emptying the hand.
pub const ROUND_WIN_BONUS: i32 = 25;

/// Maximum tiles a player may draw in a single turn.
pub const MAX_DRAWS_PER_TURN: u8 = 3;

/// Cumulative score that arms the final round.
pub const TARGET_SCORE: i32 = 400;

/// A bonus attached to a placement, detected before commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bonus {
    /// Opened the round with a non-zero triple.
    OpeningTriple,
    /// Opened the round with 0-0-0.
    OpeningTripleZero,
    /// Closed a six-cell ring around a vertex.
    Hexagon,
    /// Matched a full edge plus the far corner of the opposite cell.
    Bridge,
}

impl Bonus {
    /// Points awarded for this bonus.
    pub const fn points(self) -> i32 {
        match self {
            Bonus::OpeningTriple => OPENING_TRIPLE_BONUS,
            Bonus::OpeningTripleZero => OPENING_TRIPLE_ZERO_BONUS,
            Bonus::Hexagon => HEXAGON_BONUS,
            Bonus::Bridge => BRIDGE_BONUS,
        }
    }
}

/// A scorable game event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEvent {
    /// A tile was placed, with any bonuses it triggered.
    Place { tile: Tile, bonuses: Vec<Bonus> },
    /// One or more tiles were drawn from the pool this turn.
    DrawPenalty { count: u8 },
    /// Still unable to play after the maximum draws.
    ForcedPassAfterMaxDraws,
    /// Passed with an empty pool.
    PassOnEmptyPool,
    /// Won the round by emptying the hand; opponents' remaining hand values.
    RoundWinEmptyHand { opponent_hands: Vec<i32> },
    /// Won a blocked round with the lowest hand value.
    RoundWinBlocked {
        own_hand: i32,
        opponent_hands: Vec<i32>,
    },
}

/// Map an event to its point delta.
///
/// Pure and deterministic: the same event always yields the same delta.
pub fn score_event(event: &ScoreEvent) -> i32 {
    match event {
        ScoreEvent::Place { tile, bonuses } => {
            tile.value() + bonuses.iter().map(|b| b.points()).sum::<i32>()
        }
        ScoreEvent::DrawPenalty { count } => {
            debug_assert!(*count <= MAX_DRAWS_PER_TURN);
            DRAW_PENALTY * i32::from(*count)
        }
        ScoreEvent::ForcedPassAfterMaxDraws => FAILED_DRAWS_PENALTY,
        ScoreEvent::PassOnEmptyPool => EMPTY_POOL_PASS_PENALTY,
        ScoreEvent::RoundWinEmptyHand { opponent_hands } => {
            ROUND_WIN_BONUS + opponent_hands.iter().sum::<i32>()
        }
        ScoreEvent::RoundWinBlocked {
            own_hand,
            opponent_hands,
        } => opponent_hands.iter().map(|opp| opp - own_hand).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(a: u8, b: u8, c: u8) -> Tile {
        Tile::new(a, b, c).unwrap()
    }

    #[test]
    fn test_plain_placement_scores_tile_value() {
        let event = ScoreEvent::Place {
            tile: tile(1, 4, 5),
            bonuses: vec![],
        };
        assert_eq!(score_event(&event), 10);
    }

    #[test]
    fn test_triple_opening_scores_sixteen() {
        let event = ScoreEvent::Place {
            tile: tile(2, 2, 2),
            bonuses: vec![Bonus::OpeningTriple],
        };
        assert_eq!(score_event(&event), 16);
    }

    #[test]
    fn test_triple_zero_opening_scores_forty() {
        let event = ScoreEvent::Place {
            tile: tile(0, 0, 0),
            bonuses: vec![Bonus::OpeningTripleZero],
        };
        assert_eq!(score_event(&event), 40);
    }

    #[test]
    fn test_each_formation_bonus_counts() {
        let event = ScoreEvent::Place {
            tile: tile(1, 2, 3),
            bonuses: vec![Bonus::Hexagon, Bonus::Hexagon, Bonus::Bridge],
        };
        assert_eq!(score_event(&event), 6 + 50 + 50 + 40);
    }

    #[test]
    fn test_draw_turn_totals_minus_forty() {
        // Three fruitless draws followed by the forced pass.
        let draws = score_event(&ScoreEvent::DrawPenalty { count: 3 });
        let forced = score_event(&ScoreEvent::ForcedPassAfterMaxDraws);
        assert_eq!(draws + forced, -40);
    }

    #[test]
    fn test_pass_penalty() {
        assert_eq!(score_event(&ScoreEvent::PassOnEmptyPool), -10);
    }

    #[test]
    fn test_empty_hand_win_adds_opponent_values() {
        let event = ScoreEvent::RoundWinEmptyHand {
            opponent_hands: vec![12, 7],
        };
        assert_eq!(score_event(&event), 25 + 19);
    }

    #[test]
    fn test_blocked_win_sums_differences() {
        let event = ScoreEvent::RoundWinBlocked {
            own_hand: 15,
            opponent_hands: vec![23, 27],
        };
        assert_eq!(score_event(&event), 20);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let event = ScoreEvent::Place {
            tile: tile(3, 4, 5),
            bonuses: vec![Bonus::Bridge],
        };
        assert_eq!(score_event(&event), score_event(&event));
    }
}
