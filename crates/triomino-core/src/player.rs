//! Player state: identity, hand and cumulative score.

use crate::board::PlayerId;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// A seated player.
///
/// The hand is private information; cross-player scoring reads it only
/// through round-end snapshots taken by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Tile>,
    /// Cumulative across rounds; penalties may push it negative.
    pub score: i32,
}

impl Player {
    /// Create a player with an empty hand.
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            hand: Vec::new(),
            score: 0,
        }
    }

    /// Sum of the values of all held tiles.
    pub fn hand_value(&self) -> i32 {
        self.hand.iter().map(|t| t.value()).sum()
    }

    /// Number of held tiles.
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    /// No tiles left - the round-winning condition.
    pub fn hand_is_empty(&self) -> bool {
        self.hand.is_empty()
    }

    /// Whether the hand holds a specific tile.
    pub fn has_tile(&self, tile: Tile) -> bool {
        self.hand.contains(&tile)
    }

    /// Remove a tile from the hand, returning it if present.
    pub fn remove_tile(&mut self, tile: Tile) -> Option<Tile> {
        let index = self.hand.iter().position(|t| *t == tile)?;
        Some(self.hand.remove(index))
    }

    /// The highest-value triple in hand, if any.
    pub fn highest_triple(&self) -> Option<Tile> {
        self.hand
            .iter()
            .filter(|t| t.is_triple())
            .max_by_key(|t| t.value())
            .copied()
    }

    /// The highest-value tile in hand, if any.
    ///
    /// Earlier-drawn tiles win value ties so the choice stays deterministic.
    pub fn highest_tile(&self) -> Option<Tile> {
        let mut best: Option<Tile> = None;
        for &tile in &self.hand {
            if best.map_or(true, |b| tile.value() > b.value()) {
                best = Some(tile);
            }
        }
        best
    }

    /// Apply a score delta (negative for penalties).
    pub fn add_score(&mut self, delta: i32) {
        self.score += delta;
    }

    /// Clear the hand for a new round; the score persists.
    pub fn reset_for_round(&mut self) {
        self.hand.clear();
    }
}

/// Pick the round's opener.
///
/// The holder of the highest triple opens (and earns the triple-open bonus);
/// with no triples dealt, the holder of the highest-value tile opens without
/// a bonus. Ties go to the earliest seat.
pub fn opening_holder(players: &[Player]) -> (PlayerId, Tile, bool) {
    let mut best: Option<(PlayerId, Tile)> = None;
    for player in players {
        if let Some(triple) = player.highest_triple() {
            if best.map_or(true, |(_, b)| triple.value() > b.value()) {
                best = Some((player.id, triple));
            }
        }
    }
    if let Some((id, tile)) = best {
        return (id, tile, true);
    }

    let mut best: Option<(PlayerId, Tile)> = None;
    for player in players {
        if let Some(tile) = player.highest_tile() {
            if best.map_or(true, |(_, b)| tile.value() > b.value()) {
                best = Some((player.id, tile));
            }
        }
    }
    let (id, tile) = best.expect("players hold dealt hands");
    (id, tile, false)
}
