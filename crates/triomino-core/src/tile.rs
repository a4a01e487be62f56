//! Triomino tiles and the 56-tile catalog.
//!
//! This module provides the foundational tile types:
//! - `Tile`: a triangular piece with three corner values in 0-5
//! - `Rotation`: one of the three cyclic orientations a tile can be played in
//! - `TileError`: rejection of tiles and rotations outside the catalog
//!
//! Tiles are stored in canonical non-decreasing order; rotation is a view
//! applied at placement time, never a mutation. Only cyclic rotations exist,
//! so mirrored corner sequences are unrepresentable and the catalog contains
//! exactly one tile per unordered value triple.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Highest corner value on any tile.
pub const MAX_TILE_VALUE: u8 = 5;

/// Number of tiles in the full catalog.
pub const CATALOG_SIZE: usize = 56;

/// Errors raised when constructing a tile or rotation outside the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TileError {
    #[error("corner value {0} is outside 0-5")]
    ValueOutOfRange(u8),

    #[error("rotation index {0} is outside 0-2")]
    RotationOutOfRange(u8),
}

/// One of the three cyclic orientations of a tile.
///
/// Each step is 120 degrees clockwise. There is no mirroring step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Rotation {
    #[default]
    R0,
    R1,
    R2,
}

impl Rotation {
    /// All rotations in step order.
    pub const ALL: [Rotation; 3] = [Rotation::R0, Rotation::R1, Rotation::R2];

    /// Build a rotation from a raw step count.
    pub fn from_index(index: u8) -> Result<Self, TileError> {
        match index {
            0 => Ok(Rotation::R0),
            1 => Ok(Rotation::R1),
            2 => Ok(Rotation::R2),
            other => Err(TileError::RotationOutOfRange(other)),
        }
    }

    /// Number of 120-degree clockwise steps.
    pub const fn index(self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R1 => 1,
            Rotation::R2 => 2,
        }
    }

    /// The rotation that undoes this one.
    pub const fn inverse(self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R0,
            Rotation::R1 => Rotation::R2,
            Rotation::R2 => Rotation::R1,
        }
    }
}

/// A triangular tile with three corner values read clockwise.
///
/// Values are normalized to non-decreasing order at construction, so two
/// tiles compare equal exactly when they are the same physical piece.
/// `rotated` produces the corner sequence actually shown on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tile([u8; 3]);

impl Tile {
    /// Create a tile from three corner values given in any order.
    pub fn new(a: u8, b: u8, c: u8) -> Result<Self, TileError> {
        for value in [a, b, c] {
            if value > MAX_TILE_VALUE {
                return Err(TileError::ValueOutOfRange(value));
            }
        }
        let mut values = [a, b, c];
        values.sort_unstable();
        Ok(Self(values))
    }

    /// Canonical corner values (non-decreasing).
    pub const fn values(self) -> [u8; 3] {
        self.0
    }

    /// Corner values after rotating clockwise by `rotation`.
    ///
    /// Rotating by `r` then by `r.inverse()` restores the canonical sequence.
    pub fn rotated(self, rotation: Rotation) -> [u8; 3] {
        let [a, b, c] = self.0;
        match rotation {
            Rotation::R0 => [a, b, c],
            Rotation::R1 => [b, c, a],
            Rotation::R2 => [c, a, b],
        }
    }

    /// The three cyclic orientations of the corner sequence.
    pub fn rotations(self) -> [[u8; 3]; 3] {
        Rotation::ALL.map(|r| self.rotated(r))
    }

    /// Sum of the three corner values; the base score when placed.
    pub fn value(self) -> i32 {
        self.0.iter().map(|&v| i32::from(v)).sum()
    }

    /// All three corners equal.
    pub fn is_triple(self) -> bool {
        self.0[0] == self.0[2]
    }

    /// The 0-0-0 tile, which carries its own opening bonus.
    pub fn is_triple_zero(self) -> bool {
        self.0 == [0, 0, 0]
    }

    /// Exactly two corners equal.
    pub fn is_double(self) -> bool {
        !self.is_triple() && (self.0[0] == self.0[1] || self.0[1] == self.0[2])
    }

    /// The complete 56-tile catalog in deterministic order.
    ///
    /// Every non-decreasing triple over 0-5 appears exactly once: 6 triples,
    /// 15 doubles and 35 fully-distinct tiles.
    pub fn full_set() -> Vec<Tile> {
        let mut set = Vec::with_capacity(CATALOG_SIZE);
        for a in 0..=MAX_TILE_VALUE {
            for b in a..=MAX_TILE_VALUE {
                for c in b..=MAX_TILE_VALUE {
                    set.push(Tile([a, b, c]));
                }
            }
        }
        debug_assert_eq!(set.len(), CATALOG_SIZE);
        set
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.0[0], self.0[1], self.0[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_composition() {
        let set = Tile::full_set();
        assert_eq!(set.len(), CATALOG_SIZE);

        let unique: HashSet<_> = set.iter().collect();
        assert_eq!(unique.len(), CATALOG_SIZE);

        let triples = set.iter().filter(|t| t.is_triple()).count();
        let doubles = set.iter().filter(|t| t.is_double()).count();
        let distinct = set
            .iter()
            .filter(|t| !t.is_triple() && !t.is_double())
            .count();

        assert_eq!(triples, 6);
        assert_eq!(doubles, 15);
        assert_eq!(distinct, 35);
    }

    #[test]
    fn test_construction_normalizes_order() {
        let a = Tile::new(3, 1, 2).unwrap();
        let b = Tile::new(1, 2, 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.values(), [1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(Tile::new(0, 6, 1), Err(TileError::ValueOutOfRange(6)));
        assert_eq!(Rotation::from_index(3), Err(TileError::RotationOutOfRange(3)));
    }

    #[test]
    fn test_rotation_round_trip() {
        for tile in Tile::full_set() {
            for rotation in Rotation::ALL {
                let turned = tile.rotated(rotation);
                let back = rotation.inverse().index() as usize;
                // Cycling the turned sequence by the inverse restores it.
                let restored = [turned[back % 3], turned[(back + 1) % 3], turned[(back + 2) % 3]];
                assert_eq!(restored, tile.values(), "{tile} under {rotation:?}");
            }
        }
    }

    #[test]
    fn test_no_mirrored_rotation() {
        // For a fully-distinct tile a < b < c, the reversed reading order
        // never appears among the cyclic rotations.
        let tile = Tile::new(1, 3, 5).unwrap();
        let mirrored = [1, 5, 3];
        for rotation in tile.rotations() {
            assert_ne!(rotation, mirrored);
        }
    }

    #[test]
    fn test_tile_kind_queries() {
        assert!(Tile::new(4, 4, 4).unwrap().is_triple());
        assert!(Tile::new(0, 0, 0).unwrap().is_triple_zero());
        assert!(!Tile::new(4, 4, 4).unwrap().is_triple_zero());
        assert!(Tile::new(2, 2, 5).unwrap().is_double());
        assert!(!Tile::new(1, 2, 3).unwrap().is_double());
    }

    #[test]
    fn test_value_sums_corners() {
        assert_eq!(Tile::new(2, 2, 2).unwrap().value(), 6);
        assert_eq!(Tile::new(3, 4, 5).unwrap().value(), 12);
        assert_eq!(Tile::new(0, 0, 0).unwrap().value(), 0);
    }
}
