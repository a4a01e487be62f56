//! Board state: tile occupancy, placement validation and bonus detection.
//!
//! Validation operates on the immutable board; [`Board::place`] is the only
//! mutation and re-checks the move before touching the map, so an illegal
//! move can never leave the board partially updated.

use crate::actions::{Move, ScoredMove};
use crate::grid::{CellCoord, EdgeSlot, Grid, VertexCoord};
use crate::score::Bonus;
use crate::tile::{Rotation, Tile};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Player identifier (seat index).
pub type PlayerId = u8;

/// Why a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("target cell is outside the grid")]
    OffGrid,

    #[error("target cell is already occupied")]
    Occupied,

    #[error("target cell does not share an edge with any placed tile")]
    Disconnected,

    #[error("the first tile must be placed on the opening cell")]
    NotOpeningCell,

    #[error("a corner value conflicts with an already placed tile")]
    ValueMismatch,

    #[error("tile is not in the acting player's hand")]
    TileNotInHand,

    #[error("move does not play the round's forced opening tile")]
    NotOpeningTile,
}

/// A tile committed to the board.
///
/// The rotation is frozen at commit time; later queries of the tile's corner
/// values always reflect the placement, never the canonical ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub tile: Tile,
    pub rotation: Rotation,
    pub player: PlayerId,
    /// Zero-based index of this placement within the round.
    pub move_index: u32,
}

impl PlacedTile {
    /// Corner values as shown on the board, in slot order.
    pub fn corner_values(&self) -> [u8; 3] {
        self.tile.rotated(self.rotation)
    }
}

/// The playing surface for one round.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    cells: HashMap<CellCoord, PlacedTile>,
    move_count: u32,
}

impl Board {
    /// Create an empty board over the given grid.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: HashMap::new(),
            move_count: 0,
        }
    }

    /// The immutable geometry.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// True before the opening tile is placed.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of placed tiles.
    pub fn tile_count(&self) -> usize {
        self.cells.len()
    }

    /// The placed tile at a cell, if any.
    pub fn tile_at(&self, cell: CellCoord) -> Option<&PlacedTile> {
        self.cells.get(&cell)
    }

    /// Whether a cell holds a tile.
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// The value some placed tile shows at `vertex`, if any tile touches it.
    ///
    /// All placed tiles agree at shared vertices (board invariant), so the
    /// first incident tile found settles the value.
    fn corner_value_at(&self, vertex: VertexCoord) -> Option<u8> {
        vertex.surrounding_cells().iter().find_map(|cell| {
            let placed = self.cells.get(cell)?;
            let slot = cell.corners().iter().position(|v| *v == vertex)?;
            Some(placed.corner_values()[slot])
        })
    }

    /// Per-corner value constraints imposed on `cell` by its surroundings.
    fn corner_constraints(&self, cell: CellCoord) -> [Option<u8>; 3] {
        cell.corners().map(|vertex| self.corner_value_at(vertex))
    }

    fn has_occupied_neighbor(&self, cell: CellCoord) -> bool {
        self.grid
            .neighbors(cell)
            .iter()
            .flatten()
            .any(|n| self.cells.contains_key(n))
    }

    /// Check a single placement against the edge and vertex rules.
    ///
    /// Legality is binary per rotation: every corner of the rotated tile
    /// must equal the value each already-placed tile shows at that corner.
    /// This covers both endpoints of every shared edge and any tile touching
    /// the cell only through a vertex.
    pub fn check_placement(
        &self,
        tile: Tile,
        cell: CellCoord,
        rotation: Rotation,
    ) -> Result<(), PlacementError> {
        if !self.grid.contains(cell) {
            return Err(PlacementError::OffGrid);
        }
        if self.cells.contains_key(&cell) {
            return Err(PlacementError::Occupied);
        }
        if self.is_empty() {
            if cell != self.grid.center_cell() {
                return Err(PlacementError::NotOpeningCell);
            }
            return Ok(());
        }
        if !self.has_occupied_neighbor(cell) {
            return Err(PlacementError::Disconnected);
        }

        let values = tile.rotated(rotation);
        let constraints = self.corner_constraints(cell);
        for (slot, constraint) in constraints.iter().enumerate() {
            if let Some(required) = constraint {
                if *required != values[slot] {
                    return Err(PlacementError::ValueMismatch);
                }
            }
        }
        Ok(())
    }

    /// Bonuses a legal placement at `cell` would trigger, before commit.
    ///
    /// Hexagons: one bonus per corner whose full ring becomes occupied with
    /// this placement (a move closing two rings earns two bonuses).
    /// Bridges: one bonus per edge that both matches an occupied neighbor
    /// and finds the cell across the opposite corner occupied.
    pub fn bonuses_for(&self, cell: CellCoord) -> Vec<Bonus> {
        let mut bonuses = Vec::new();

        for vertex in cell.corners() {
            if let Some(ring) = self.grid.hexagon_ring(vertex) {
                let closed = ring
                    .iter()
                    .all(|c| *c == cell || self.cells.contains_key(c));
                if closed {
                    bonuses.push(Bonus::Hexagon);
                }
            }
        }

        for slot in EdgeSlot::ALL {
            let Some(neighbor) = self.grid.neighbors(cell)[slot.index()] else {
                continue;
            };
            if !self.cells.contains_key(&neighbor) {
                continue;
            }
            if let Some(far) = self.grid.bridge_cell(cell, slot) {
                if self.cells.contains_key(&far) {
                    bonuses.push(Bonus::Bridge);
                }
            }
        }

        bonuses
    }

    /// All legal moves for a hand, with pre-commit scoring.
    ///
    /// Candidate cells are the empty cells sharing an edge with a placed
    /// tile; every legal rotation of every hand tile is exposed, leaving
    /// tie-breaking entirely to the caller. On an empty board the opening
    /// cell is the only candidate (the turn engine further restricts the
    /// opening to the forced tile).
    pub fn legal_moves(&self, hand: &[Tile]) -> Vec<ScoredMove> {
        let mut moves = Vec::new();

        // BTreeSet keeps candidate order deterministic for seeded replays.
        let candidates: BTreeSet<CellCoord> = if self.is_empty() {
            [self.grid.center_cell()].into()
        } else {
            self.cells
                .keys()
                .flat_map(|cell| self.grid.neighbors(*cell).into_iter().flatten())
                .filter(|cell| !self.cells.contains_key(cell))
                .collect()
        };

        for cell in candidates {
            let bonuses = self.bonuses_for(cell);
            for &tile in hand {
                for rotation in Rotation::ALL {
                    if self.check_placement(tile, cell, rotation).is_ok() {
                        moves.push(ScoredMove {
                            mv: Move {
                                tile,
                                cell,
                                rotation,
                            },
                            base_points: tile.value(),
                            bonuses: bonuses.clone(),
                        });
                    }
                }
            }
        }

        moves
    }

    /// Commit a move for `player`.
    ///
    /// Re-validates against the immutable state first; on success returns
    /// the bonuses the placement triggered. The map is only touched after
    /// validation passes.
    pub fn place(&mut self, mv: Move, player: PlayerId) -> Result<Vec<Bonus>, PlacementError> {
        self.check_placement(mv.tile, mv.cell, mv.rotation)?;
        let bonuses = self.bonuses_for(mv.cell);

        self.cells.insert(
            mv.cell,
            PlacedTile {
                tile: mv.tile,
                rotation: mv.rotation,
                player,
                move_index: self.move_count,
            },
        );
        self.move_count += 1;
        Ok(bonuses)
    }

    /// Audit the corner-agreement invariant across the whole board.
    ///
    /// Returns a description of the first conflict found. A failure means an
    /// internal defect, not a game event; the engine refuses to continue on
    /// a corrupted board.
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut seen: HashMap<VertexCoord, u8> = HashMap::new();
        for (cell, placed) in &self.cells {
            let values = placed.corner_values();
            for (slot, vertex) in cell.corners().into_iter().enumerate() {
                match seen.get(&vertex) {
                    Some(&value) if value != values[slot] => {
                        return Err(format!(
                            "corner conflict at ({}, {}): {} vs {}",
                            vertex.x, vertex.y, value, values[slot]
                        ));
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(vertex, values[slot]);
                    }
                }
            }
        }
        Ok(())
    }
}
