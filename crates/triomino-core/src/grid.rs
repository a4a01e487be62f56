//! Triangular grid topology.
//!
//! This module provides the board geometry, independent of any placed tiles:
//! - `CellCoord`: (row, col) cell addresses; orientation follows parity
//! - `VertexCoord`: exact lattice coordinates for tile corners
//! - `EdgeSlot`: the three edges of a cell
//! - `Grid`: finite geometry with cached edge adjacency, hexagon rings and
//!   bridge cells
//!
//! Cells alternate up (row+col even) and down (row+col odd) along each row.
//! Corner coordinates use a doubled x-axis so every corner is an exact
//! integer point: the corners of up cell (r, c) are (c+1, r), (c+2, r+1) and
//! (c, r+1); the corners of down cell (r, c) are (c+1, r+1), (c, r) and
//! (c+2, r). Every lattice point with odd coordinate sum is the meeting
//! point of up to six cells - the ring inspected for the hexagon bonus.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which way a cell's triangle points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellOrientation {
    /// Apex at the top, horizontal edge at the bottom.
    Up,
    /// Apex at the bottom, horizontal edge at the top.
    Down,
}

/// The three edges of a cell.
///
/// `Across` is the horizontal edge: the bottom of an up cell, the top of a
/// down cell. `Left` and `Right` are the slanted sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSlot {
    Left,
    Across,
    Right,
}

impl EdgeSlot {
    /// All edge slots, in the order used for cached adjacency.
    pub const ALL: [EdgeSlot; 3] = [EdgeSlot::Left, EdgeSlot::Across, EdgeSlot::Right];

    /// Position of this slot in per-cell adjacency arrays.
    pub const fn index(self) -> usize {
        match self {
            EdgeSlot::Left => 0,
            EdgeSlot::Across => 1,
            EdgeSlot::Right => 2,
        }
    }
}

/// Address of one triangular cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: i16,
    pub col: i16,
}

impl CellCoord {
    /// Create a cell address.
    pub const fn new(row: i16, col: i16) -> Self {
        Self { row, col }
    }

    /// Orientation from coordinate parity.
    pub fn orientation(self) -> CellOrientation {
        if self.is_up() {
            CellOrientation::Up
        } else {
            CellOrientation::Down
        }
    }

    /// True for up-pointing cells (row + col even).
    pub const fn is_up(self) -> bool {
        (self.row + self.col) % 2 == 0
    }

    /// The cell across the given edge, ignoring grid bounds.
    pub fn neighbor(self, slot: EdgeSlot) -> CellCoord {
        match slot {
            EdgeSlot::Left => CellCoord::new(self.row, self.col - 1),
            EdgeSlot::Right => CellCoord::new(self.row, self.col + 1),
            EdgeSlot::Across => {
                if self.is_up() {
                    CellCoord::new(self.row + 1, self.col)
                } else {
                    CellCoord::new(self.row - 1, self.col)
                }
            }
        }
    }

    /// Corner lattice points in clockwise slot order.
    ///
    /// Slot 0 is the apex (top corner of an up cell, bottom corner of a down
    /// cell); rotated tile values map onto these slots one-to-one.
    pub fn corners(self) -> [VertexCoord; 3] {
        let (r, c) = (self.row, self.col);
        if self.is_up() {
            [
                VertexCoord::new(c + 1, r),     // apex
                VertexCoord::new(c + 2, r + 1), // bottom-right
                VertexCoord::new(c, r + 1),     // bottom-left
            ]
        } else {
            [
                VertexCoord::new(c + 1, r + 1), // bottom apex
                VertexCoord::new(c, r),         // top-left
                VertexCoord::new(c + 2, r),     // top-right
            ]
        }
    }

    /// The corner not touching the given edge.
    pub fn corner_opposite(self, slot: EdgeSlot) -> VertexCoord {
        let [apex, c1, c2] = self.corners();
        match slot {
            // The apex sits opposite the horizontal edge; the slanted edges
            // each leave out one base corner.
            EdgeSlot::Across => apex,
            EdgeSlot::Left => {
                if self.is_up() {
                    c1 // bottom-right
                } else {
                    c2 // top-right
                }
            }
            EdgeSlot::Right => {
                if self.is_up() {
                    c2 // bottom-left
                } else {
                    c1 // top-left
                }
            }
        }
    }
}

/// Corner lattice point shared by up to six cells.
///
/// The x axis is doubled relative to cell columns so both cell orientations
/// get integer corners; every valid vertex satisfies `(x + y)` odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexCoord {
    pub x: i16,
    pub y: i16,
}

impl VertexCoord {
    /// Create a vertex coordinate.
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// The six cells meeting at this vertex, ignoring grid bounds.
    ///
    /// Three cells from the row above the vertex, three from the row below.
    pub fn surrounding_cells(self) -> [CellCoord; 6] {
        let (x, y) = (self.x, self.y);
        [
            CellCoord::new(y - 1, x - 2),
            CellCoord::new(y - 1, x - 1),
            CellCoord::new(y - 1, x),
            CellCoord::new(y, x),
            CellCoord::new(y, x - 1),
            CellCoord::new(y, x - 2),
        ]
    }
}

/// Finite board geometry.
///
/// Built once per round; the per-cell edge adjacency is computed at
/// construction and never changes (the geometry is immutable, only tile
/// occupancy evolves - and that lives on [`crate::board::Board`]).
#[derive(Debug, Clone)]
pub struct Grid {
    rows: i16,
    cols: i16,
    adjacency: HashMap<CellCoord, [Option<CellCoord>; 3]>,
}

impl Grid {
    /// Build a grid of `rows` x `cols` cells and cache its adjacency.
    pub fn new(rows: i16, cols: i16) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be positive");

        let mut adjacency = HashMap::with_capacity(rows as usize * cols as usize);
        for row in 0..rows {
            for col in 0..cols {
                let cell = CellCoord::new(row, col);
                let mut neighbors = [None; 3];
                for slot in EdgeSlot::ALL {
                    let other = cell.neighbor(slot);
                    if Self::in_bounds(rows, cols, other) {
                        neighbors[slot.index()] = Some(other);
                    }
                }
                adjacency.insert(cell, neighbors);
            }
        }

        Self {
            rows,
            cols,
            adjacency,
        }
    }

    fn in_bounds(rows: i16, cols: i16, cell: CellCoord) -> bool {
        (0..rows).contains(&cell.row) && (0..cols).contains(&cell.col)
    }

    /// Number of cell rows.
    pub fn rows(&self) -> i16 {
        self.rows
    }

    /// Number of cell columns.
    pub fn cols(&self) -> i16 {
        self.cols
    }

    /// Whether a cell lies on the grid.
    pub fn contains(&self, cell: CellCoord) -> bool {
        Self::in_bounds(self.rows, self.cols, cell)
    }

    /// Cached edge neighbors, indexed by [`EdgeSlot::index`].
    ///
    /// Border cells have fewer than three neighbors.
    pub fn neighbors(&self, cell: CellCoord) -> [Option<CellCoord>; 3] {
        self.adjacency.get(&cell).copied().unwrap_or([None; 3])
    }

    /// The six cells ringing `vertex`, if the whole ring lies on the grid.
    ///
    /// This is the occupancy-independent half of hexagon detection; the
    /// board checks the ring for full occupancy.
    pub fn hexagon_ring(&self, vertex: VertexCoord) -> Option<[CellCoord; 6]> {
        let ring = vertex.surrounding_cells();
        if ring.iter().all(|&cell| self.contains(cell)) {
            Some(ring)
        } else {
            None
        }
    }

    /// The far-corner cell used for bridge detection: the cell
    /// point-symmetric to `cell` through the corner opposite `edge`.
    ///
    /// Returns `None` when the mirrored cell falls off the grid.
    pub fn bridge_cell(&self, cell: CellCoord, edge: EdgeSlot) -> Option<CellCoord> {
        let d = if cell.is_up() { 1 } else { -1 };
        let mirrored = match edge {
            EdgeSlot::Across => CellCoord::new(cell.row - d, cell.col),
            EdgeSlot::Left => CellCoord::new(cell.row + d, cell.col + 2),
            EdgeSlot::Right => CellCoord::new(cell.row + d, cell.col - 2),
        };
        self.contains(mirrored).then_some(mirrored)
    }

    /// Up cell nearest the middle of the grid; the opening placement target.
    pub fn center_cell(&self) -> CellCoord {
        let row = self.rows / 2;
        let mut col = self.cols / 2;
        if (row + col) % 2 != 0 {
            if col + 1 < self.cols {
                col += 1;
            } else {
                col -= 1;
            }
        }
        CellCoord::new(row, col)
    }
}
