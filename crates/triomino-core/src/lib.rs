//! Triomino - rule engine for the triangular tile matching game.
//!
//! This crate provides the complete game logic:
//! - The 56-tile catalog and rotation model
//! - Triangular grid topology with hexagon rings and bridge geometry
//! - Placement validation against the edge and vertex matching rules
//! - Official scoring with formation bonuses and draw/pass penalties
//! - A turn-based state machine from deal to final-round resolution
//! - Pluggable strategies and a run-to-completion simulation entrypoint
//!
//! # Architecture
//!
//! The engine performs no I/O and holds no global state; each
//! [`MatchState`] owns its board, pool and seeded random generator, so
//! independent matches can run concurrently without synchronization.
//! Presentation layers and training harnesses consume the engine through
//! [`MatchState::legal_moves`], [`MatchState::apply`] and the emitted
//! [`EngineEvent`] trace; they never mutate engine state directly.
//!
//! # Modules
//!
//! - [`tile`]: tiles, rotations and the catalog
//! - [`grid`]: cell and vertex coordinates, cached adjacency
//! - [`board`]: occupancy, placement validation, bonus detection
//! - [`score`]: the pure scoring function and its constants
//! - [`player`]: hands, scores and opener selection
//! - [`game`]: the match state machine
//! - [`strategy`]: automated move selection
//! - [`sim`]: driving matches to completion

pub mod actions;
pub mod board;
pub mod game;
pub mod grid;
pub mod player;
pub mod score;
pub mod sim;
pub mod strategy;
pub mod tile;

// Re-export commonly used types
pub use actions::{Action, EngineEvent, Move, RoundEndReason, ScoredMove};
pub use board::{Board, PlacedTile, PlacementError, PlayerId};
pub use game::{
    EngineError, MatchConfig, MatchPhase, MatchState, PlayerStanding, initial_hand_size,
};
pub use grid::{CellCoord, CellOrientation, EdgeSlot, Grid, VertexCoord};
pub use player::{opening_holder, Player};
pub use score::{score_event, Bonus, ScoreEvent, MAX_DRAWS_PER_TURN, TARGET_SCORE};
pub use sim::{run_to_completion, MatchOutcome, MatchReport};
pub use strategy::{Strategy, StrategyKind};
pub use tile::{Rotation, Tile, TileError, CATALOG_SIZE, MAX_TILE_VALUE};
