//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond simple queries, making them
//! usable in any context (board logic, session orchestration, rendering layer).
//!
//! # Board Dimensions
//!
//! Default board dimensions:
//!
//! - **Rows**: 10 (indexed 0-9, top to bottom)
//! - **Cols**: 8 (indexed 0-7, left to right)
//! - **Tile types**: 6 (values 0-5)
//!
//! Any `rows x cols` board with at least one row and one column is valid; the
//! defaults only apply when a configuration does not say otherwise.
//!
//! # Scoring Table
//!
//! | Group size | Points |
//! |------------|--------|
//! | 3 | 5 |
//! | 4 | 10 |
//! | 5+ | 50 |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Orientation, Position, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! let a = Position::new(2, 3);
//! assert!(a.is_adjacent(Position::new(2, 4)));
//! assert!(a.is_adjacent(Position::new(1, 3)));
//! assert!(!a.is_adjacent(Position::new(3, 4)));
//!
//! assert_eq!(Orientation::from_str("Vertical"), Some(Orientation::Vertical));
//!
//! assert_eq!(DEFAULT_ROWS, 10);
//! assert_eq!(DEFAULT_COLS, 8);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of rows on a board
pub const DEFAULT_ROWS: usize = 10;

/// Default number of columns on a board
pub const DEFAULT_COLS: usize = 8;

/// Default number of distinct tile types
pub const DEFAULT_TYPE_COUNT: u8 = 6;

/// Shortest run of identical tiles that forms a match group
pub const MIN_MATCH_LEN: usize = 3;

/// Safety cap on cascade rounds per accepted swap
pub const DEFAULT_MAX_CASCADE_ROUNDS: u32 = 10;

/// Points for a group of exactly three tiles
pub const SCORE_MATCH_3: u32 = 5;

/// Points for a group of exactly four tiles
pub const SCORE_MATCH_4: u32 = 10;

/// Points for a group of five or more tiles
pub const SCORE_MATCH_5_PLUS: u32 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_constants() {
        assert_eq!(DEFAULT_ROWS, 10);
        assert_eq!(DEFAULT_COLS, 8);
        assert_eq!(DEFAULT_TYPE_COUNT, 6);
        assert_eq!(MIN_MATCH_LEN, 3);
        assert_eq!(DEFAULT_MAX_CASCADE_ROUNDS, 10);

        assert_eq!(SCORE_MATCH_3, 5);
        assert_eq!(SCORE_MATCH_4, 10);
        assert_eq!(SCORE_MATCH_5_PLUS, 50);
    }

    #[test]
    fn adjacency_is_manhattan_distance_one() {
        let p = Position::new(1, 1);
        assert!(p.is_adjacent(Position::new(0, 1)));
        assert!(p.is_adjacent(Position::new(2, 1)));
        assert!(p.is_adjacent(Position::new(1, 0)));
        assert!(p.is_adjacent(Position::new(1, 2)));

        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Position::new(0, 0)));
        assert!(!p.is_adjacent(Position::new(2, 2)));
        assert!(!p.is_adjacent(Position::new(1, 3)));
        assert_eq!(Position::new(0, 0).manhattan(Position::new(2, 2)), 4);
    }

    #[test]
    fn slot_queries() {
        let tile = Tile::new(TileId(7), 2, 3, 4);
        let slot = Slot::Occupied(tile);
        assert!(!slot.is_empty());
        assert_eq!(slot.kind(), Some(4));
        assert_eq!(slot.tile().map(|t| t.position()), Some(Position::new(2, 3)));

        assert!(Slot::Empty.is_empty());
        assert_eq!(Slot::Empty.kind(), None);
        assert_eq!(Slot::default(), Slot::Empty);
    }

    #[test]
    fn board_error_messages() {
        let err = BoardError::NotAdjacent {
            a: Position::new(0, 0),
            b: Position::new(2, 2),
        };
        assert_eq!(err.to_string(), "positions (0, 0) and (2, 2) are not adjacent");

        let err = BoardError::InvalidPosition { row: 10, col: 0 };
        assert_eq!(err.to_string(), "position (10, 0) is outside the board");
    }

    #[test]
    fn board_error_codes() {
        assert_eq!(
            BoardError::invalid_position(Position::new(1, 2)).code(),
            "invalid_position"
        );
        assert_eq!(
            BoardError::NotAdjacent {
                a: Position::new(0, 0),
                b: Position::new(0, 2),
            }
            .code(),
            "not_adjacent"
        );
        assert_eq!(BoardError::EmptySlot { row: 0, col: 0 }.code(), "empty_slot");
        assert_eq!(
            BoardError::InvalidTileType { kind: 9, type_count: 6 }.code(),
            "invalid_tile_type"
        );
        assert_eq!(BoardError::InvalidDimensions { rows: 0, cols: 1 }.code(), "invalid_board");
        assert_eq!(BoardError::InvalidTypeCount.code(), "invalid_board");
        assert_eq!(BoardError::Busy.code(), "busy");
        assert_eq!(BoardError::NoCascadeInProgress.code(), "no_cascade");
    }

    #[test]
    fn event_serializes_with_kind_tag() {
        let ev = BoardEvent::SwapReverted {
            a: Position::new(0, 0),
            b: Position::new(0, 1),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["kind"], "swapReverted");
        assert_eq!(json["a"]["row"], 0);
        assert_eq!(json["b"]["col"], 1);
    }
}

/// Tile type (matching category), in `[0, type_count)`
pub type TileType = u8;

/// Stable identifier assigned to a tile when it is created
///
/// Ids travel with a tile when it falls. A swap exchanges tile *types*, so the
/// ids of the two swapped slots stay where they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A grid coordinate: `row` counts from the top, `col` from the left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two positions
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Two positions are adjacent when they differ by exactly one row or
    /// exactly one column, not both
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::Position;
    ///
    /// assert!(Position::new(0, 0).is_adjacent(Position::new(0, 1)));
    /// assert!(!Position::new(0, 0).is_adjacent(Position::new(1, 1)));
    /// assert!(!Position::new(0, 0).is_adjacent(Position::new(0, 0)));
    /// ```
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One board piece
///
/// `row`/`col` always equal the coordinates of the slot holding the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub row: usize,
    pub col: usize,
    pub kind: TileType,
}

impl Tile {
    pub fn new(id: TileId, row: usize, col: usize, kind: TileType) -> Self {
        Self { id, row, col, kind }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn is_same_type(&self, other: &Tile) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({},{}):type={}", self.row, self.col, self.kind)
    }
}

/// A grid position, either empty or holding exactly one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(Tile),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn tile(&self) -> Option<&Tile> {
        match self {
            Slot::Occupied(tile) => Some(tile),
            Slot::Empty => None,
        }
    }

    pub fn kind(&self) -> Option<TileType> {
        self.tile().map(|t| t.kind)
    }
}

/// Direction of a match group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Run along a row (left to right)
    Horizontal,
    /// Run along a column (top to bottom)
    Vertical,
}

impl Orientation {
    /// Parse orientation from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "horizontal" | "h" => Some(Orientation::Horizontal),
            "vertical" | "v" => Some(Orientation::Vertical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// A tile relocated by gravity within its column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileMove {
    pub id: TileId,
    pub kind: TileType,
    pub col: usize,
    pub from_row: usize,
    pub to_row: usize,
}

impl TileMove {
    /// Number of rows the tile fell
    pub fn distance(&self) -> usize {
        self.to_row - self.from_row
    }
}

/// Advisory notification emitted after each completed phase.
///
/// Consumed by an animation layer; the engine never reads these back, so
/// dropping them has no effect on board state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BoardEvent {
    /// Types of two adjacent tiles were exchanged
    SwapApplied { a: Position, b: Position },
    /// A swap produced no match and was undone
    SwapReverted { a: Position, b: Position },
    /// Matched tiles were cleared (deduplicated)
    TilesRemoved { round: u32, tiles: Vec<Tile> },
    /// Tiles fell into gaps below them
    TilesMoved { round: u32, moves: Vec<TileMove> },
    /// New tiles were created at the top of columns
    TilesFilled { round: u32, tiles: Vec<Tile> },
    /// A cascade round finished; `score` is the session total so far
    RoundComplete {
        round: u32,
        score_delta: u32,
        score: u32,
    },
    /// The whole cascade for one swap finished
    CascadeComplete {
        rounds: u32,
        score_delta: u32,
        capped: bool,
    },
}

/// Errors returned (never panicked) by board queries, mutations and swaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("position ({row}, {col}) is outside the board")]
    InvalidPosition { row: usize, col: usize },
    #[error("positions {a} and {b} are not adjacent")]
    NotAdjacent { a: Position, b: Position },
    #[error("slot ({row}, {col}) is empty")]
    EmptySlot { row: usize, col: usize },
    #[error("tile type {kind} is out of range for {type_count} types")]
    InvalidTileType { kind: TileType, type_count: u8 },
    #[error("board dimensions {rows}x{cols} are invalid")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("type count must be at least 1")]
    InvalidTypeCount,
    #[error("a cascade is still in progress")]
    Busy,
    #[error("no cascade is in progress")]
    NoCascadeInProgress,
}

impl BoardError {
    pub fn invalid_position(pos: Position) -> Self {
        BoardError::InvalidPosition {
            row: pos.row,
            col: pos.col,
        }
    }

    /// Short machine-readable code for the rendering layer
    pub fn code(self) -> &'static str {
        match self {
            BoardError::InvalidPosition { .. } => "invalid_position",
            BoardError::NotAdjacent { .. } => "not_adjacent",
            BoardError::EmptySlot { .. } => "empty_slot",
            BoardError::InvalidTileType { .. } => "invalid_tile_type",
            BoardError::InvalidDimensions { .. } | BoardError::InvalidTypeCount => "invalid_board",
            BoardError::Busy => "busy",
            BoardError::NoCascadeInProgress => "no_cascade",
        }
    }
}
