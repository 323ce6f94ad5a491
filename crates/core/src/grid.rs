//! Grid module - owns the board's tile slots
//!
//! The grid is a `rows x cols` matrix stored as a flat row-major array of
//! [`Slot`]s. Coordinates: `(row, col)` where row 0 is the top and col 0 is the
//! left edge.
//!
//! Invariants held by every public operation:
//! - dimensions never change after construction
//! - every occupied slot's tile has `kind < type_count`
//! - every occupied slot's tile stores the slot's own coordinates
//!
//! Between removal and refill a grid may contain empty slots; after
//! [`apply_gravity_and_fill`](crate::gravity::apply_gravity_and_fill) it never does.

use std::fmt;

use tracing::debug;

use crate::rng::TileSource;
use crate::snapshot::BoardSnapshot;
use crate::types::{BoardError, Position, Slot, Tile, TileId, TileType};

/// Broken grid invariant. Only reachable through an engine defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("slot ({row}, {col}) is empty on a settled board")]
    EmptySlot { row: usize, col: usize },
    #[error("tile {id} in slot ({row}, {col}) stores ({stored_row}, {stored_col})")]
    MisplacedTile {
        id: TileId,
        row: usize,
        col: usize,
        stored_row: usize,
        stored_col: usize,
    },
    #[error("tile in slot ({row}, {col}) has type {kind}, expected < {type_count}")]
    TypeOutOfRange {
        row: usize,
        col: usize,
        kind: TileType,
        type_count: u8,
    },
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    type_count: u8,
    /// Flat array of slots, row-major order (row * cols + col)
    slots: Vec<Slot>,
    /// Id handed to the next created tile
    next_id: u32,
}

impl Grid {
    /// Create a board and fill every slot with a tile drawn from `source`
    pub fn new<S: TileSource + ?Sized>(
        rows: usize,
        cols: usize,
        type_count: u8,
        source: &mut S,
    ) -> Result<Self, BoardError> {
        let mut grid = Self::empty(rows, cols, type_count)?;
        for row in 0..rows {
            for col in 0..cols {
                let kind = source.next_type(type_count);
                grid.spawn(row, col, kind);
            }
        }
        debug!(rows, cols, type_count, "board initialized");
        Ok(grid)
    }

    /// Create a board with every slot empty
    pub fn empty(rows: usize, cols: usize, type_count: u8) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        if type_count == 0 {
            return Err(BoardError::InvalidTypeCount);
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(BoardError::InvalidDimensions { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            type_count,
            slots: vec![Slot::Empty; len],
            next_id: 0,
        })
    }

    /// Build a full board from explicit tile types, one slice per row
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_core::Grid;
    ///
    /// let grid = Grid::from_types(&[[0, 0, 1], [2, 3, 0]], 4).unwrap();
    /// assert_eq!(grid.rows(), 2);
    /// assert_eq!(grid.cols(), 3);
    /// assert_eq!(grid.kind_at(1, 1), Some(3));
    /// ```
    pub fn from_types<R: AsRef<[TileType]>>(rows: &[R], type_count: u8) -> Result<Self, BoardError> {
        let cells: Vec<Vec<Option<TileType>>> = rows
            .iter()
            .map(|row| row.as_ref().iter().copied().map(Some).collect())
            .collect();
        Self::from_cells(&cells, type_count)
    }

    /// Build a board from explicit cells (`None` = empty slot), one slice per row
    pub fn from_cells<R: AsRef<[Option<TileType>]>>(
        rows: &[R],
        type_count: u8,
    ) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != width) {
            return Err(BoardError::InvalidDimensions {
                rows: height,
                cols: width,
            });
        }

        let mut grid = Self::empty(height, width, type_count)?;
        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.as_ref().iter().enumerate() {
                if let Some(kind) = *cell {
                    if kind >= type_count {
                        return Err(BoardError::InvalidTileType { kind, type_count });
                    }
                    grid.spawn(row, col, kind);
                }
            }
        }
        Ok(grid)
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    fn checked_index(&self, pos: Position) -> Result<usize, BoardError> {
        self.index(pos.row, pos.col)
            .ok_or(BoardError::invalid_position(pos))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn type_count(&self) -> u8 {
        self.type_count
    }

    /// Total number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty_board(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    /// Check if position is within bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Get slot at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&Slot> {
        self.index(row, col).map(|idx| &self.slots[idx])
    }

    /// Get the tile at (row, col)
    /// Returns None if out of bounds or empty
    pub fn tile(&self, row: usize, col: usize) -> Option<&Tile> {
        self.get(row, col).and_then(Slot::tile)
    }

    pub fn kind_at(&self, row: usize, col: usize) -> Option<TileType> {
        self.tile(row, col).map(|t| t.kind)
    }

    /// Check if position is empty (false when out of bounds)
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Slot::Empty))
    }

    /// Count empty slots
    pub fn count_empty(&self) -> usize {
        self.slots.iter().filter(|s| s.is_empty()).count()
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| !s.is_empty())
    }

    /// All occupied tiles, row-major
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.slots.iter().filter_map(Slot::tile)
    }

    /// Get a reference to the internal slots array
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Overwrite the type of the tile at (row, col) in place
    pub fn set_type(&mut self, row: usize, col: usize, kind: TileType) -> Result<(), BoardError> {
        let idx = self.checked_index(Position::new(row, col))?;
        if kind >= self.type_count {
            return Err(BoardError::InvalidTileType {
                kind,
                type_count: self.type_count,
            });
        }
        match &mut self.slots[idx] {
            Slot::Occupied(tile) => {
                tile.kind = kind;
                Ok(())
            }
            Slot::Empty => Err(BoardError::EmptySlot { row, col }),
        }
    }

    /// Exchange the types of two occupied slots
    ///
    /// Tile ids and coordinates stay in place; only `kind` moves. Swapping a
    /// position with itself is a no-op.
    pub fn swap_types(&mut self, a: Position, b: Position) -> Result<(), BoardError> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        let ka = self.slots[ia]
            .kind()
            .ok_or(BoardError::EmptySlot { row: a.row, col: a.col })?;
        let kb = self.slots[ib]
            .kind()
            .ok_or(BoardError::EmptySlot { row: b.row, col: b.col })?;
        if ia == ib {
            return Ok(());
        }

        if let Slot::Occupied(tile) = &mut self.slots[ia] {
            tile.kind = kb;
        }
        if let Slot::Occupied(tile) = &mut self.slots[ib] {
            tile.kind = ka;
        }
        debug!(%a, %b, "swapped types {} <-> {}", ka, kb);
        Ok(())
    }

    /// Empty the given slots and return the tiles that were removed
    ///
    /// Out-of-bounds, duplicate and already-empty positions are skipped, so a
    /// tile is removed at most once.
    pub fn remove_tiles(&mut self, positions: &[Position]) -> Vec<Tile> {
        let mut removed = Vec::with_capacity(positions.len());
        for &pos in positions {
            if let Some(tile) = self.take(pos.row, pos.col) {
                removed.push(tile);
            }
        }
        removed
    }

    /// Remove and return the tile at (row, col), leaving the slot empty
    pub(crate) fn take(&mut self, row: usize, col: usize) -> Option<Tile> {
        let idx = self.index(row, col)?;
        match std::mem::take(&mut self.slots[idx]) {
            Slot::Occupied(tile) => Some(tile),
            Slot::Empty => None,
        }
    }

    /// Put an existing tile into (row, col), updating its stored coordinates
    pub(crate) fn place(&mut self, row: usize, col: usize, mut tile: Tile) {
        if let Some(idx) = self.index(row, col) {
            tile.row = row;
            tile.col = col;
            self.slots[idx] = Slot::Occupied(tile);
        }
    }

    /// Create a fresh tile with a new id at (row, col)
    pub(crate) fn spawn(&mut self, row: usize, col: usize, kind: TileType) -> Tile {
        let tile = Tile::new(TileId(self.next_id), row, col, kind);
        self.next_id = self.next_id.wrapping_add(1);
        self.place(row, col, tile);
        tile
    }

    /// Verify coordinate and type invariants of every occupied slot
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (idx, slot) in self.slots.iter().enumerate() {
            let (row, col) = (idx / self.cols, idx % self.cols);
            if let Slot::Occupied(tile) = slot {
                if tile.row != row || tile.col != col {
                    return Err(InvariantViolation::MisplacedTile {
                        id: tile.id,
                        row,
                        col,
                        stored_row: tile.row,
                        stored_col: tile.col,
                    });
                }
                if tile.kind >= self.type_count {
                    return Err(InvariantViolation::TypeOutOfRange {
                        row,
                        col,
                        kind: tile.kind,
                        type_count: self.type_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Verify invariants and that no slot is empty
    pub fn check_settled(&self) -> Result<(), InvariantViolation> {
        self.check_invariants()?;
        match self.slots.iter().position(Slot::is_empty) {
            Some(idx) => Err(InvariantViolation::EmptySlot {
                row: idx / self.cols,
                col: idx % self.cols,
            }),
            None => Ok(()),
        }
    }

    /// Write the board part of a snapshot, reusing its buffer
    pub fn snapshot_board_into(&self, out: &mut BoardSnapshot) {
        out.rows = self.rows;
        out.cols = self.cols;
        out.type_count = self.type_count;
        out.cells.clear();
        out.cells.extend(self.slots.iter().map(Slot::kind));
        out.empty = out.cells.iter().filter(|c| c.is_none()).count();
        out.board_hash = BoardSnapshot::hash_cells(&out.cells);
    }

    /// Row-major tile types, `None` for empty slots
    pub fn to_cells(&self) -> Vec<Vec<Option<TileType>>> {
        self.slots
            .chunks(self.cols)
            .map(|row| row.iter().map(Slot::kind).collect())
            .collect()
    }
}

/// Renders one line per row: type digits separated by spaces, `X` for empty
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.slots.chunks(self.cols).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, slot) in cells.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                match slot.kind() {
                    Some(kind) => write!(f, "{}", kind)?,
                    None => write!(f, "X")?,
                }
            }
        }
        Ok(())
    }
}
