use serde::{Deserialize, Serialize};

use crate::types::TileType;

/// Marker byte for empty slots in [`BoardSnapshot::board_hash`]
const EMPTY_CELL_BYTE: u8 = 0xFF;

/// Read-only copy of the board for a rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub type_count: u8,
    /// Row-major tile types, `None` for empty slots
    pub cells: Vec<Option<TileType>>,
    pub empty: usize,
    /// FNV-1a 64 over the cell bytes (`0xFF` for empty)
    pub board_hash: u64,
    /// Session score (filled by the session, not the grid)
    pub score: u32,
    /// True while a cascade is unresolved
    pub busy: bool,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.rows = 0;
        self.cols = 0;
        self.type_count = 0;
        self.cells.clear();
        self.empty = 0;
        self.board_hash = 0;
        self.score = 0;
        self.busy = false;
    }

    /// Cell at (row, col), `None` when out of bounds
    pub fn cell(&self, row: usize, col: usize) -> Option<Option<TileType>> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// One row of cells; empty slice when out of bounds
    pub fn row(&self, row: usize) -> &[Option<TileType>] {
        if row >= self.rows {
            return &[];
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols).unwrap_or(&[])
    }

    pub fn hash_cells(cells: &[Option<TileType>]) -> u64 {
        fnv1a64(cells.iter().map(|c| c.unwrap_or(EMPTY_CELL_BYTE)))
    }
}

/// FNV-1a 64-bit
pub fn fnv1a64(bytes: impl IntoIterator<Item = u8>) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x00000100000001B3;

    let mut h = OFFSET;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(PRIME);
    }
    h
}
