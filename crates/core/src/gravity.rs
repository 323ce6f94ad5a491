//! Gravity and refill
//!
//! Gravity compacts each column downward independently. It is a stable
//! compaction: surviving tiles keep their relative vertical order and always
//! land in the lowest free slot, never skipping over another tile. Refill then
//! creates new tiles in every slot still empty, which after gravity are only
//! ever at the top of a column.
//!
//! Fill must run after gravity; filling first would create tiles in slots that
//! falling tiles are about to take.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::grid::Grid;
use crate::rng::TileSource;
use crate::types::{Tile, TileMove};

/// Everything gravity and refill changed in one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravityResult {
    /// Tiles that fell, bottom-most first within each column
    pub moved: Vec<TileMove>,
    /// Newly created tiles, top to bottom within each column
    pub filled: Vec<Tile>,
}

impl GravityResult {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.filled.is_empty()
    }
}

/// Let tiles fall into the empty slots below them, column by column
pub fn apply_gravity(grid: &mut Grid) -> Vec<TileMove> {
    let mut moves = Vec::new();
    for col in 0..grid.cols() {
        apply_gravity_to_column(grid, col, &mut moves);
    }
    if !moves.is_empty() {
        debug!(moved = moves.len(), "gravity applied");
    }
    moves
}

/// Compact one column using a two-pointer scan from the bottom
fn apply_gravity_to_column(grid: &mut Grid, col: usize, moves: &mut Vec<TileMove>) {
    let mut write_row = grid.rows();

    for read_row in (0..grid.rows()).rev() {
        let Some(tile) = grid.take(read_row, col) else {
            continue;
        };
        // Everything between read_row and write_row is empty
        write_row -= 1;
        if write_row != read_row {
            let mv = TileMove {
                id: tile.id,
                kind: tile.kind,
                col,
                from_row: read_row,
                to_row: write_row,
            };
            trace!(id = %tile.id, col, from = read_row, to = write_row, "tile fell");
            moves.push(mv);
        }
        grid.place(write_row, col, tile);
    }
}

/// Create a new tile in every empty slot, scanning each column top to bottom
pub fn fill_empty_spaces<S: TileSource + ?Sized>(grid: &mut Grid, source: &mut S) -> Vec<Tile> {
    let mut filled = Vec::new();
    let type_count = grid.type_count();

    for col in 0..grid.cols() {
        for row in 0..grid.rows() {
            if grid.is_empty(row, col) {
                let tile = grid.spawn(row, col, source.next_type(type_count));
                trace!(id = %tile.id, row, col, kind = tile.kind, "tile filled");
                filled.push(tile);
            }
        }
    }
    if !filled.is_empty() {
        debug!(filled = filled.len(), "empty slots refilled");
    }
    filled
}

/// Gravity followed by refill. The board is full afterwards.
pub fn apply_gravity_and_fill<S: TileSource + ?Sized>(
    grid: &mut Grid,
    source: &mut S,
) -> GravityResult {
    let moved = apply_gravity(grid);
    let filled = fill_empty_spaces(grid, source);
    GravityResult { moved, filled }
}
