//! Match detection - finds runs of three or more identical tiles
//!
//! Each row is scanned left to right and each column top to bottom in a single
//! linear pass, tracking the current run of equal types. A run closes when the
//! next tile differs, an empty slot interrupts it, or the line ends; a closed
//! run of at least [`MIN_MATCH_LEN`] tiles becomes a [`MatchGroup`].
//!
//! Rows and columns are scanned independently, so a tile where a horizontal and
//! a vertical run cross appears in both groups. Scoring counts both runs;
//! removal must use [`matched_tiles`] / [`find_matches`], which deduplicate by
//! position.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::Grid;
use crate::types::{Orientation, Position, Tile, TileType, MIN_MATCH_LEN};

/// A maximal run of same-type tiles along one row or column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    /// Tiles in scan order, copied at detection time
    pub tiles: Vec<Tile>,
    pub kind: TileType,
    pub orientation: Orientation,
}

impl MatchGroup {
    pub fn count(&self) -> usize {
        self.tiles.len()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.iter().map(Tile::position)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions().any(|p| p == pos)
    }
}

/// Find every match group: all horizontal groups (top row first), then all
/// vertical groups (left column first)
pub fn find_match_groups(grid: &Grid) -> Vec<MatchGroup> {
    let mut groups = Vec::new();

    for row in 0..grid.rows() {
        scan_line(
            grid,
            (0..grid.cols()).map(|col| Position::new(row, col)),
            Orientation::Horizontal,
            &mut groups,
        );
    }
    for col in 0..grid.cols() {
        scan_line(
            grid,
            (0..grid.rows()).map(|row| Position::new(row, col)),
            Orientation::Vertical,
            &mut groups,
        );
    }

    if !groups.is_empty() {
        let total: usize = groups.iter().map(MatchGroup::count).sum();
        debug!(groups = groups.len(), tiles = total, "match groups found");
    }
    groups
}

/// Find every matched tile, each exactly once
pub fn find_matches(grid: &Grid) -> Vec<Tile> {
    matched_tiles(&find_match_groups(grid))
}

/// Check whether the board holds at least one match, stopping at the first
pub fn has_matches(grid: &Grid) -> bool {
    (0..grid.rows()).any(|row| has_run((0..grid.cols()).map(|col| grid.kind_at(row, col))))
        || (0..grid.cols()).any(|col| has_run((0..grid.rows()).map(|row| grid.kind_at(row, col))))
}

fn has_run(cells: impl Iterator<Item = Option<TileType>>) -> bool {
    let mut prev = None;
    let mut len = 0usize;
    for cell in cells {
        match cell {
            Some(kind) if prev == Some(kind) => len += 1,
            Some(_) => len = 1,
            None => len = 0,
        }
        prev = cell;
        if len >= MIN_MATCH_LEN {
            return true;
        }
    }
    false
}

/// Tiles of all groups deduplicated by position, in first-seen order
pub fn matched_tiles(groups: &[MatchGroup]) -> Vec<Tile> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(|g| g.tiles.iter())
        .filter(|t| seen.insert(t.position()))
        .copied()
        .collect()
}

fn scan_line(
    grid: &Grid,
    line: impl Iterator<Item = Position>,
    orientation: Orientation,
    out: &mut Vec<MatchGroup>,
) {
    let mut run: Vec<Tile> = Vec::new();
    for pos in line {
        match grid.tile(pos.row, pos.col) {
            Some(tile) if run.last().is_some_and(|last| last.is_same_type(tile)) => {
                run.push(*tile);
            }
            Some(tile) => {
                close_run(&mut run, orientation, out);
                run.push(*tile);
            }
            None => close_run(&mut run, orientation, out),
        }
    }
    close_run(&mut run, orientation, out);
}

fn close_run(run: &mut Vec<Tile>, orientation: Orientation, out: &mut Vec<MatchGroup>) {
    if run.len() >= MIN_MATCH_LEN {
        let tiles = std::mem::take(run);
        out.push(MatchGroup {
            kind: tiles[0].kind,
            tiles,
            orientation,
        });
    } else {
        run.clear();
    }
}
