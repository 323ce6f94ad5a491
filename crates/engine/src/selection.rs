//! Two-click swap selection
//!
//! The first click selects a tile. A second click on the same tile clears the
//! selection, on a neighbour requests a swap, and anywhere else moves the
//! selection there.

use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Position),
    Deselected,
    /// Selection cleared; the caller should swap these two positions
    SwapRequested(Position, Position),
    Reselected(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    selected: Option<Position>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn click(&mut self, pos: Position) -> ClickOutcome {
        match self.selected {
            None => {
                self.selected = Some(pos);
                ClickOutcome::Selected(pos)
            }
            Some(current) if current == pos => {
                self.selected = None;
                ClickOutcome::Deselected
            }
            Some(current) if current.is_adjacent(pos) => {
                self.selected = None;
                ClickOutcome::SwapRequested(current, pos)
            }
            Some(_) => {
                self.selected = Some(pos);
                ClickOutcome::Reselected(pos)
            }
        }
    }
}
