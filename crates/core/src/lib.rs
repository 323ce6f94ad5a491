//! Core board logic - pure, deterministic, and testable
//!
//! This crate contains the board data model and every rule that transforms it.
//! It has **no** knowledge of rendering, input, timers or sessions, making it:
//!
//! - **Deterministic**: the same [`TileSource`] seed produces identical boards
//! - **Testable**: every rule is a plain function over a [`Grid`]
//! - **Portable**: runs headless, under a UI, or inside a test harness
//!
//! # Module Structure
//!
//! - [`grid`]: `rows x cols` slot matrix with bounds-checked access and type swaps
//! - [`detector`]: finds runs of three or more same-type tiles
//! - [`gravity`]: stable per-column compaction, then refill of empty slots
//! - [`scoring`]: points per match group
//! - [`rng`]: injectable tile type sources
//! - [`snapshot`]: read-only board copies for renderers
//!
//! # Example
//!
//! ```
//! use match3_core::{apply_gravity_and_fill, find_match_groups, find_matches, score, Grid, SimpleRng};
//!
//! let mut rng = SimpleRng::new(12345);
//! let mut grid = Grid::from_types(&[[1, 1, 1], [0, 2, 0], [2, 0, 2]], 3).unwrap();
//!
//! let groups = find_match_groups(&grid);
//! assert_eq!(score(&groups), 5);
//!
//! let matched: Vec<_> = find_matches(&grid).iter().map(|t| t.position()).collect();
//! grid.remove_tiles(&matched);
//! assert_eq!(grid.count_empty(), 3);
//!
//! apply_gravity_and_fill(&mut grid, &mut rng);
//! assert_eq!(grid.count_empty(), 0);
//! ```

pub mod detector;
pub mod gravity;
pub mod grid;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use detector::{find_match_groups, find_matches, has_matches, matched_tiles, MatchGroup};
pub use gravity::{apply_gravity, apply_gravity_and_fill, fill_empty_spaces, GravityResult};
pub use grid::{Grid, InvariantViolation};
pub use rng::{FixedSequence, RandSource, SimpleRng, TileSource};
pub use scoring::{calculate_score, group_points, score, GroupScore, ScoreResult};
pub use snapshot::BoardSnapshot;
