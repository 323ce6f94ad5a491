//! Scoring module - points for match groups
//!
//! Each group is scored by its size alone:
//! - 3 tiles: 5 points
//! - 4 tiles: 10 points
//! - 5 or more tiles: 50 points
//!
//! Groups that cross (a plus or L shape) are scored separately. Orientation never
//! changes the value; it is carried in the breakdown for labeling only.

use serde::{Deserialize, Serialize};

use crate::detector::MatchGroup;
use crate::types::{
    Orientation, TileType, MIN_MATCH_LEN, SCORE_MATCH_3, SCORE_MATCH_4, SCORE_MATCH_5_PLUS,
};

/// Points for one group of `count` tiles
pub fn group_points(count: usize) -> u32 {
    match count {
        3 => SCORE_MATCH_3,
        4 => SCORE_MATCH_4,
        n if n >= 5 => SCORE_MATCH_5_PLUS,
        // Groups below MIN_MATCH_LEN are never emitted
        _ => 0,
    }
}

/// Score contribution of a single group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupScore {
    pub orientation: Orientation,
    pub kind: TileType,
    pub count: usize,
    pub points: u32,
}

/// Score calculation result for one round
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Per-group breakdown, in group order
    pub groups: Vec<GroupScore>,
    pub total: u32,
}

/// Score every group of a round and sum them
pub fn calculate_score(groups: &[MatchGroup]) -> ScoreResult {
    let groups: Vec<GroupScore> = groups
        .iter()
        .map(|g| GroupScore {
            orientation: g.orientation,
            kind: g.kind,
            count: g.count(),
            points: group_points(g.count()),
        })
        .collect();
    let total = groups
        .iter()
        .fold(0u32, |acc, g| acc.saturating_add(g.points));
    ScoreResult { groups, total }
}

/// Total points for a round's groups
pub fn score(groups: &[MatchGroup]) -> u32 {
    groups
        .iter()
        .filter(|g| g.count() >= MIN_MATCH_LEN)
        .fold(0u32, |acc, g| acc.saturating_add(group_points(g.count())))
}
