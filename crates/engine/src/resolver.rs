//! Cascade resolver - drives one swap through to a settled board
//!
//! # State machine
//!
//! | From             | Event                       | To               |
//! |------------------|-----------------------------|------------------|
//! | `Idle`           | swap requested              | `ValidatingSwap` |
//! | `ValidatingSwap` | out of bounds / not adjacent| `Idle` (error)   |
//! | `ValidatingSwap` | swap applied, no match      | `Reverting`      |
//! | `Reverting`      | swap undone                 | `Idle`           |
//! | `ValidatingSwap` | swap applied, matches found | `Resolving`      |
//! | `Resolving`      | round executed              | `Resolving`      |
//! | `Resolving`      | no matches / cap reached    | `Idle`           |
//!
//! One round is: score the groups, remove the deduplicated matched tiles, apply
//! gravity and refill, then detect the groups for the next round. Rounds are
//! strictly sequential; round N+1 is only detected on the board round N left.
//!
//! The resolver can be driven in one call ([`CascadeResolver::resolve`]) or one
//! round at a time ([`CascadeResolver::begin_swap`] then
//! [`CascadeResolver::advance`]) so a renderer can animate between rounds.
//! Both produce the same board and the same notifications.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    apply_gravity_and_fill, calculate_score, find_match_groups, matched_tiles, GravityResult,
    Grid, MatchGroup, TileSource,
};
use crate::types::{BoardError, BoardEvent, Position, Tile, TileMove};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolverState {
    #[default]
    Idle,
    ValidatingSwap,
    Resolving,
    Reverting,
}

/// Everything one cascade round did to the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeOutcome {
    /// 1-based round number within the cascade
    pub round: u32,
    /// Groups scored this round (a crossing tile appears in two groups)
    pub groups: Vec<MatchGroup>,
    /// Removed tiles, each exactly once
    pub removed: Vec<Tile>,
    pub moved: Vec<TileMove>,
    pub filled: Vec<Tile>,
    pub score_delta: u32,
}

/// Result of a completed cascade
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub rounds: Vec<CascadeOutcome>,
    pub round_count: u32,
    pub total_score_delta: u32,
    /// The round cap stopped the cascade while matches remained on the board
    pub capped: bool,
}

/// Result of the validation phase of a swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapStart {
    /// Legal swap without a match; the board is back to where it was
    Reverted,
    /// The swap produced these groups; call `advance` until `Complete`
    Matched { groups: Vec<MatchGroup> },
}

/// Result of one `advance` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Round(CascadeOutcome),
    Complete(CascadeSummary),
}

/// Result of an accepted swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Reverted,
    Resolved(CascadeSummary),
}

impl SwapOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, SwapOutcome::Resolved(_))
    }

    pub fn score_delta(&self) -> u32 {
        match self {
            SwapOutcome::Reverted => 0,
            SwapOutcome::Resolved(summary) => summary.total_score_delta,
        }
    }

    pub fn summary(&self) -> Option<&CascadeSummary> {
        match self {
            SwapOutcome::Reverted => None,
            SwapOutcome::Resolved(summary) => Some(summary),
        }
    }
}

/// Work carried between rounds of an unfinished cascade
#[derive(Debug, Clone, Default)]
struct Cascade {
    /// Groups the next round will consume
    pending: Vec<MatchGroup>,
    rounds: Vec<CascadeOutcome>,
    total: u32,
}

impl Cascade {
    fn executed(&self) -> u32 {
        self.rounds.len() as u32
    }
}

#[derive(Debug, Clone)]
pub struct CascadeResolver {
    state: ResolverState,
    max_rounds: u32,
    cascade: Option<Cascade>,
}

impl CascadeResolver {
    /// `max_rounds` below 1 is raised to 1
    pub fn new(max_rounds: u32) -> Self {
        Self {
            state: ResolverState::Idle,
            max_rounds: max_rounds.max(1),
            cascade: None,
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// True while a matched swap has not reached `Step::Complete`
    pub fn is_busy(&self) -> bool {
        self.state != ResolverState::Idle
    }

    /// Rounds executed so far in the current cascade
    pub fn rounds_executed(&self) -> u32 {
        self.cascade.as_ref().map_or(0, Cascade::executed)
    }

    /// Validate and apply a swap, then detect its matches
    ///
    /// Bounds are checked before adjacency. On any error the board is left
    /// untouched.
    pub fn begin_swap(
        &mut self,
        grid: &mut Grid,
        a: Position,
        b: Position,
        events: &mut Vec<BoardEvent>,
    ) -> Result<SwapStart, BoardError> {
        if self.is_busy() {
            return Err(BoardError::Busy);
        }

        self.state = ResolverState::ValidatingSwap;
        if let Err(err) = validate_swap(grid, a, b).and_then(|()| grid.swap_types(a, b)) {
            debug!(%a, %b, error = %err, "swap rejected");
            self.state = ResolverState::Idle;
            return Err(err);
        }
        events.push(BoardEvent::SwapApplied { a, b });

        let groups = find_match_groups(grid);
        if groups.is_empty() {
            self.state = ResolverState::Reverting;
            let undone = grid.swap_types(a, b);
            self.state = ResolverState::Idle;
            undone?;
            events.push(BoardEvent::SwapReverted { a, b });
            debug!(%a, %b, "swap produced no match, reverted");
            return Ok(SwapStart::Reverted);
        }

        debug!(%a, %b, groups = groups.len(), "swap matched, cascade started");
        self.state = ResolverState::Resolving;
        self.cascade = Some(Cascade {
            pending: groups.clone(),
            ..Cascade::default()
        });
        Ok(SwapStart::Matched { groups })
    }

    /// Execute the next cascade round, or finish the cascade
    ///
    /// Returns `Step::Complete` once no groups remain or the round cap has
    /// been reached; the resolver is idle again afterwards. `score` is the
    /// session total and is increased by each round's points.
    pub fn advance<S: TileSource + ?Sized>(
        &mut self,
        grid: &mut Grid,
        source: &mut S,
        score: &mut u32,
        events: &mut Vec<BoardEvent>,
    ) -> Result<Step, BoardError> {
        if self.state != ResolverState::Resolving {
            return Err(BoardError::NoCascadeInProgress);
        }
        let Some(mut cascade) = self.cascade.take() else {
            self.state = ResolverState::Idle;
            return Err(BoardError::NoCascadeInProgress);
        };

        if cascade.pending.is_empty() || cascade.executed() >= self.max_rounds {
            self.state = ResolverState::Idle;
            return Ok(Step::Complete(finish(cascade, events)));
        }

        let outcome = run_round(grid, source, &mut cascade, score, events);
        self.cascade = Some(cascade);
        Ok(Step::Round(outcome))
    }

    /// Run a whole swap: validation, every round, completion
    pub fn resolve<S: TileSource + ?Sized>(
        &mut self,
        grid: &mut Grid,
        source: &mut S,
        a: Position,
        b: Position,
        score: &mut u32,
        events: &mut Vec<BoardEvent>,
    ) -> Result<SwapOutcome, BoardError> {
        match self.begin_swap(grid, a, b, events)? {
            SwapStart::Reverted => Ok(SwapOutcome::Reverted),
            SwapStart::Matched { .. } => loop {
                if let Step::Complete(summary) = self.advance(grid, source, score, events)? {
                    return Ok(SwapOutcome::Resolved(summary));
                }
            },
        }
    }
}

impl Default for CascadeResolver {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_MAX_CASCADE_ROUNDS)
    }
}

fn validate_swap(grid: &Grid, a: Position, b: Position) -> Result<(), BoardError> {
    for pos in [a, b] {
        if !grid.contains(pos) {
            return Err(BoardError::invalid_position(pos));
        }
    }
    if !a.is_adjacent(b) {
        return Err(BoardError::NotAdjacent { a, b });
    }
    Ok(())
}

fn run_round<S: TileSource + ?Sized>(
    grid: &mut Grid,
    source: &mut S,
    cascade: &mut Cascade,
    score: &mut u32,
    events: &mut Vec<BoardEvent>,
) -> CascadeOutcome {
    let round = cascade.executed() + 1;
    let groups = std::mem::take(&mut cascade.pending);

    let breakdown = calculate_score(&groups);
    for group in &breakdown.groups {
        debug!(
            round,
            orientation = group.orientation.as_str(),
            kind = group.kind,
            count = group.count,
            points = group.points,
            "group scored"
        );
    }

    let positions: Vec<Position> = matched_tiles(&groups).iter().map(Tile::position).collect();
    let removed = grid.remove_tiles(&positions);
    events.push(BoardEvent::TilesRemoved {
        round,
        tiles: removed.clone(),
    });

    let GravityResult { moved, filled } = apply_gravity_and_fill(grid, source);
    if let Err(violation) = grid.check_settled() {
        panic!("board invariant broken after refill in round {round}: {violation}\n{grid}");
    }
    events.push(BoardEvent::TilesMoved {
        round,
        moves: moved.clone(),
    });
    events.push(BoardEvent::TilesFilled {
        round,
        tiles: filled.clone(),
    });

    *score = score.saturating_add(breakdown.total);
    cascade.total = cascade.total.saturating_add(breakdown.total);
    events.push(BoardEvent::RoundComplete {
        round,
        score_delta: breakdown.total,
        score: *score,
    });
    debug!(round, removed = removed.len(), score_delta = breakdown.total, "round complete");

    cascade.pending = find_match_groups(grid);

    let outcome = CascadeOutcome {
        round,
        groups,
        removed,
        moved,
        filled,
        score_delta: breakdown.total,
    };
    cascade.rounds.push(outcome.clone());
    outcome
}

fn finish(cascade: Cascade, events: &mut Vec<BoardEvent>) -> CascadeSummary {
    let capped = !cascade.pending.is_empty();
    let round_count = cascade.executed();
    if capped {
        warn!(
            rounds = round_count,
            remaining_groups = cascade.pending.len(),
            "cascade stopped at round cap with matches left on the board"
        );
    }
    events.push(BoardEvent::CascadeComplete {
        rounds: round_count,
        score_delta: cascade.total,
        capped,
    });
    debug!(rounds = round_count, score_delta = cascade.total, capped, "cascade complete");

    CascadeSummary {
        rounds: cascade.rounds,
        round_count,
        total_score_delta: cascade.total,
        capped,
    }
}
