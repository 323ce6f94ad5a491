//! Game session - owns the board, the tile source and the score
//!
//! A session ties the core pieces together: a [`Grid`], the [`TileSource`] used
//! for initialization and refill, the [`CascadeResolver`], the score and move
//! counters, and the queue of [`BoardEvent`]s a renderer drains with
//! [`Match3Game::take_events`].

use rand::Rng;
use tracing::debug;

use crate::config::{ConfigError, EngineConfig};
use crate::core::{BoardSnapshot, Grid, SimpleRng, TileSource};
use crate::resolver::{CascadeResolver, ResolverState, Step, SwapOutcome, SwapStart};
use crate::selection::{ClickOutcome, Selection};
use crate::types::{BoardError, BoardEvent, Position, Slot, Tile};

/// Result of [`Match3Game::click`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickResult {
    /// The click only changed the selection
    Selection(ClickOutcome),
    /// The click completed a pair and the swap was run
    Swap(SwapOutcome),
}

#[derive(Debug, Clone)]
pub struct Match3Game<S: TileSource = SimpleRng> {
    grid: Grid,
    source: S,
    resolver: CascadeResolver,
    selection: Selection,
    /// Seed of the default tile source, when known
    seed: Option<u64>,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    score: u32,
    /// Accepted swaps, reverted ones included
    moves: u32,
    events: Vec<BoardEvent>,
}

impl Match3Game<SimpleRng> {
    /// Create a session with the default tile source
    ///
    /// Without a configured seed one is drawn from the thread RNG; read it back
    /// with [`seed`](Self::seed) to replay the session.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        debug!(seed, "session seed");
        let mut game = Self::with_source(config, SimpleRng::new(seed))?;
        game.seed = Some(seed);
        Ok(game)
    }
}

impl<S: TileSource> Match3Game<S> {
    /// Create a session drawing tiles from `source`; `config.seed` is ignored
    pub fn with_source(config: EngineConfig, mut source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.rows, config.cols, config.type_count, &mut source)?;
        Ok(Self::from_grid(grid, source, config.max_cascade_rounds))
    }

    /// Wrap an existing board, e.g. a scripted one in tests
    pub fn from_grid(grid: Grid, source: S, max_cascade_rounds: u32) -> Self {
        Self {
            grid,
            source,
            resolver: CascadeResolver::new(max_cascade_rounds),
            selection: Selection::new(),
            seed: None,
            episode_id: 0,
            score: 0,
            moves: 0,
            events: Vec::new(),
        }
    }

    /// Swap two adjacent tiles and resolve the whole cascade
    pub fn request_swap(&mut self, a: Position, b: Position) -> Result<SwapOutcome, BoardError> {
        let outcome = self.resolver.resolve(
            &mut self.grid,
            &mut self.source,
            a,
            b,
            &mut self.score,
            &mut self.events,
        )?;
        self.selection.clear();
        self.moves += 1;
        Ok(outcome)
    }

    /// Swap two adjacent tiles and stop before the first round
    ///
    /// On `SwapStart::Matched`, call [`advance`](Self::advance) until it
    /// returns `Step::Complete`. The session rejects swaps until then.
    pub fn begin_swap(&mut self, a: Position, b: Position) -> Result<SwapStart, BoardError> {
        let start = self
            .resolver
            .begin_swap(&mut self.grid, a, b, &mut self.events)?;
        self.selection.clear();
        self.moves += 1;
        Ok(start)
    }

    pub fn advance(&mut self) -> Result<Step, BoardError> {
        self.resolver.advance(
            &mut self.grid,
            &mut self.source,
            &mut self.score,
            &mut self.events,
        )
    }

    /// Feed one click into the selection; a completed pair runs the swap
    pub fn click(&mut self, pos: Position) -> Result<ClickResult, BoardError> {
        if !self.grid.contains(pos) {
            return Err(BoardError::invalid_position(pos));
        }
        if self.is_busy() {
            return Err(BoardError::Busy);
        }
        match self.selection.click(pos) {
            ClickOutcome::SwapRequested(a, b) => self.request_swap(a, b).map(ClickResult::Swap),
            other => Ok(ClickResult::Selection(other)),
        }
    }

    /// Refill the board from the tile source and reset score and moves
    pub fn restart(&mut self) -> Result<(), BoardError> {
        if self.is_busy() {
            return Err(BoardError::Busy);
        }
        self.grid = Grid::new(
            self.grid.rows(),
            self.grid.cols(),
            self.grid.type_count(),
            &mut self.source,
        )?;
        self.selection.clear();
        self.events.clear();
        self.score = 0;
        self.moves = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        debug!(episode = self.episode_id, "session restarted");
        Ok(())
    }

    /// Drain pending notifications in emission order
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<&Tile> {
        self.grid.tile(row, col)
    }

    pub fn slot(&self, row: usize, col: usize) -> Option<&Slot> {
        self.grid.get(row, col)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.grid.tiles()
    }

    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.grid.is_empty(row, col)
    }

    pub fn count_empty(&self) -> usize {
        self.grid.count_empty()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn selected(&self) -> Option<Position> {
        self.selection.selected()
    }

    pub fn is_busy(&self) -> bool {
        self.resolver.is_busy()
    }

    pub fn state(&self) -> ResolverState {
        self.resolver.state()
    }

    pub fn max_cascade_rounds(&self) -> u32 {
        self.resolver.max_rounds()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        self.grid.snapshot_board_into(out);
        out.score = self.score;
        out.busy = self.is_busy();
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedSequence;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn scripted_game() -> Match3Game<FixedSequence> {
        let grid = Grid::from_types(&[[0, 0, 1], [1, 2, 0], [2, 1, 2]], 3).unwrap();
        Match3Game::from_grid(grid, FixedSequence::new(vec![2, 1, 0]), 10)
    }

    #[test]
    fn test_new_game_is_full_and_idle() {
        let game = Match3Game::new(EngineConfig::default().with_seed(12345)).unwrap();
        assert_eq!(game.grid().rows(), 10);
        assert_eq!(game.grid().cols(), 8);
        assert_eq!(game.count_empty(), 0);
        assert!(game.tiles().all(|t| t.kind < 6));
        assert_eq!(game.seed(), Some(12345));
        assert_eq!(game.score(), 0);
        assert!(!game.is_busy());
        assert_eq!(game.state(), ResolverState::Idle);
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = Match3Game::new(EngineConfig::default().with_seed(7)).unwrap();
        let b = Match3Game::new(EngineConfig::default().with_seed(7)).unwrap();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_unseeded_game_reports_its_seed() {
        let game = Match3Game::new(EngineConfig::default()).unwrap();
        let seed = game.seed().unwrap();
        let replay = Match3Game::new(EngineConfig::default().with_seed(seed)).unwrap();
        assert_eq!(game.grid(), replay.grid());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            cols: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Match3Game::new(config),
            Err(ConfigError::InvalidDimensions { rows: 10, cols: 0 })
        ));
    }

    #[test]
    fn test_request_swap_scores_and_counts_moves() {
        let mut game = scripted_game();
        let outcome = game.request_swap(p(1, 2), p(0, 2)).unwrap();

        assert!(outcome.is_matched());
        assert_eq!(outcome.score_delta(), 5);
        assert_eq!(game.score(), 5);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.count_empty(), 0);
    }

    #[test]
    fn test_reverted_swap_counts_as_move() {
        let mut game = scripted_game();
        assert_eq!(game.request_swap(p(2, 0), p(2, 1)).unwrap(), SwapOutcome::Reverted);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_rejected_swap_is_not_a_move() {
        let mut game = scripted_game();
        assert!(game.request_swap(p(0, 0), p(2, 2)).is_err());
        assert_eq!(game.moves(), 0);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_busy_session_rejects_input() {
        let mut game = scripted_game();
        game.begin_swap(p(1, 2), p(0, 2)).unwrap();

        assert!(game.is_busy());
        assert!(game.snapshot().busy);
        assert_eq!(game.request_swap(p(2, 0), p(2, 1)), Err(BoardError::Busy));
        assert_eq!(game.click(p(0, 0)), Err(BoardError::Busy));
        assert_eq!(game.restart(), Err(BoardError::Busy));

        while let Step::Round(_) = game.advance().unwrap() {}
        assert!(!game.is_busy());
        assert_eq!(game.advance(), Err(BoardError::NoCascadeInProgress));
    }

    #[test]
    fn test_click_pair_runs_swap() {
        let mut game = scripted_game();
        assert_eq!(
            game.click(p(1, 2)).unwrap(),
            ClickResult::Selection(ClickOutcome::Selected(p(1, 2)))
        );
        let result = game.click(p(0, 2)).unwrap();
        let ClickResult::Swap(outcome) = result else {
            panic!("expected a swap");
        };
        assert!(outcome.is_matched());
        assert_eq!(game.selected(), None);
        assert_eq!(game.click(p(9, 9)), Err(BoardError::InvalidPosition { row: 9, col: 9 }));
    }

    #[test]
    fn test_take_events_drains() {
        let mut game = scripted_game();
        game.request_swap(p(1, 2), p(0, 2)).unwrap();
        let events = game.take_events();
        assert_eq!(events.first(), Some(&BoardEvent::SwapApplied { a: p(1, 2), b: p(0, 2) }));
        assert!(matches!(events.last(), Some(BoardEvent::CascadeComplete { .. })));
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut game = Match3Game::new(EngineConfig::default().with_seed(3)).unwrap();
        let before = game.grid().clone();
        game.restart().unwrap();
        assert_eq!(game.episode_id(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.count_empty(), 0);
        assert_ne!(game.grid(), &before);
    }

    #[test]
    fn test_slot_and_source_queries() {
        let mut game = scripted_game();
        assert_eq!(game.slot(0, 2).and_then(Slot::kind), Some(1));
        assert_eq!(game.slot(3, 0), None);
        assert_eq!(game.source().draws(), 0);

        game.request_swap(p(1, 2), p(0, 2)).unwrap();
        assert!(game.slot(0, 0).is_some_and(|s| !s.is_empty()));
        assert_eq!(game.source().draws(), 3);
    }

    #[test]
    fn test_snapshot_carries_session_state() {
        let mut game = scripted_game();
        game.request_swap(p(1, 2), p(0, 2)).unwrap();

        let mut snap = BoardSnapshot::default();
        game.snapshot_into(&mut snap);
        assert_eq!(snap.score, 5);
        assert!(!snap.busy);
        assert_eq!(snap.empty, 0);
        assert_eq!(snap.cell(0, 0), Some(game.grid().kind_at(0, 0)));
        assert_eq!(snap, game.snapshot());
    }
}
