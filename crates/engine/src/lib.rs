//! Session layer over the core board rules
//!
//! - [`resolver`]: the cascade state machine (validate, swap, resolve rounds, revert)
//! - [`session`]: [`Match3Game`], one board with its tile source, score and event queue
//! - [`config`]: [`EngineConfig`] from defaults, environment or JSON
//! - [`selection`]: the two-click swap selection protocol
//!
//! # Example
//!
//! ```
//! use match3_engine::{EngineConfig, Match3Game, Step, SwapStart};
//! use match3_engine::types::Position;
//!
//! let mut game = Match3Game::new(EngineConfig::default().with_seed(42)).unwrap();
//!
//! // Round by round, e.g. to animate between rounds
//! match game.begin_swap(Position::new(0, 0), Position::new(0, 1)) {
//!     Ok(SwapStart::Matched { .. }) => {
//!         while let Ok(Step::Round(round)) = game.advance() {
//!             assert!(round.score_delta > 0);
//!         }
//!     }
//!     Ok(SwapStart::Reverted) => assert_eq!(game.score(), 0),
//!     Err(err) => panic!("{err}"),
//! }
//!
//! assert!(!game.is_busy());
//! assert_eq!(game.count_empty(), 0);
//! ```

pub mod config;
pub mod resolver;
pub mod selection;
pub mod session;

pub use match3_core as core;
pub use match3_types as types;

pub use config::{ConfigError, EngineConfig};
pub use resolver::{
    CascadeOutcome, CascadeResolver, CascadeSummary, ResolverState, Step, SwapOutcome, SwapStart,
};
pub use selection::{ClickOutcome, Selection};
pub use session::{ClickResult, Match3Game};
