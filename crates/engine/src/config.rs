//! Engine configuration
//!
//! Sources, in order of preference for callers:
//! - [`EngineConfig::default`]: 10 rows, 8 cols, 6 tile types, cap of 10 rounds
//! - [`EngineConfig::from_env`]: `MATCH3_*` environment variables
//! - [`EngineConfig::from_json`]: a JSON document, missing fields take defaults

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::types::{
    BoardError, DEFAULT_COLS, DEFAULT_MAX_CASCADE_ROUNDS, DEFAULT_ROWS, DEFAULT_TYPE_COUNT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board must have at least one row and one column (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("type count must be at least 1")]
    InvalidTypeCount,
    #[error("cascade round cap must be at least 1")]
    InvalidRoundCap,
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Board and cascade settings for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    pub type_count: u8,
    /// Safety cap on cascade rounds per swap
    pub max_cascade_rounds: u32,
    /// Tile source seed; `None` draws one from the thread RNG
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            type_count: DEFAULT_TYPE_COUNT,
            max_cascade_rounds: DEFAULT_MAX_CASCADE_ROUNDS,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Read `MATCH3_ROWS`, `MATCH3_COLS`, `MATCH3_TYPES`, `MATCH3_MAX_ROUNDS` and
    /// `MATCH3_SEED`. Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            lookup(key).and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            rows: parsed(&lookup, "MATCH3_ROWS").unwrap_or(defaults.rows),
            cols: parsed(&lookup, "MATCH3_COLS").unwrap_or(defaults.cols),
            type_count: parsed(&lookup, "MATCH3_TYPES").unwrap_or(defaults.type_count),
            max_cascade_rounds: parsed(&lookup, "MATCH3_MAX_ROUNDS")
                .unwrap_or(defaults.max_cascade_rounds),
            seed: parsed(&lookup, "MATCH3_SEED"),
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("failed to parse engine config")?;
        config.validate().context("invalid engine config")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.type_count == 0 {
            return Err(ConfigError::InvalidTypeCount);
        }
        if self.max_cascade_rounds == 0 {
            return Err(ConfigError::InvalidRoundCap);
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
