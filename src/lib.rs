//! Match-3 board resolution engine (workspace facade crate).
//!
//! This package exposes `match3::{types,core,engine}` while the implementation
//! lives in dedicated crates under `crates/`.

pub use match3_core as core;
pub use match3_engine as engine;
pub use match3_types as types;
