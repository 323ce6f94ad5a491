//! RNG module - injectable tile type sources
//!
//! Every random draw the board makes (initial fill and refill) goes through a
//! [`TileSource`], so a seeded source reproduces a whole game.
//!
//! - [`SimpleRng`]: small deterministic LCG, the default source
//! - [`RandSource`]: adapts any `rand` generator
//! - [`FixedSequence`]: replays a scripted list of types, for tests

use rand::{Rng, SeedableRng};

use crate::types::TileType;

/// Anything that can hand out tile types in `[0, type_count)`
pub trait TileSource {
    /// Draw the next tile type. `type_count` is always at least 1.
    fn next_type(&mut self, type_count: u8) -> TileType;
}

impl<T: TileSource + ?Sized> TileSource for &mut T {
    fn next_type(&mut self, type_count: u8) -> TileType {
        (**self).next_type(type_count)
    }
}

impl<T: TileSource + ?Sized> TileSource for Box<T> {
    fn next_type(&mut self, type_count: u8) -> TileType {
        (**self).next_type(type_count)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses Knuth's MMIX constants and returns the high half of the state
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // Avoid 0 seed so the first outputs are not degenerate
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max.max(1)
    }

    /// Current internal state (feeding it back to `new` resumes the sequence)
    pub fn state(&self) -> u64 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TileSource for SimpleRng {
    fn next_type(&mut self, type_count: u8) -> TileType {
        self.next_range(u32::from(type_count)) as TileType
    }
}

/// Adapter that draws tile types from any `rand` generator
#[derive(Debug, Clone)]
pub struct RandSource<R> {
    rng: R,
}

impl<R: Rng> RandSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RandSource<rand::rngs::StdRng> {
    /// Seeded `StdRng`-backed source
    pub fn seeded(seed: u64) -> Self {
        Self::new(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TileSource for RandSource<R> {
    fn next_type(&mut self, type_count: u8) -> TileType {
        self.rng.random_range(0..type_count.max(1))
    }
}

/// Scripted source that cycles through a fixed list of types
///
/// Values are reduced modulo `type_count`, so any script stays in range.
/// An empty script always yields type 0.
#[derive(Debug, Clone, Default)]
pub struct FixedSequence {
    types: Vec<TileType>,
    index: usize,
}

impl FixedSequence {
    pub fn new(types: Vec<TileType>) -> Self {
        Self { types, index: 0 }
    }

    /// A source that always returns the same type
    pub fn constant(kind: TileType) -> Self {
        Self::new(vec![kind])
    }

    /// Number of draws made so far
    pub fn draws(&self) -> usize {
        self.index
    }
}

impl TileSource for FixedSequence {
    fn next_type(&mut self, type_count: u8) -> TileType {
        if self.types.is_empty() {
            self.index += 1;
            return 0;
        }
        let kind = self.types[self.index % self.types.len()];
        self.index += 1;
        kind % type_count.max(1)
    }
}
