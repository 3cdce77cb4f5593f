//! RNG module - seedable random source for piece selection
//!
//! Spawning draws a kind uniformly from the seven tetrominoes and a color
//! uniformly from the palette. The source is an explicit value owned by the
//! game, so the same seed always replays the same sequence of pieces.

use crate::types::{Color, PieceKind};

/// Random source used by the engine when spawning pieces
pub trait PieceRng {
    /// Generate random value in range [0, max)
    fn next_range(&mut self, max: u32) -> u32;

    /// Pick a piece kind uniformly
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_range(PieceKind::ALL.len() as u32) as usize]
    }

    /// Pick a palette color uniformly
    fn next_color(&mut self) -> Color {
        Color::PALETTE[self.next_range(Color::PALETTE.len() as u32) as usize]
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current generator state; `SimpleRng::new(rng.state())` continues the same sequence
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl PieceRng for SimpleRng {
    fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 16) % max.max(1)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
