//! Board bounds and random sampling helpers
//!
//! The board spans `[0, width] x [0, height]` with the origin at the top left.
//! Walls act on token centres, not on their edges.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::SimSettings;

/// RNG used for every random draw in the simulation
pub type SimRng = Pcg32;

/// Seeded simulation RNG
pub fn seeded_rng(seed: u64) -> SimRng {
    Pcg32::seed_from_u64(seed)
}

/// Rectangular play area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    pub width: f32,
    pub height: f32,
}

impl Board {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_settings(settings: &SimSettings) -> Self {
        Self::new(settings.board_width, settings.board_height)
    }

    /// Per-axis penetration past a wall.
    ///
    /// Negative when past the low edge, positive excess past the high edge,
    /// zero on an axis that is inside the board.
    pub fn penetration(&self, pos: Vec2) -> Vec2 {
        Vec2::new(axis_penetration(pos.x, self.width), axis_penetration(pos.y, self.height))
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }

    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x.clamp(0.0, self.width), pos.y.clamp(0.0, self.height))
    }

    /// Uniform integer point in `[0, width) x [0, height)`
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let x = (rng.random::<f32>() * self.width).floor();
        let y = (rng.random::<f32>() * self.height).floor();
        // f32 rounding can land exactly on the far edge for tiny boards
        Vec2::new(x.min((self.width - 1.0).max(0.0)), y.min((self.height - 1.0).max(0.0)))
    }
}

#[inline]
fn axis_penetration(value: f32, max: f32) -> f32 {
    if value < 0.0 {
        value
    } else if value > max {
        value - max
    } else {
        0.0
    }
}
