//! RPS Arena - rock/paper/scissors tokens on a bounded board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tokens, players, step phases, driver)
//! - `settings`: Tunable parameters with validation and persistence
//! - `render`: Read-only projection of the simulation for a UI
//! - `error`: Configuration errors

pub mod error;
pub mod render;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{SimError, SimResult};
pub use render::{PlayerView, Scoreboard, Snapshot, TokenView};
pub use settings::{ParamRange, SimSettings};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Radius given to freshly created tokens
    pub const DEFAULT_TOKEN_RADIUS: f32 = 10.0;

    /// Default board dimensions
    pub const DEFAULT_BOARD_WIDTH: f32 = 500.0;
    pub const DEFAULT_BOARD_HEIGHT: f32 = 500.0;

    /// Default physics tuning (matches the stock browser setup)
    pub const DEFAULT_FRICTION: f32 = 0.96;
    pub const DEFAULT_NUDGE_FORCE: f32 = 2.0;
    pub const DEFAULT_COLLISION_DAMPENING: f32 = 0.5;
    pub const DEFAULT_ACTIONS_PER_STEP: u32 = 1;
    pub const DEFAULT_STEPS_PER_SECOND: f32 = 60.0;

    /// Dead-zone threshold used by the early prototype's friction snap
    pub const LEGACY_FRICTION_DEAD_ZONE: f32 = 0.01;
}

/// Heading of a force vector in radians, 0 pointing right (+x).
///
/// Screen space has +y pointing down, so positive angles turn clockwise.
#[inline]
pub fn rotation_from_forces(forces: Vec2) -> f32 {
    if forces == Vec2::ZERO {
        return 0.0;
    }
    forces.y.atan2(forces.x)
}
