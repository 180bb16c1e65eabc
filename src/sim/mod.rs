//! Deterministic simulation module
//!
//! All token logic lives here. This module must be pure and deterministic:
//! - One discrete step per tick, no wall-clock time inside a step
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the live lists)
//! - No rendering or platform dependencies

pub mod board;
pub mod driver;
pub mod player;
pub mod state;
pub mod tick;
pub mod token;

pub use board::{Board, SimRng, seeded_rng};
pub use driver::{Driver, MAX_SUBSTEPS};
pub use player::{ActorView, Nudge, Player, PlayerId, PlayerKind};
pub use state::{SimPhase, SimState};
pub use tick::{StepReport, step};
pub use token::{
    Direction, IntersectionProtocol, Removals, Resolution, Token, TokenId, TokenType, settle_intersections,
};
