//! Error types for the simulation core.

use thiserror::Error;

/// Errors raised at the configuration boundary.
///
/// Values are rejected rather than clamped so the physics stays reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A parameter is outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A token type name that is not rock, paper or scissors.
    #[error("unknown token type: {0}")]
    UnknownTokenType(String),
}

/// Result alias for fallible simulation calls.
pub type SimResult<T> = Result<T, SimError>;
