//! Error types for the simulation core
//!
//! Illegal moves, rotations and empty-handed power-up uses are not errors:
//! they are silent no-ops reported as `false` by `GameState::apply_action`.

use thiserror::Error;

/// Failures reported by [`Grid`](crate::grid::Grid) mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// A lock was attempted where the shape does not fit.
    ///
    /// Callers validate with `can_place` first, so this indicates a bug.
    #[error("invalid lock at ({x}, {y})")]
    InvalidLock { x: i8, y: i8 },
    /// A bottom-row insertion would push a block above row 0.
    #[error("stack overflow: top row is occupied")]
    Overflow,
}

/// Failures while loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::Invalid(msg.into())
    }
}
