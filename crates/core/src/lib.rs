//! Core game logic - pure, deterministic, and testable
//!
//! All rules and simulation state live here. Nothing in this crate touches a
//! terminal, clock or file other than [`GameConfig::load`]; time advances only
//! through the `elapsed_ms` passed to [`GameState::tick`].
//!
//! - **Deterministic**: the same seed and intent stream reproduce a game exactly
//! - **Headless**: drive it from a renderer, the demo pilot or a test
//!
//! # Module Structure
//!
//! - [`grid`]: playfield matrix, collision, line clears and rising rows
//! - [`pieces`]: tetromino shapes and SRS rotation with wall kicks
//! - [`rng`]: 7-bag piece queue
//! - [`scoring`]: line, combo and drop scores, level and gravity
//! - [`powerups`]: charged blocks and active effects
//! - [`rising`]: garbage-row countdown
//! - [`game_state`]: the piece controller that ties everything together
//! - [`config`]: tunables, difficulty presets and JSON loading
//!
//! # Example
//!
//! ```
//! use tetris_ultimate_core::{GameConfig, GameState};
//! use tetris_ultimate_core::types::GameAction;
//!
//! let mut game = GameState::new(GameConfig::default(), 12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.score() > 0); // hard drop bonus
//! assert_eq!(game.pieces_locked(), 1);
//! ```
//!
//! # Timing
//!
//! - **Tick**: callers pass elapsed milliseconds (16 ms frames by convention)
//! - **Gravity**: 1000 ms at level 1, 100 ms faster per level, floor 100 ms
//! - **Lock delay**: 450 ms once grounded (2000 ms under Precision-Lock)
//! - **Clear animation**: 500 ms before cleared rows are removed

pub mod config;
pub mod error;
pub mod game_state;
pub mod grid;
pub mod pieces;
pub mod powerups;
pub mod rising;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_ultimate_types as types;

// Re-export commonly used types for convenience
pub use config::{AiWeights, DemoConfig, Difficulty, GameConfig};
pub use error::{ConfigError, GridError};
pub use game_state::{GameState, HeldPiece, Phase, Tetromino};
pub use grid::{Block, Cell, CellTag, Grid};
pub use pieces::{get_shape, try_rotate, PieceShape, PowerTag};
pub use powerups::{ActiveEffect, PowerUps};
pub use rising::RisingLines;
pub use rng::PieceQueue;
pub use scoring::{calculate_drop_score, calculate_score, ScoreResult};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
