//! Tetris Ultimate (workspace facade crate).
//!
//! Re-exports the workspace crates as `tetris_ultimate::{core, engine, types}`
//! and hosts the headless runner used by the default binary.

pub use tetris_ultimate_core as core;
pub use tetris_ultimate_engine as engine;
pub use tetris_ultimate_types as types;

pub mod run;
