use arrayvec::ArrayVec;
use serde::Serialize;

use crate::game_state::{HeldPiece, Tetromino};
use crate::pieces::PowerTag;
use crate::powerups::PowerUpStatus;
use crate::types::{PhaseKind, PieceKind, PowerUpKind, RisingMode, Rotation, NEXT_PREVIEW_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Absolute cell coordinates
    pub cells: [(i8, i8); 4],
    pub power: Option<PowerTag>,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
            power: value.power,
        }
    }
}

/// A locked block carrying a charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PowerCell {
    pub x: u8,
    pub y: u8,
    pub kind: PowerUpKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RisingSnapshot {
    pub mode: RisingMode,
    pub countdown_ms: u32,
    pub warning: bool,
    pub cooldown_ms: u32,
}

/// Read-only view of a game for renderers, loggers and the AI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major color ids, 0 = empty
    pub grid: Vec<Vec<u8>>,
    pub power_cells: Vec<PowerCell>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub hold: Option<HeldPiece>,
    pub next_queue: [PieceKind; NEXT_PREVIEW_LEN],
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub combo_multiplier: f64,
    pub power_ups: ArrayVec<PowerUpStatus, 5>,
    pub rising: RisingSnapshot,
    pub phase: PhaseKind,
    /// Rows shown as clearing during the animation window
    pub clearing_rows: Vec<usize>,
    pub paused: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub pieces_locked: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            grid: Vec::new(),
            power_cells: Vec::new(),
            active: None,
            ghost_y: None,
            hold: None,
            next_queue: [PieceKind::I; NEXT_PREVIEW_LEN],
            can_hold: true,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            combo_multiplier: 1.0,
            power_ups: ArrayVec::new(),
            rising: RisingSnapshot::default(),
            phase: PhaseKind::Spawning,
            clearing_rows: Vec::new(),
            paused: false,
            game_over: false,
            episode_id: 0,
            pieces_locked: 0,
        }
    }
}
