//! Shared data types and default constants
//!
//! Everything in this crate is plain data: piece kinds, rotations, player
//! intents, power-up kinds and the per-lock event record. The simulation lives
//! in `tetris-ultimate-core`; the AI and demo orchestration in
//! `tetris-ultimate-engine`.
//!
//! # Grid
//!
//! - **Width**: 10 columns by default (indexed left to right)
//! - **Height**: 20 rows by default (row 0 is the top)
//! - **Spawn**: `((width - 4) / 2, 0)`, orientation North
//!
//! # Timing defaults
//!
//! All timing values are milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Driver tick interval (~60 FPS) |
//! | `INITIAL_FALL_MS` | 1000 | Gravity interval at level 1 |
//! | `LEVEL_SPEED_DECREASE_MS` | 100 | Interval shaved off per level |
//! | `MIN_FALL_MS` | 100 | Gravity floor |
//! | `LOCK_DELAY_MS` | 450 | Grace period once grounded |
//! | `PRECISION_LOCK_DELAY_MS` | 2000 | Grace period while Precision-Lock is active |
//! | `CLEAR_ANIMATION_MS` | 500 | Cleared rows stay visible this long |
//!
//! # Examples
//!
//! ```
//! use tetris_ultimate_types::{GameAction, PieceKind, Rotation};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_index(5), Rotation::East);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! ```

use serde::{Deserialize, Serialize};

/// Default grid width in cells
pub const GRID_WIDTH: u8 = 10;

/// Default grid height in cells
pub const GRID_HEIGHT: u8 = 20;

/// Driver tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1
pub const INITIAL_FALL_MS: u32 = 1000;

/// Gravity interval reduction per level above 1
pub const LEVEL_SPEED_DECREASE_MS: u32 = 100;

/// Gravity interval floor
pub const MIN_FALL_MS: u32 = 100;

/// Lock delay when a piece is grounded
pub const LOCK_DELAY_MS: u32 = 450;

/// Lock delay while Precision-Lock is active
pub const PRECISION_LOCK_DELAY_MS: u32 = 2000;

/// Duration of the line-clear animation window
pub const CLEAR_ANIMATION_MS: u32 = 500;

/// Total lines needed per level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points for clearing N lines (index = lines), multiplied by level
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per row for a soft drop step
pub const SOFT_DROP_BONUS: u32 = 1;

/// Points per row for a hard drop
pub const HARD_DROP_BONUS: u32 = 2;

/// Multiplier applied to the first clear of a combo streak
pub const COMBO_MULTIPLIER_BASE: f64 = 1.0;

/// Multiplier growth per consecutive clearing lock
pub const COMBO_MULTIPLIER_INCREMENT: f64 = 1.0;

/// Multiplier cap
pub const MAX_COMBO_MULTIPLIER: f64 = 5.0;

/// Number of upcoming pieces exposed in the preview
pub const NEXT_PREVIEW_LEN: usize = 5;

/// The seven tetromino piece kinds
///
/// - **I**: straight bar
/// - **O**: 2x2 square
/// - **T**, **S**, **Z**, **J**, **L**: the five three-wide shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in bag order before shuffling
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Colour id used in `u8` grid exports (0 is reserved for empty)
    pub fn color_id(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }
}

/// Colour id of a rising (garbage) row cell in `u8` grid exports
pub const GARBAGE_COLOR_ID: u8 = 8;

/// Orientation states, cycling North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Orientation index 0-3
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Orientation from any index, taken modulo 4
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    /// `(index + direction) mod 4`; +1 is clockwise, -1 counter-clockwise
    ///
    /// ```
    /// use tetris_ultimate_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate(-1), Rotation::West);
    /// assert_eq!(Rotation::West.rotate(2), Rotation::East);
    /// ```
    pub fn rotate(&self, direction: i8) -> Self {
        let next = (self.index() as i8 + direction).rem_euclid(4);
        Self::from_index(next as u8)
    }

    pub fn rotate_cw(&self) -> Self {
        self.rotate(1)
    }

    pub fn rotate_ccw(&self) -> Self {
        self.rotate(-1)
    }

    /// Number of clockwise quarter turns needed to reach `target`
    pub fn cw_steps_to(&self, target: Rotation) -> u8 {
        (target.index() + 4 - self.index()) % 4
    }
}

/// Intents delivered by the driver (human input or the demo pilot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down, awarding the soft-drop bonus
    SoftDrop,
    /// Drop to the ghost row and lock immediately
    HardDrop,
    /// Rotate 90° clockwise with wall kicks
    RotateCw,
    /// Rotate 90° counter-clockwise with wall kicks
    RotateCcw,
    /// Swap with the hold slot (once per piece)
    Hold,
    /// Spend one Line-Bomb use
    ActivateBomb,
    /// Insert a rising row now (manual rising mode only)
    TriggerRise,
    /// Switch the AI demo player on or off
    ToggleDemo,
    /// Toggle pause
    Pause,
    /// Reinitialise the game
    Restart,
}

impl GameAction {
    /// Parse an action from its camelCase name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "activatebomb" => Some(GameAction::ActivateBomb),
            "triggerrise" => Some(GameAction::TriggerRise),
            "toggledemo" => Some(GameAction::ToggleDemo),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::ActivateBomb => "activateBomb",
            GameAction::TriggerRise => "triggerRise",
            GameAction::ToggleDemo => "toggleDemo",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }

    /// Actions that steer the active piece (ignored from humans in demo mode)
    pub fn is_piece_control(&self) -> bool {
        matches!(
            self,
            GameAction::MoveLeft
                | GameAction::MoveRight
                | GameAction::SoftDrop
                | GameAction::HardDrop
                | GameAction::RotateCw
                | GameAction::RotateCcw
                | GameAction::Hold
                | GameAction::ActivateBomb
                | GameAction::TriggerRise
        )
    }
}

/// Power-up kinds carried by charged blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Gravity interval doubled while active
    TimeDilator,
    /// Line-clear totals doubled while active
    ScoreAmplifier,
    /// One use clears the lowest occupied row
    LineBomb,
    /// Pieces pass through blocks sideways and lock over them
    PhantomMode,
    /// Extended lock delay while active
    PrecisionLock,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::TimeDilator,
        PowerUpKind::ScoreAmplifier,
        PowerUpKind::LineBomb,
        PowerUpKind::PhantomMode,
        PowerUpKind::PrecisionLock,
    ];

    /// Dense index for array-backed tables
    pub fn index(&self) -> usize {
        match self {
            PowerUpKind::TimeDilator => 0,
            PowerUpKind::ScoreAmplifier => 1,
            PowerUpKind::LineBomb => 2,
            PowerUpKind::PhantomMode => 3,
            PowerUpKind::PrecisionLock => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::TimeDilator => "time_dilator",
            PowerUpKind::ScoreAmplifier => "score_amplifier",
            PowerUpKind::LineBomb => "line_bomb",
            PowerUpKind::PhantomMode => "phantom_mode",
            PowerUpKind::PrecisionLock => "precision_lock",
        }
    }

    /// Whether the kind decays by use rather than by time
    pub fn is_use_based(&self) -> bool {
        matches!(self, PowerUpKind::LineBomb | PowerUpKind::PhantomMode)
    }
}

/// Rising-lines operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RisingMode {
    /// No rows are ever inserted
    #[default]
    Off,
    /// Interval shrinks with level
    Pressure,
    /// Fixed interval
    Survival,
    /// Player-triggered with a cooldown
    Manual,
}

/// Coarse state-machine phase for presentation and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Spawning,
    Falling,
    Locking,
    LineClearAnimating,
    GameOver,
}

/// Event emitted after a piece locks.
///
/// Observers drain it with `GameState::take_last_event`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    /// Points from the line clear (drop bonuses excluded)
    pub line_clear_score: u32,
    /// Combo counter after this lock
    pub combo: u32,
    /// Multiplier applied to this clear (base when nothing cleared)
    pub multiplier: f64,
    /// Power-ups activated by charged blocks in the cleared rows
    pub activated: Vec<PowerUpKind>,
    /// Whether the lock overwrote blocks under Phantom mode
    pub phantom: bool,
}
