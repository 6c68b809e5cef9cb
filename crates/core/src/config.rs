//! Session configuration
//!
//! `GameConfig` is an immutable record handed to `GameState::new`. Overrides are
//! made by constructing with different fields (or struct update syntax), or by
//! applying one of the difficulty presets. Every section deserializes with
//! defaults, so a JSON file only needs the keys it changes:
//!
//! ```
//! use tetris_ultimate_core::GameConfig;
//! use tetris_ultimate_types::RisingMode;
//!
//! let cfg = GameConfig::from_json_str(r#"{"rising": {"mode": "pressure"}}"#).unwrap();
//! assert_eq!(cfg.rising.mode, RisingMode::Pressure);
//! assert_eq!(cfg.grid.width, 10);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: u8,
    pub height: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub initial_fall_ms: u32,
    pub level_speed_decrease_ms: u32,
    pub min_fall_ms: u32,
    pub lock_delay_ms: u32,
    pub clear_animation_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_fall_ms: INITIAL_FALL_MS,
            level_speed_decrease_ms: LEVEL_SPEED_DECREASE_MS,
            min_fall_ms: MIN_FALL_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            clear_animation_ms: CLEAR_ANIMATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base points indexed by lines cleared (index 0 unused)
    pub line_scores: [u32; 5],
    pub soft_drop_bonus: u32,
    pub hard_drop_bonus: u32,
    pub lines_per_level: u32,
    pub combo_multiplier_base: f64,
    pub combo_multiplier_increment: f64,
    pub max_combo_multiplier: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            line_scores: LINE_SCORES,
            soft_drop_bonus: SOFT_DROP_BONUS,
            hard_drop_bonus: HARD_DROP_BONUS,
            lines_per_level: LINES_PER_LEVEL,
            combo_multiplier_base: COMBO_MULTIPLIER_BASE,
            combo_multiplier_increment: COMBO_MULTIPLIER_INCREMENT,
            max_combo_multiplier: MAX_COMBO_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Charged-block tagging on spawn
    pub enabled: bool,
    /// Probability that a freshly spawned piece carries a charge
    pub spawn_chance: f64,
    /// Kinds eligible for tagging
    pub kinds: Vec<PowerUpKind>,
    pub time_dilator_ms: u32,
    pub score_amplifier_ms: u32,
    pub precision_lock_ms: u32,
    pub precision_lock_delay_ms: u32,
    pub line_bomb_uses: u32,
    pub phantom_uses: u32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_chance: 0.05,
            kinds: PowerUpKind::ALL.to_vec(),
            time_dilator_ms: 10_000,
            score_amplifier_ms: 8_000,
            precision_lock_ms: 2_000,
            precision_lock_delay_ms: PRECISION_LOCK_DELAY_MS,
            line_bomb_uses: 1,
            phantom_uses: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RisingConfig {
    pub mode: RisingMode,
    pub initial_interval_ms: u32,
    pub interval_decrease_ms: u32,
    pub min_interval_ms: u32,
    pub survival_interval_ms: u32,
    pub manual_cooldown_ms: u32,
    /// Warning flag is raised when the countdown drops to this value
    pub warning_ms: u32,
    /// Countdown is frozen for this long after each rise
    pub animation_ms: u32,
    pub holes_min: u8,
    pub holes_max: u8,
}

impl Default for RisingConfig {
    fn default() -> Self {
        Self {
            mode: RisingMode::Off,
            initial_interval_ms: 30_000,
            interval_decrease_ms: 2_000,
            min_interval_ms: 10_000,
            survival_interval_ms: 12_000,
            manual_cooldown_ms: 5_000,
            warning_ms: 5_000,
            animation_ms: 300,
            holes_min: 1,
            holes_max: 3,
        }
    }
}

/// Pacing of the AI demo player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Start sessions in demo mode
    pub auto_start: bool,
    /// Fall back into demo mode after a game over
    pub after_game_over: bool,
    pub game_over_delay_ms: u32,
    /// Pause before planning a new piece
    pub move_delay_ms: u32,
    pub rotation_delay_ms: u32,
    pub horizontal_delay_ms: u32,
    /// Pause before the final hard drop
    pub drop_delay_ms: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            after_game_over: true,
            game_over_delay_ms: 3_000,
            move_delay_ms: 150,
            rotation_delay_ms: 50,
            horizontal_delay_ms: 30,
            drop_delay_ms: 100,
        }
    }
}

/// Placement heuristic weights
///
/// `score = lines*lines_cleared - max_height*max_height - holes*holes_created
///          - bumpiness*bumpiness + well*deepest_well`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiWeights {
    pub lines: f64,
    pub max_height: f64,
    pub holes: f64,
    pub bumpiness: f64,
    pub well: f64,
}

impl Default for AiWeights {
    fn default() -> Self {
        Self {
            lines: 1000.0,
            max_height: 500.0,
            holes: 350.0,
            bumpiness: 10.0,
            well: 0.0,
        }
    }
}

/// Difficulty presets adjusting gravity and rising-line pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }
}

/// Complete, read-only session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub power_ups: PowerUpConfig,
    pub rising: RisingConfig,
    pub demo: DemoConfig,
    pub ai: AiWeights,
    pub hold_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            timing: TimingConfig::default(),
            scoring: ScoringConfig::default(),
            power_ups: PowerUpConfig::default(),
            rising: RisingConfig::default(),
            demo: DemoConfig::default(),
            ai: AiWeights::default(),
            hold_enabled: true,
        }
    }
}

impl GameConfig {
    /// Apply a difficulty preset on top of this config
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        // (initial fall, per-level decrease, fall floor, rise initial, rise decrease, rise floor)
        let (fall, fall_dec, fall_min, rise, rise_dec, rise_min) = match difficulty {
            Difficulty::Easy => (1500, 80, 200, 40_000, 1_500, 15_000),
            Difficulty::Medium => (1000, 100, 100, 30_000, 2_000, 10_000),
            Difficulty::Hard => (700, 120, 50, 25_000, 2_500, 8_000),
            Difficulty::Expert => (400, 150, 30, 20_000, 3_000, 5_000),
        };
        self.timing.initial_fall_ms = fall;
        self.timing.level_speed_decrease_ms = fall_dec;
        self.timing.min_fall_ms = fall_min;
        self.rising.initial_interval_ms = rise;
        self.rising.interval_decrease_ms = rise_dec;
        self.rising.min_interval_ms = rise_min;
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.grid;
        if g.width < 4 || g.height < 4 {
            return Err(ConfigError::invalid("grid must be at least 4x4"));
        }
        if g.width > 64 || g.height > 64 {
            return Err(ConfigError::invalid("grid must be at most 64x64"));
        }

        if self.timing.min_fall_ms == 0 {
            return Err(ConfigError::invalid("timing.min_fall_ms must be positive"));
        }

        let s = &self.scoring;
        if s.lines_per_level == 0 {
            return Err(ConfigError::invalid("scoring.lines_per_level must be positive"));
        }
        for (name, v) in [
            ("combo_multiplier_base", s.combo_multiplier_base),
            ("combo_multiplier_increment", s.combo_multiplier_increment),
            ("max_combo_multiplier", s.max_combo_multiplier),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::invalid(format!(
                    "scoring.{name} must be finite and non-negative"
                )));
            }
        }
        if s.max_combo_multiplier < s.combo_multiplier_base {
            return Err(ConfigError::invalid(
                "scoring.max_combo_multiplier is below combo_multiplier_base",
            ));
        }

        let p = &self.power_ups;
        if !(0.0..=1.0).contains(&p.spawn_chance) {
            return Err(ConfigError::invalid("power_ups.spawn_chance must be in [0, 1]"));
        }
        if p.enabled && p.spawn_chance > 0.0 && p.kinds.is_empty() {
            return Err(ConfigError::invalid("power_ups.kinds is empty"));
        }

        let r = &self.rising;
        if r.holes_min == 0 || r.holes_min > r.holes_max {
            return Err(ConfigError::invalid(
                "rising.holes_min must be in 1..=holes_max",
            ));
        }
        if r.holes_min >= g.width {
            return Err(ConfigError::invalid("rising.holes_min leaves no blocks"));
        }
        if r.min_interval_ms == 0 || r.survival_interval_ms == 0 {
            return Err(ConfigError::invalid("rising intervals must be positive"));
        }

        let w = &self.ai;
        for (name, v) in [
            ("lines", w.lines),
            ("max_height", w.max_height),
            ("holes", w.holes),
            ("bumpiness", w.bumpiness),
            ("well", w.well),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::invalid(format!("ai.{name} must be finite")));
            }
        }

        Ok(())
    }
}
