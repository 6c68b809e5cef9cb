//! Rising-lines engine
//!
//! A countdown, independent of the piece lifecycle, that periodically asks the
//! controller to push a garbage row in from the floor. The controller decides
//! when ticks apply (never while paused, animating a clear or game over) and
//! performs the insertion; this type only keeps time.
//!
//! | Mode | Next interval |
//! |------|---------------|
//! | Off | never |
//! | Pressure | `max(min_interval, initial_interval - level * interval_decrease)` |
//! | Survival | `survival_interval` |
//! | Manual | on `TriggerRise`, at most once per `manual_cooldown` |

use rand::Rng;
use serde::Serialize;

use crate::config::RisingConfig;
use crate::types::RisingMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RisingLines {
    mode: RisingMode,
    countdown_ms: u32,
    interval_ms: u32,
    cooldown_ms: u32,
    /// Countdown is frozen while this is non-zero
    animation_ms: u32,
    rises: u32,
}

impl RisingLines {
    /// The first pressure countdown is the full `initial_interval_ms`; the
    /// level-based decrease applies from the second rise on.
    pub fn new(cfg: &RisingConfig) -> Self {
        let interval_ms = match cfg.mode {
            RisingMode::Pressure => cfg.initial_interval_ms.max(cfg.min_interval_ms),
            RisingMode::Survival => cfg.survival_interval_ms,
            RisingMode::Off | RisingMode::Manual => 0,
        };
        Self {
            mode: cfg.mode,
            countdown_ms: interval_ms,
            interval_ms,
            cooldown_ms: 0,
            animation_ms: 0,
            rises: 0,
        }
    }

    pub fn mode(&self) -> RisingMode {
        self.mode
    }

    /// Time until the next automatic rise (0 for Off/Manual)
    pub fn countdown_ms(&self) -> u32 {
        self.countdown_ms
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Remaining manual cooldown
    pub fn cooldown_ms(&self) -> u32 {
        self.cooldown_ms
    }

    pub fn is_animating(&self) -> bool {
        self.animation_ms > 0
    }

    /// Rows inserted so far
    pub fn rises(&self) -> u32 {
        self.rises
    }

    fn is_timed(&self) -> bool {
        matches!(self.mode, RisingMode::Pressure | RisingMode::Survival)
    }

    /// Raised once an automatic rise is within `warning_ms`
    pub fn warning(&self, cfg: &RisingConfig) -> bool {
        self.is_timed() && self.countdown_ms <= cfg.warning_ms
    }

    /// Interval that follows a rise at `level`
    pub fn interval_for(mode: RisingMode, level: u32, cfg: &RisingConfig) -> u32 {
        match mode {
            RisingMode::Pressure => cfg
                .initial_interval_ms
                .saturating_sub(level.saturating_mul(cfg.interval_decrease_ms))
                .max(cfg.min_interval_ms),
            RisingMode::Survival => cfg.survival_interval_ms,
            RisingMode::Off | RisingMode::Manual => 0,
        }
    }

    /// Advance timers. Returns true when an automatic rise is due.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.cooldown_ms = self.cooldown_ms.saturating_sub(elapsed_ms);
        if self.animation_ms > 0 {
            self.animation_ms = self.animation_ms.saturating_sub(elapsed_ms);
            return false;
        }
        if !self.is_timed() {
            return false;
        }
        self.countdown_ms = self.countdown_ms.saturating_sub(elapsed_ms);
        self.countdown_ms == 0
    }

    /// Whether a manual trigger would be honoured now
    pub fn can_trigger(&self) -> bool {
        self.mode == RisingMode::Manual && self.cooldown_ms == 0
    }

    /// Record a completed rise and arm the next one
    pub fn on_rise(&mut self, level: u32, cfg: &RisingConfig) {
        self.rises = self.rises.saturating_add(1);
        self.animation_ms = cfg.animation_ms;
        if self.mode == RisingMode::Manual {
            self.cooldown_ms = cfg.manual_cooldown_ms;
        }
        self.interval_ms = Self::interval_for(self.mode, level, cfg);
        self.countdown_ms = self.interval_ms;
    }
}

/// Pick hole columns for a rising row: a count uniform in
/// `[holes_min, holes_max]` (at most `width - 1`), at distinct random columns.
pub fn roll_holes(rng: &mut impl Rng, width: u8, cfg: &RisingConfig) -> Vec<u8> {
    let max = cfg.holes_max.min(width.saturating_sub(1)).max(1);
    let min = cfg.holes_min.clamp(1, max);
    let count = rng.random_range(min..=max) as usize;
    let mut holes: Vec<u8> = rand::seq::index::sample(rng, width as usize, count)
        .iter()
        .map(|x| x as u8)
        .collect();
    holes.sort_unstable();
    holes
}
