//! Power-up engine
//!
//! Charged blocks are tagged at spawn. Clearing a row that holds a tagged block
//! activates its kind. Duration kinds count down with game time; use kinds are
//! spent explicitly (Line-Bomb intent, Phantom locks). Re-activating a kind that
//! is already running stacks onto what remains.

use arrayvec::ArrayVec;
use rand::Rng;
use serde::Serialize;

use crate::config::PowerUpConfig;
use crate::pieces::PowerTag;
use crate::types::PowerUpKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActiveEffect {
    Duration { remaining_ms: u32 },
    Uses { remaining: u32 },
}

impl ActiveEffect {
    fn is_spent(&self) -> bool {
        match *self {
            ActiveEffect::Duration { remaining_ms } => remaining_ms == 0,
            ActiveEffect::Uses { remaining } => remaining == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PowerUpStatus {
    pub kind: PowerUpKind,
    pub effect: ActiveEffect,
}

/// Active effects, one slot per kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerUps {
    slots: [Option<ActiveEffect>; 5],
}

impl PowerUps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or extend `kind` by its configured duration or use count
    pub fn activate(&mut self, kind: PowerUpKind, cfg: &PowerUpConfig) {
        let slot = &mut self.slots[kind.index()];
        let amount = configured_amount(kind, cfg);
        let effect = if kind.is_use_based() {
            ActiveEffect::Uses { remaining: amount }
        } else {
            ActiveEffect::Duration {
                remaining_ms: amount,
            }
        };

        let merged = match (*slot, effect) {
            (
                Some(ActiveEffect::Duration { remaining_ms: a }),
                ActiveEffect::Duration { remaining_ms: b },
            ) => ActiveEffect::Duration {
                remaining_ms: a.saturating_add(b),
            },
            (Some(ActiveEffect::Uses { remaining: a }), ActiveEffect::Uses { remaining: b }) => {
                ActiveEffect::Uses {
                    remaining: a.saturating_add(b),
                }
            }
            (_, fresh) => fresh,
        };
        *slot = (!merged.is_spent()).then_some(merged);
    }

    /// Decay duration effects; use effects are untouched
    pub fn tick(&mut self, elapsed_ms: u32) {
        for slot in &mut self.slots {
            if let Some(ActiveEffect::Duration { remaining_ms }) = slot.as_mut() {
                *remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
            }
            if slot.is_some_and(|e| e.is_spent()) {
                *slot = None;
            }
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn effect(&self, kind: PowerUpKind) -> Option<ActiveEffect> {
        self.slots[kind.index()]
    }

    /// Spend one use of `kind`. Returns false (and changes nothing) when none remain.
    pub fn consume_use(&mut self, kind: PowerUpKind) -> bool {
        let slot = &mut self.slots[kind.index()];
        let Some(ActiveEffect::Uses { remaining }) = slot.as_mut() else {
            return false;
        };
        if *remaining == 0 {
            return false;
        }
        *remaining -= 1;
        if *remaining == 0 {
            *slot = None;
        }
        true
    }

    pub fn statuses(&self) -> ArrayVec<PowerUpStatus, 5> {
        PowerUpKind::ALL
            .iter()
            .filter_map(|&kind| {
                self.slots[kind.index()].map(|effect| PowerUpStatus { kind, effect })
            })
            .collect()
    }
}

/// Duration (ms) or use count a fresh activation of `kind` grants
fn configured_amount(kind: PowerUpKind, cfg: &PowerUpConfig) -> u32 {
    match kind {
        PowerUpKind::TimeDilator => cfg.time_dilator_ms,
        PowerUpKind::ScoreAmplifier => cfg.score_amplifier_ms,
        PowerUpKind::PrecisionLock => cfg.precision_lock_ms,
        PowerUpKind::LineBomb => cfg.line_bomb_uses,
        PowerUpKind::PhantomMode => cfg.phantom_uses,
    }
}

/// Roll whether a freshly spawned piece carries a charge, and where
pub fn roll_power_tag(rng: &mut impl Rng, cfg: &PowerUpConfig) -> Option<PowerTag> {
    if !cfg.enabled || cfg.kinds.is_empty() || cfg.spawn_chance <= 0.0 {
        return None;
    }
    if !rng.random_bool(cfg.spawn_chance.min(1.0)) {
        return None;
    }
    let cell = rng.random_range(0..4u8);
    let kind = cfg.kinds[rng.random_range(0..cfg.kinds.len())];
    Some(PowerTag { cell, kind })
}
