//! Scoring module - line clears, combos, drops, level and gravity
//!
//! - Line clears earn `line_scores[n] * level` (level is 1-based).
//! - The first clear of a streak uses `combo_multiplier_base`; each further
//!   consecutive clearing lock adds `combo_multiplier_increment`, capped at
//!   `max_combo_multiplier`. The product is floored.
//! - Score-Amplifier doubles the final total.

use crate::config::{ScoringConfig, TimingConfig};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreResult {
    /// Table points times level
    pub base: u32,
    pub multiplier: f64,
    pub amplified: bool,
    pub total: u32,
}

/// Table points for `lines` cleared at `level`
pub fn calculate_line_score(lines: usize, level: u32, cfg: &ScoringConfig) -> u32 {
    cfg.line_scores
        .get(lines)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level)
}

/// Multiplier for a clear that follows `combo` consecutive clearing locks
pub fn combo_multiplier(combo: u32, cfg: &ScoringConfig) -> f64 {
    if combo == 0 {
        return cfg.combo_multiplier_base;
    }
    (cfg.combo_multiplier_base + combo as f64 * cfg.combo_multiplier_increment)
        .min(cfg.max_combo_multiplier)
}

pub fn calculate_score(
    lines: usize,
    level: u32,
    combo: u32,
    amplified: bool,
    cfg: &ScoringConfig,
) -> ScoreResult {
    let base = calculate_line_score(lines, level, cfg);
    let multiplier = combo_multiplier(combo, cfg);
    let mut total = (base as f64 * multiplier).floor() as u32;
    if amplified {
        total = total.saturating_mul(2);
    }
    ScoreResult {
        base,
        multiplier,
        amplified,
        total,
    }
}

/// Drop bonus for `cells` rows travelled
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool, cfg: &ScoringConfig) -> u32 {
    let per_row = if is_hard_drop {
        cfg.hard_drop_bonus
    } else {
        cfg.soft_drop_bonus
    };
    cells.saturating_mul(per_row)
}

/// 1-based level: one step per `lines_per_level` total lines
pub fn calculate_level(total_lines: u32, cfg: &ScoringConfig) -> u32 {
    total_lines / cfg.lines_per_level.max(1) + 1
}

/// Gravity interval at `level`, doubled while time is dilated
pub fn fall_interval_ms(level: u32, dilated: bool, cfg: &TimingConfig) -> u32 {
    let shaved = level
        .saturating_sub(1)
        .saturating_mul(cfg.level_speed_decrease_ms);
    let interval = cfg
        .initial_fall_ms
        .saturating_sub(shaved)
        .max(cfg.min_fall_ms);
    if dilated {
        interval.saturating_mul(2)
    } else {
        interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_at_level_one_is_table_value() {
        let cfg = ScoringConfig::default();
        let r = calculate_score(1, 1, 0, false, &cfg);
        assert_eq!(r.total, 100);
        assert_eq!(r.multiplier, 1.0);
    }

    #[test]
    fn level_weights_base_points() {
        let cfg = ScoringConfig::default();
        assert_eq!(calculate_line_score(4, 3, &cfg), 2400);
        assert_eq!(calculate_line_score(0, 3, &cfg), 0);
    }

    #[test]
    fn combo_multiplier_grows_and_caps() {
        let cfg = ScoringConfig::default();
        assert_eq!(combo_multiplier(0, &cfg), 1.0);
        assert_eq!(combo_multiplier(1, &cfg), 2.0);
        assert_eq!(combo_multiplier(3, &cfg), 4.0);
        assert_eq!(combo_multiplier(10, &cfg), 5.0);
    }

    #[test]
    fn amplifier_doubles_after_combo() {
        let cfg = ScoringConfig::default();
        let r = calculate_score(2, 1, 1, true, &cfg);
        assert_eq!(r.total, 300 * 2 * 2);
    }

    #[test]
    fn fractional_multiplier_is_floored() {
        let cfg = ScoringConfig {
            combo_multiplier_increment: 0.25,
            ..ScoringConfig::default()
        };
        // 100 * 1.25
        assert_eq!(calculate_score(1, 1, 1, false, &cfg).total, 125);
        let cfg = ScoringConfig {
            line_scores: [0, 33, 0, 0, 0],
            combo_multiplier_increment: 0.5,
            ..ScoringConfig::default()
        };
        assert_eq!(calculate_score(1, 1, 1, false, &cfg).total, 49);
    }

    #[test]
    fn level_is_one_based() {
        let cfg = ScoringConfig::default();
        assert_eq!(calculate_level(0, &cfg), 1);
        assert_eq!(calculate_level(9, &cfg), 1);
        assert_eq!(calculate_level(10, &cfg), 2);
        assert_eq!(calculate_level(25, &cfg), 3);
    }

    #[test]
    fn fall_interval_floors_and_dilates() {
        let cfg = TimingConfig::default();
        assert_eq!(fall_interval_ms(1, false, &cfg), 1000);
        assert_eq!(fall_interval_ms(3, false, &cfg), 800);
        assert_eq!(fall_interval_ms(50, false, &cfg), 100);
        assert_eq!(fall_interval_ms(1, true, &cfg), 2000);
    }

    #[test]
    fn drop_scores() {
        let cfg = ScoringConfig::default();
        assert_eq!(calculate_drop_score(5, true, &cfg), 10);
        assert_eq!(calculate_drop_score(5, false, &cfg), 5);
    }
}
