//! Rising lines - garbage rows pushed in from the floor

use tetris_ultimate::core::grid::{Block, CellTag};
use tetris_ultimate::core::{GameConfig, GameState};
use tetris_ultimate::types::{GameAction, PieceKind, RisingMode, GARBAGE_COLOR_ID};

/// Rising enabled, gravity slow enough to keep the piece near the top
fn rising_config(mode: RisingMode) -> GameConfig {
    let mut cfg = GameConfig::default();
    cfg.power_ups.enabled = false;
    cfg.timing.initial_fall_ms = 600_000;
    cfg.timing.min_fall_ms = 600_000;
    cfg.rising.mode = mode;
    cfg.rising.survival_interval_ms = 1_000;
    cfg
}

fn started(cfg: GameConfig) -> GameState {
    let mut state = GameState::new(cfg, 21);
    state.start();
    state
}

fn garbage_in_row(state: &GameState, y: usize) -> usize {
    state.snapshot().grid[y]
        .iter()
        .filter(|&&c| c == GARBAGE_COLOR_ID)
        .count()
}

#[test]
fn test_survival_inserts_row_on_interval() {
    let mut state = started(rising_config(RisingMode::Survival));
    let before = state.active().unwrap();

    state.tick(999);
    assert_eq!(garbage_in_row(&state, 19), 0);
    state.tick(1);

    let filled = garbage_in_row(&state, 19);
    assert!((7..=9).contains(&filled), "filled {filled}");
    assert_eq!(state.rising().rises(), 1);

    let after = state.active().unwrap();
    assert!(after.y == before.y || after.y == before.y - 1);
    assert!(after.is_valid(state.grid()));
}

#[test]
fn test_stack_rises_with_its_contents() {
    let mut state = started(rising_config(RisingMode::Survival));
    state
        .grid_mut()
        .set(0, 19, Some(Block::new(CellTag::Garbage)));
    state
        .grid_mut()
        .set(1, 19, Some(Block::new(CellTag::Piece(PieceKind::T))));
    state.tick(1_000);

    assert!(state.grid().is_occupied(0, 18));
    assert!(state.grid().is_occupied(1, 18));
    assert!(!state.grid().is_occupied(2, 18));
}

#[test]
fn test_overflow_ends_the_game() {
    let mut state = started(rising_config(RisingMode::Survival));
    // A block in the top row, clear of the spawn box.
    state
        .grid_mut()
        .set(0, 0, Some(Block::new(CellTag::Garbage)));
    state.tick(1_000);
    assert!(state.game_over());
}

#[test]
fn test_warning_before_pressure_rise() {
    let cfg = rising_config(RisingMode::Pressure);
    let warning_ms = cfg.rising.warning_ms;
    let initial = cfg.rising.initial_interval_ms;
    let mut state = started(cfg);

    assert!(!state.snapshot().rising.warning);
    state.tick(initial - warning_ms);
    let snap = state.snapshot();
    assert!(snap.rising.warning);
    assert_eq!(snap.rising.countdown_ms, warning_ms);
    assert_eq!(snap.rising.mode, RisingMode::Pressure);

    state.tick(warning_ms);
    assert_eq!(state.rising().rises(), 1);
    // Next interval is shortened by the level-1 decrease.
    assert_eq!(state.rising().interval_ms(), initial - 2_000);
}

#[test]
fn test_manual_trigger_and_cooldown() {
    let mut state = started(rising_config(RisingMode::Manual));

    state.tick(60_000);
    assert_eq!(state.rising().rises(), 0);

    assert!(state.apply_action(GameAction::TriggerRise));
    assert!(!state.apply_action(GameAction::TriggerRise));
    state.tick(5_000);
    assert!(state.apply_action(GameAction::TriggerRise));
    assert_eq!(state.rising().rises(), 2);
    assert!(garbage_in_row(&state, 18) > 0);
}

#[test]
fn test_trigger_ignored_outside_manual_mode() {
    let mut state = started(rising_config(RisingMode::Off));
    assert!(!state.apply_action(GameAction::TriggerRise));
    state.tick(600_000 - 1);
    assert_eq!(state.rising().rises(), 0);
}

#[test]
fn test_paused_game_does_not_rise() {
    let mut state = started(rising_config(RisingMode::Survival));
    state.apply_action(GameAction::Pause);
    state.tick(10_000);
    assert_eq!(state.rising().rises(), 0);
    assert_eq!(state.rising().countdown_ms(), 1_000);
}
