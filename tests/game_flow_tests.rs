//! Integration tests for the piece controller

use tetris_ultimate::core::grid::{Block, CellTag};
use tetris_ultimate::core::{GameConfig, GameState, Phase};
use tetris_ultimate::engine::Session;
use tetris_ultimate::types::{GameAction, PhaseKind, PowerUpKind, TICK_MS};

fn quiet_config() -> GameConfig {
    let mut cfg = GameConfig::default();
    cfg.power_ups.enabled = false;
    cfg
}

fn started(seed: u64) -> GameState {
    let mut state = GameState::new(quiet_config(), seed);
    state.start();
    state
}

// ============== Lifecycle ==============

#[test]
fn test_game_lifecycle() {
    let mut state = GameState::new(quiet_config(), 12345);
    assert_eq!(*state.phase(), Phase::Spawning);
    assert!(state.active().is_none());

    state.start();
    assert_eq!(state.phase().kind(), PhaseKind::Falling);
    assert!(state.active().is_some());
    assert!(!state.game_over());
    assert!(!state.paused());
    assert_eq!(state.level(), 1);
}

#[test]
fn test_try_new_rejects_bad_config() {
    let mut cfg = quiet_config();
    cfg.grid.width = 2;
    assert!(GameState::try_new(cfg, 1).is_err());
    let mut cfg = quiet_config();
    cfg.grid.height = 0;
    assert!(GameState::try_new(cfg.clone(), 1).is_err());
    assert!(Session::try_new(cfg, 1).is_err());
    assert!(GameState::try_new(quiet_config(), 1).is_ok());
}

#[test]
fn test_gravity_alone_locks_a_piece() {
    let mut state = started(3);
    let mut elapsed = 0u32;
    while state.pieces_locked() == 0 {
        state.tick(TICK_MS);
        elapsed += TICK_MS;
        assert!(elapsed < 25_000, "piece never locked");
    }
    // 18+ rows at 1000 ms each plus the lock delay
    assert!(elapsed >= 18_000);
    assert!(state.grid().cells().iter().any(|c| c.is_some()));
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        GameAction::MoveLeft,
        GameAction::RotateCw,
        GameAction::HardDrop,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::Hold,
        GameAction::HardDrop,
        GameAction::SoftDrop,
        GameAction::RotateCcw,
        GameAction::HardDrop,
    ];

    let play = || {
        let mut state = GameState::new(GameConfig::default(), 777);
        state.start();
        for action in script {
            state.step(TICK_MS, Some(action));
        }
        state.snapshot()
    };
    assert_eq!(play(), play());
}

#[test]
fn test_stacking_ends_in_game_over_and_restart_recovers() {
    let mut state = started(9);
    let mut drops = 0;
    while !state.game_over() {
        state.apply_action(GameAction::HardDrop);
        drops += 1;
        assert!(drops < 200);
    }

    assert!(!state.apply_action(GameAction::MoveLeft));
    assert!(!state.apply_action(GameAction::Pause));
    assert!(!state.tick(1_000));

    assert!(state.apply_action(GameAction::Restart));
    assert!(!state.game_over());
    assert_eq!(state.score(), 0);
    assert_eq!(state.episode_id(), 1);
}

// ============== Intents ==============

#[test]
fn test_soft_drop_awards_one_per_row() {
    let mut state = started(5);
    let y0 = state.active().unwrap().y;
    assert!(state.apply_action(GameAction::SoftDrop));
    assert!(state.apply_action(GameAction::SoftDrop));
    assert_eq!(state.active().unwrap().y, y0 + 2);
    assert_eq!(state.score(), 2);
}

#[test]
fn test_hard_drop_lands_on_ghost() {
    let mut state = started(5);
    let active = state.active().unwrap();
    let ghost = state.ghost_y().unwrap();
    let rows = (ghost - active.y) as u32;

    assert!(state.apply_action(GameAction::HardDrop));
    assert_eq!(state.score(), rows * 2);
    for (dx, dy) in active.shape() {
        assert!(state.grid().is_occupied(active.x + dx, ghost + dy));
    }
}

#[test]
fn test_moves_stop_at_walls() {
    let mut state = started(11);
    for _ in 0..20 {
        state.apply_action(GameAction::MoveLeft);
    }
    let left = state.active().unwrap();
    assert!(!state.apply_action(GameAction::MoveLeft));
    assert!(left.cells().iter().any(|&(x, _)| x == 0));
    assert!(left.is_valid(state.grid()));
}

#[test]
fn test_pause_blocks_intents_and_time() {
    let mut state = started(2);
    assert!(state.apply_action(GameAction::Pause));
    let before = state.snapshot();
    assert!(!state.step(10_000, Some(GameAction::HardDrop)));
    assert_eq!(state.snapshot(), before);
    assert!(state.apply_action(GameAction::Pause));
    assert!(state.apply_action(GameAction::HardDrop));
}

#[test]
fn test_demo_toggle_is_not_a_game_intent() {
    let mut state = started(2);
    assert!(!state.apply_action(GameAction::ToggleDemo));
}

// ============== Power-ups ==============

#[test]
fn test_line_bomb_needs_a_use() {
    let mut state = started(4);
    for x in 0..9 {
        state
            .grid_mut()
            .set(x, 19, Some(Block::new(CellTag::Garbage)));
    }
    assert!(!state.apply_action(GameAction::ActivateBomb));
    assert!(state.grid().is_occupied(0, 19));

    let cfg = state.config().power_ups.clone();
    state
        .power_ups_mut()
        .activate(PowerUpKind::LineBomb, &cfg);
    assert!(state.apply_action(GameAction::ActivateBomb));
    assert!(state.grid().is_row_empty(19));
    assert!(!state.apply_action(GameAction::ActivateBomb));
    assert_eq!(state.score(), 0);
}

#[test]
fn test_time_dilator_slows_gravity() {
    let mut state = started(4);
    let cfg = state.config().power_ups.clone();
    state
        .power_ups_mut()
        .activate(PowerUpKind::TimeDilator, &cfg);

    let y0 = state.active().unwrap().y;
    state.tick(1_500);
    assert_eq!(state.active().unwrap().y, y0);
    state.tick(500);
    assert_eq!(state.active().unwrap().y, y0 + 1);
}

#[test]
fn test_duration_power_ups_expire_with_game_time() {
    let mut state = started(4);
    let cfg = state.config().power_ups.clone();
    state
        .power_ups_mut()
        .activate(PowerUpKind::ScoreAmplifier, &cfg);
    state.tick(7_000);
    assert!(state.power_ups().is_active(PowerUpKind::ScoreAmplifier));
    state.apply_action(GameAction::Pause);
    state.tick(10_000);
    assert!(state.power_ups().is_active(PowerUpKind::ScoreAmplifier));
    state.apply_action(GameAction::Pause);
    state.tick(1_000);
    assert!(!state.power_ups().is_active(PowerUpKind::ScoreAmplifier));
}
