//! Session - a game plus demo-mode orchestration.
//!
//! The external driver calls [`Session::tick`] once per frame with the elapsed
//! time and at most one intent. In demo mode the pilot supplies piece-control
//! intents and human ones are dropped; pause, restart and the demo toggle
//! always pass through.

use serde::Serialize;

use tetris_ultimate_core::types::GameAction;
use tetris_ultimate_core::{ConfigError, GameConfig, GameSnapshot, GameState};

use crate::pilot::DemoPilot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub game: GameSnapshot,
    pub demo: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    pilot: DemoPilot,
    demo: bool,
    /// Time spent in game over, for the demo auto-restart
    game_over_ms: u32,
}

impl Session {
    /// Start a session on an already validated `config` (see [`Session::try_new`])
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let demo = config.demo.auto_start;
        let mut state = GameState::new(config, seed);
        state.start();
        Self {
            state,
            pilot: DemoPilot::new(),
            demo,
            game_over_ms: 0,
        }
    }

    pub fn try_new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn pilot(&self) -> &DemoPilot {
        &self.pilot
    }

    pub fn demo(&self) -> bool {
        self.demo
    }

    /// Switch demo mode and start a fresh game
    pub fn set_demo(&mut self, on: bool) {
        self.demo = on;
        self.restart();
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.pilot.reset();
        self.game_over_ms = 0;
    }

    /// Advance one frame. Returns true if the game changed.
    pub fn tick(&mut self, elapsed_ms: u32, intent: Option<GameAction>) -> bool {
        let mut changed = false;
        match intent {
            Some(GameAction::ToggleDemo) => {
                self.set_demo(!self.demo);
                changed = true;
            }
            Some(GameAction::Restart) => {
                self.restart();
                changed = true;
            }
            Some(action) if self.demo && action.is_piece_control() => {}
            Some(action) => changed |= self.state.apply_action(action),
            None => {}
        }

        if self.state.game_over() {
            let demo_cfg = &self.state.config().demo;
            if demo_cfg.after_game_over {
                self.game_over_ms = self.game_over_ms.saturating_add(elapsed_ms);
                if self.game_over_ms >= demo_cfg.game_over_delay_ms {
                    self.set_demo(true);
                    return true;
                }
            }
            return changed;
        }

        if self.demo {
            let action = self
                .pilot
                .tick(&self.state, elapsed_ms, &self.state.config().demo);
            if let Some(action) = action {
                changed |= self.state.apply_action(action);
            }
        }

        changed | self.state.tick(elapsed_ms)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            game: self.state.snapshot(),
            demo: self.demo,
        }
    }
}
