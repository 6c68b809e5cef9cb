//! Demo pilot - turns a searched placement into paced intents.
//!
//! ```text
//! Planning -> (Holding) -> Rotating -> Moving -> Dropping
//! ```
//!
//! The searched placement is played out as the intent sequence
//! `Hold? -> Rotate x n -> Move x n -> HardDrop`, one intent per decision.
//! Instead of replaying a precomputed list, each step compares the live piece
//! with the target rotation and column, so a wall kick that shifts the piece
//! only costs extra moves. A new piece (a lock, or a restart) sends it back to
//! `Planning`.

use tetris_ultimate_core::config::DemoConfig;
use tetris_ultimate_core::types::GameAction;
use tetris_ultimate_core::GameState;

use crate::search::{find_best_placement, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PilotPhase {
    Planning,
    Holding,
    Rotating,
    Moving,
    Dropping,
}

#[derive(Debug, Clone)]
pub struct DemoPilot {
    phase: PilotPhase,
    target: Option<Placement>,
    /// Time left before the next decision
    delay_ms: u32,
    /// (episode, pieces locked) of the piece being steered
    piece: Option<(u32, u32)>,
    /// Intents left before giving up on steering and dropping in place
    budget: u32,
}

impl DemoPilot {
    pub fn new() -> Self {
        Self {
            phase: PilotPhase::Planning,
            target: None,
            delay_ms: 0,
            piece: None,
            budget: 0,
        }
    }

    pub fn phase(&self) -> PilotPhase {
        self.phase
    }

    pub fn target(&self) -> Option<Placement> {
        self.target
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance the pilot clock and maybe produce the next intent.
    pub fn tick(&mut self, state: &GameState, elapsed_ms: u32, cfg: &DemoConfig) -> Option<GameAction> {
        if state.paused() || state.game_over() {
            return None;
        }
        let active = state.active()?;

        let piece = (state.episode_id(), state.pieces_locked());
        if self.piece != Some(piece) {
            self.piece = Some(piece);
            self.phase = PilotPhase::Planning;
            self.target = None;
            self.delay_ms = cfg.move_delay_ms;
        }

        self.delay_ms = self.delay_ms.saturating_sub(elapsed_ms);
        if self.delay_ms > 0 {
            return None;
        }

        loop {
            match self.phase {
                PilotPhase::Planning => {
                    self.plan(state);
                }
                PilotPhase::Holding => {
                    self.phase = PilotPhase::Rotating;
                    return self.emit(GameAction::Hold, cfg.rotation_delay_ms);
                }
                PilotPhase::Rotating => {
                    let Some(target) = self.target else {
                        self.phase = PilotPhase::Dropping;
                        continue;
                    };
                    if target.kind != active.kind {
                        // Hold was refused; plan again for the piece we have.
                        self.phase = PilotPhase::Planning;
                        continue;
                    }
                    if active.rotation == target.rotation || self.budget == 0 {
                        self.phase = PilotPhase::Moving;
                        continue;
                    }
                    let action = if active.rotation.cw_steps_to(target.rotation) == 3 {
                        GameAction::RotateCcw
                    } else {
                        GameAction::RotateCw
                    };
                    return self.emit(action, cfg.rotation_delay_ms);
                }
                PilotPhase::Moving => {
                    let target_x = self.target.map_or(active.x, |t| t.x);
                    if active.x == target_x || self.budget == 0 {
                        self.phase = PilotPhase::Dropping;
                        self.delay_ms = cfg.drop_delay_ms;
                        if self.delay_ms > 0 {
                            return None;
                        }
                        continue;
                    }
                    let action = if target_x < active.x {
                        GameAction::MoveLeft
                    } else {
                        GameAction::MoveRight
                    };
                    return self.emit(action, cfg.horizontal_delay_ms);
                }
                PilotPhase::Dropping => {
                    self.phase = PilotPhase::Planning;
                    return self.emit(GameAction::HardDrop, cfg.move_delay_ms);
                }
            }
        }
    }

    fn plan(&mut self, state: &GameState) {
        let Some(active) = state.active() else {
            self.phase = PilotPhase::Dropping;
            return;
        };
        let held_or_next = state
            .hold_piece()
            .map(|h| h.kind)
            .or(state.next_queue().first().copied());

        self.target = find_best_placement(
            state.grid(),
            active.kind,
            held_or_next,
            state.can_hold(),
            &state.config().ai,
        );
        self.budget = 4 + state.grid().width() as u32 * 2;
        self.phase = match self.target {
            Some(t) if t.use_hold => PilotPhase::Holding,
            Some(_) => PilotPhase::Rotating,
            None => PilotPhase::Dropping,
        };
    }

    fn emit(&mut self, action: GameAction, delay_ms: u32) -> Option<GameAction> {
        self.budget = self.budget.saturating_sub(1);
        self.delay_ms = delay_ms;
        Some(action)
    }
}

impl Default for DemoPilot {
    fn default() -> Self {
        Self::new()
    }
}
