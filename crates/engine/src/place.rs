use thiserror::Error;

use tetris_ultimate_core::pieces::shape_bounds;
use tetris_ultimate_core::types::{GameAction, Rotation};
use tetris_ultimate_core::GameState;

use crate::search::Placement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("hold requested when unavailable")]
    HoldUnavailable,
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("target x would place piece out of bounds")]
    XOutOfBounds,
    #[error("could not move to target x due to collision")]
    XBlocked,
    #[error("game is not playable")]
    NotPlayable,
    #[error("no active piece")]
    NoActive,
}

/// Execute a searched placement in one call: hold, rotate, shift, hard drop.
pub fn apply_placement(state: &mut GameState, placement: &Placement) -> Result<(), PlaceError> {
    apply_place(state, placement.x, placement.rotation, placement.use_hold)
}

pub fn apply_place(
    state: &mut GameState,
    target_x: i8,
    target_rot: Rotation,
    use_hold: bool,
) -> Result<(), PlaceError> {
    if state.paused() || state.game_over() {
        return Err(PlaceError::NotPlayable);
    }

    if use_hold && !state.apply_action(GameAction::Hold) {
        return Err(PlaceError::HoldUnavailable);
    }

    let Some(active0) = state.active() else {
        return Err(PlaceError::NoActive);
    };

    // Try the shorter turn direction first; a 180 tries both.
    let cw = active0.rotation.cw_steps_to(target_rot);
    let ccw = (4 - cw) % 4;
    let mut plans = [(true, cw), (false, ccw)];
    if plans[1].1 < plans[0].1 {
        plans.swap(0, 1);
    }

    let before = state.clone();
    let rotated = plans.into_iter().any(|(clockwise, steps)| {
        *state = before.clone();
        (0..steps).all(|_| state.try_rotate(clockwise))
    });
    if !rotated {
        *state = before;
        return Err(PlaceError::RotationBlocked);
    }

    let Some(active) = state.active() else {
        return Err(PlaceError::NoActive);
    };
    if active.rotation != target_rot {
        return Err(PlaceError::RotationBlocked);
    }

    let (min_dx, max_dx, _, _) = shape_bounds(&active.shape());
    if target_x + min_dx < 0 || target_x + max_dx >= state.grid().width() as i8 {
        return Err(PlaceError::XOutOfBounds);
    }

    let dx = target_x - active.x;
    let step = dx.signum();
    for _ in 0..dx.unsigned_abs() {
        if !state.try_shift(step) {
            return Err(PlaceError::XBlocked);
        }
    }

    if !state.apply_action(GameAction::HardDrop) {
        return Err(PlaceError::NotPlayable);
    }
    Ok(())
}
